//! Database module: models and schema for persistent storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows, plus insert payloads
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `sqlite.rs`: the storage gateway every handler goes through

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{
    Appointment, Medication, NewAppointment, NewMedication, NewPet, NewUser, Pet, User,
};
pub use schema::SQLITE_INIT;
pub use sqlite::{PetcareStorage, SqlitePool, connect};
