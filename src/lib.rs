pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod types;
pub mod views;

pub use config::Config;
pub use error::PetcareError;
pub use router::{PetcareState, petcare_router};
