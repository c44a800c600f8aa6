use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Account row. `password` is stored and compared as plain text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Pet {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Appointment {
    pub id: i64,
    pub pet_id: i64,
    pub date: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Medication {
    pub id: i64,
    pub pet_id: i64,
    pub medication_name: String,
    pub schedule: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
}

/// `owner_id` always comes from the session, never from the form.
#[derive(Debug, Clone)]
pub struct NewPet {
    pub name: String,
    pub owner_id: i64,
}

#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub pet_id: i64,
    pub date: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewMedication {
    pub pet_id: i64,
    pub medication_name: String,
    pub schedule: String,
}
