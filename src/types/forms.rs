//! Form bodies. Every field is optional at the decoding step so a missing
//! field becomes a notification instead of an extractor rejection.

use serde::Deserialize;

use crate::error::PetcareError;

/// Non-blank value of a required field.
pub fn required(value: Option<String>, field: &'static str) -> Result<String, PetcareError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(PetcareError::MissingField(field)),
    }
}

fn optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Default, Deserialize)]
pub struct CredentialsForm {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl CredentialsForm {
    pub fn into_parts(self) -> Result<(String, String), PetcareError> {
        Ok((
            required(self.username, "username")?,
            required(self.password, "password")?,
        ))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PetForm {
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AppointmentForm {
    pub date: Option<String>,
    pub description: Option<String>,
}

impl AppointmentForm {
    pub fn into_parts(self) -> Result<(String, Option<String>), PetcareError> {
        Ok((required(self.date, "date")?, optional(self.description)))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct MedicationForm {
    pub medication_name: Option<String>,
    pub schedule: Option<String>,
}

impl MedicationForm {
    pub fn into_parts(self) -> Result<(String, String), PetcareError> {
        Ok((
            required(self.medication_name, "medication_name")?,
            required(self.schedule, "schedule")?,
        ))
    }
}
