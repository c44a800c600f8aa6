//! Route handlers. Each reads the form, touches storage through
//! [`PetcareStorage`](crate::db::PetcareStorage), then renders or redirects.

pub mod account;
pub mod pages;
pub mod pets;

use axum_extra::extract::cookie::PrivateCookieJar;
use tracing::warn;

use crate::error::PetcareError;
use crate::middleware::flash::{Flash, push_flash};

pub const DUPLICATE_USERNAME_MESSAGE: &str =
    "Username already exists. Please choose a different one.";
pub const ACCOUNT_CREATED_MESSAGE: &str = "Account created successfully! Please login.";
pub const GENERIC_FAILURE_MESSAGE: &str = "An error occurred. Please try again.";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials";
pub const PET_ADDED_MESSAGE: &str = "Pet added successfully!";
pub const APPOINTMENT_ADDED_MESSAGE: &str = "Appointment added successfully!";
pub const MEDICATION_ADDED_MESSAGE: &str = "Medication added successfully!";

pub fn missing_field_message(field: &str) -> String {
    let label = match field {
        "medication_name" => "Medication name",
        "username" => "Username",
        "password" => "Password",
        "name" => "Name",
        "date" => "Date",
        "schedule" => "Schedule",
        other => other,
    };
    format!("{label} is required.")
}

/// Queue a notification for a rejected write. Unexpected errors propagate.
pub(crate) fn flash_failure(
    jar: PrivateCookieJar,
    err: PetcareError,
    secure: bool,
) -> Result<PrivateCookieJar, PetcareError> {
    match err {
        PetcareError::MissingField(field) => Ok(push_flash(
            jar,
            Flash::danger(missing_field_message(field)),
            secure,
        )),
        e if e.is_recoverable() => {
            warn!(error = %e, "write rejected");
            Ok(push_flash(
                jar,
                Flash::danger(GENERIC_FAILURE_MESSAGE),
                secure,
            ))
        }
        e => Err(e),
    }
}
