use axum::{
    Form,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use tracing::info;

use super::{
    APPOINTMENT_ADDED_MESSAGE, MEDICATION_ADDED_MESSAGE, PET_ADDED_MESSAGE, flash_failure,
};
use crate::db::{NewAppointment, NewMedication, NewPet};
use crate::error::PetcareError;
use crate::middleware::auth::RequireUser;
use crate::middleware::flash::{Flash, push_flash, take_flashes};
use crate::middleware::path::PetIdPath;
use crate::router::PetcareState;
use crate::types::{AppointmentForm, MedicationForm, PetForm, PetOverview, forms::required};
use crate::views;

/// GET /dashboard -> every pet of the current user with its records.
pub async fn dashboard(
    State(state): State<PetcareState>,
    RequireUser(user): RequireUser,
    jar: PrivateCookieJar,
) -> Result<Response, PetcareError> {
    let pets = PetOverview::load_for_owner(&state.storage, user.id).await?;
    let (jar, flashes) = take_flashes(jar);
    Ok((jar, Html(views::dashboard(&user, &flashes, &pets))).into_response())
}

/// GET /add_pet -> the current user's pets plus the creation form.
pub async fn add_pet_form(
    State(state): State<PetcareState>,
    RequireUser(user): RequireUser,
    jar: PrivateCookieJar,
) -> Result<Response, PetcareError> {
    let pets = state.storage.pets_by_owner(user.id).await?;
    let (jar, flashes) = take_flashes(jar);
    Ok((jar, Html(views::add_pet(&user, &flashes, &pets))).into_response())
}

/// POST /add_pet -> owner is always the session user.
pub async fn add_pet(
    State(state): State<PetcareState>,
    RequireUser(user): RequireUser,
    jar: PrivateCookieJar,
    Form(form): Form<PetForm>,
) -> Result<Response, PetcareError> {
    let inserted = match required(form.name, "name") {
        Ok(name) => {
            state
                .storage
                .insert_pet(NewPet {
                    name,
                    owner_id: user.id,
                })
                .await
        }
        Err(e) => Err(e),
    };

    let jar = match inserted {
        Ok(pet) => {
            info!(user_id = user.id, pet_id = pet.id, "pet added");
            push_flash(jar, Flash::success(PET_ADDED_MESSAGE), state.secure_cookie)
        }
        Err(e) => flash_failure(jar, e, state.secure_cookie)?,
    };
    Ok((jar, Redirect::to("/add_pet")).into_response())
}

// Appointment and medication routes do not check that `pet_id` belongs to the
// session user: any logged-in user can list or add records for any pet.

/// GET /add_appointment/{pet_id}
pub async fn add_appointment_form(
    State(state): State<PetcareState>,
    PetIdPath(pet_id): PetIdPath,
    RequireUser(user): RequireUser,
    jar: PrivateCookieJar,
) -> Result<Response, PetcareError> {
    let appointments = state.storage.appointments_by_pet(pet_id).await?;
    let (jar, flashes) = take_flashes(jar);
    Ok((
        jar,
        Html(views::add_appointment(&user, &flashes, pet_id, &appointments)),
    )
        .into_response())
}

/// POST /add_appointment/{pet_id} -> an unknown pet fails at the foreign key.
pub async fn add_appointment(
    State(state): State<PetcareState>,
    PetIdPath(pet_id): PetIdPath,
    RequireUser(user): RequireUser,
    jar: PrivateCookieJar,
    Form(form): Form<AppointmentForm>,
) -> Result<Response, PetcareError> {
    let inserted = match form.into_parts() {
        Ok((date, description)) => {
            state
                .storage
                .insert_appointment(NewAppointment {
                    pet_id,
                    date,
                    description,
                })
                .await
        }
        Err(e) => Err(e),
    };

    let jar = match inserted {
        Ok(appointment) => {
            info!(
                user_id = user.id,
                pet_id,
                appointment_id = appointment.id,
                "appointment added"
            );
            push_flash(jar, Flash::success(APPOINTMENT_ADDED_MESSAGE), state.secure_cookie)
        }
        Err(e) => flash_failure(jar, e, state.secure_cookie)?,
    };
    Ok((jar, Redirect::to(&format!("/add_appointment/{pet_id}"))).into_response())
}

/// GET /add_medication/{pet_id}
pub async fn add_medication_form(
    State(state): State<PetcareState>,
    PetIdPath(pet_id): PetIdPath,
    RequireUser(user): RequireUser,
    jar: PrivateCookieJar,
) -> Result<Response, PetcareError> {
    let medications = state.storage.medications_by_pet(pet_id).await?;
    let (jar, flashes) = take_flashes(jar);
    Ok((
        jar,
        Html(views::add_medication(&user, &flashes, pet_id, &medications)),
    )
        .into_response())
}

/// POST /add_medication/{pet_id}
pub async fn add_medication(
    State(state): State<PetcareState>,
    PetIdPath(pet_id): PetIdPath,
    RequireUser(user): RequireUser,
    jar: PrivateCookieJar,
    Form(form): Form<MedicationForm>,
) -> Result<Response, PetcareError> {
    let inserted = match form.into_parts() {
        Ok((medication_name, schedule)) => {
            state
                .storage
                .insert_medication(NewMedication {
                    pet_id,
                    medication_name,
                    schedule,
                })
                .await
        }
        Err(e) => Err(e),
    };

    let jar = match inserted {
        Ok(medication) => {
            info!(
                user_id = user.id,
                pet_id,
                medication_id = medication.id,
                "medication added"
            );
            push_flash(jar, Flash::success(MEDICATION_ADDED_MESSAGE), state.secure_cookie)
        }
        Err(e) => flash_failure(jar, e, state.secure_cookie)?,
    };
    Ok((jar, Redirect::to(&format!("/add_medication/{pet_id}"))).into_response())
}
