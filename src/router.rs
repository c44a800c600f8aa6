use axum::{Router, extract::FromRef, routing::get};
use axum_extra::extract::cookie::Key;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::PetcareStorage;
use crate::error::PetcareError;
use crate::handlers::{account, pages, pets};

/// Shared, request-independent state. Cloned into every handler.
#[derive(Clone)]
pub struct PetcareState {
    pub storage: PetcareStorage,
    pub key: Key,
    pub secure_cookie: bool,
}

impl PetcareState {
    pub fn new(storage: PetcareStorage, cfg: &Config) -> Result<Self, PetcareError> {
        let key = Key::try_from(cfg.secret_key.as_bytes())
            .map_err(|e| PetcareError::SessionKey(e.to_string()))?;
        Ok(Self {
            storage,
            key,
            secure_cookie: cfg.secure_cookie,
        })
    }
}

impl FromRef<PetcareState> for Key {
    fn from_ref(state: &PetcareState) -> Self {
        state.key.clone()
    }
}

pub fn petcare_router(state: PetcareState) -> Router {
    Router::new()
        .route("/", get(pages::home))
        .route("/signup", get(account::signup_form).post(account::signup))
        .route("/login", get(account::login_form).post(account::login))
        .route("/logout", get(account::logout))
        .route("/dashboard", get(pets::dashboard))
        .route("/add_pet", get(pets::add_pet_form).post(pets::add_pet))
        .route(
            "/add_appointment/{pet_id}",
            get(pets::add_appointment_form).post(pets::add_appointment),
        )
        .route(
            "/add_medication/{pet_id}",
            get(pets::add_medication_form).post(pets::add_medication),
        )
        .route("/contact_vet", get(pages::contact_vet))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
