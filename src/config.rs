use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::error::PetcareError;

/// Minimum length of `secret_key`; the raw bytes are used as the cookie key.
pub const SECRET_KEY_MIN_LEN: usize = 64;

const DEFAULT_SECRET_KEY: &str =
    "super_secret_key-petcare-session-signing-and-encryption-material-0123456789abcdef";

/// Runtime configuration, built once at startup and handed to the router state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub bind_addr: String,
    pub database_url: String,
    pub secret_key: String,
    pub loglevel: String,
    /// Mark session cookies `Secure`. Off by default for plain-http local use.
    pub secure_cookie: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            database_url: "sqlite://petcare.db".to_string(),
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            loglevel: "info".to_string(),
            secure_cookie: false,
        }
    }
}

impl Config {
    /// Defaults, then `petcare.toml` (if present), then `PETCARE_*` env vars.
    pub fn load() -> Result<Self, PetcareError> {
        Self::from_figment(
            Figment::from(Serialized::defaults(Self::default()))
                .merge(Toml::file("petcare.toml"))
                .merge(Env::prefixed("PETCARE_")),
        )
    }

    pub fn from_figment(figment: Figment) -> Result<Self, PetcareError> {
        let cfg: Self = figment.extract().map_err(Box::new)?;
        if cfg.secret_key.len() < SECRET_KEY_MIN_LEN {
            return Err(PetcareError::SessionKey(format!(
                "secret_key must be at least {SECRET_KEY_MIN_LEN} bytes, got {}",
                cfg.secret_key.len()
            )));
        }
        Ok(cfg)
    }
}
