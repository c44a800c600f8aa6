//! One-shot notifications carried to the next rendered page.
//!
//! Messages live in a private cookie as a JSON list; rendering a page takes
//! them out and clears the cookie.

use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};
use serde::{Deserialize, Serialize};
use time::Duration;
use tracing::debug;

pub const FLASH_COOKIE: &str = "petcare_flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashCategory {
    Success,
    Danger,
    Info,
}

impl FlashCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Danger => "danger",
            Self::Info => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub category: FlashCategory,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            category: FlashCategory::Success,
            message: message.into(),
        }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            category: FlashCategory::Danger,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            category: FlashCategory::Info,
            message: message.into(),
        }
    }
}

fn read(jar: &PrivateCookieJar) -> Vec<Flash> {
    let Some(cookie) = jar.get(FLASH_COOKIE) else {
        return Vec::new();
    };
    serde_json::from_str(cookie.value())
        .inspect_err(|e| debug!(error = %e, "discarding unreadable flash cookie"))
        .unwrap_or_default()
}

/// Queue `flash` for the next rendered page. `secure` marks the cookie
/// `Secure`, same as the session cookie.
pub fn push_flash(jar: PrivateCookieJar, flash: Flash, secure: bool) -> PrivateCookieJar {
    let mut pending = read(&jar);
    pending.push(flash);
    match serde_json::to_string(&pending) {
        Ok(value) => jar.add(flash_cookie(value, secure)),
        Err(e) => {
            debug!(error = %e, "failed to encode flash messages");
            jar
        }
    }
}

/// Take all pending messages, clearing the cookie if there were any.
pub fn take_flashes(jar: PrivateCookieJar) -> (PrivateCookieJar, Vec<Flash>) {
    let pending = read(&jar);
    if jar.get(FLASH_COOKIE).is_none() {
        return (jar, pending);
    }
    let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/"));
    (jar, pending)
}

fn flash_cookie(value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((FLASH_COOKIE, value))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(Duration::minutes(5))
        .build()
}
