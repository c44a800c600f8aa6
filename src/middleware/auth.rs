use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar, SameSite};
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::db::{PetcareStorage, User};
use crate::error::PetcareError;
use crate::middleware::flash::{Flash, push_flash};
use crate::router::PetcareState;

pub const SESSION_COOKIE: &str = "petcare_session";
pub const LOGIN_PATH: &str = "/login";
pub const LOGIN_REQUIRED_MESSAGE: &str = "Please log in to access this page.";

/// Look up `username` and compare the stored password.
///
/// The password is stored and compared as plain text. This reproduces the
/// existing behaviour and is a known weakness: a real deployment needs a
/// salted password hash here.
pub async fn authenticate(
    storage: &PetcareStorage,
    username: &str,
    password: &str,
) -> Result<Option<User>, PetcareError> {
    let Some(user) = storage.find_user_by_username(username).await? else {
        return Ok(None);
    };
    let matches: bool = user.password.as_bytes().ct_eq(password.as_bytes()).into();
    Ok(matches.then_some(user))
}

/// Bind `user` to every following request from this client.
pub fn start_session(jar: PrivateCookieJar, user: &User, secure: bool) -> PrivateCookieJar {
    jar.add(
        Cookie::build((SESSION_COOKIE, user.id.to_string()))
            .path("/")
            .http_only(true)
            .secure(secure)
            .same_site(SameSite::Lax)
            .build(),
    )
}

pub fn end_session(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}

/// Identity bound to the current request.
#[derive(Debug, Clone, PartialEq)]
pub enum CurrentUser {
    Authenticated(User),
    Anonymous,
}

impl CurrentUser {
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated(user) => Some(user),
            Self::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// Resolve the session cookie. A missing, tampered or stale id is anonymous.
    pub async fn resolve(
        jar: &PrivateCookieJar,
        storage: &PetcareStorage,
    ) -> Result<Self, PetcareError> {
        let Some(id) = jar
            .get(SESSION_COOKIE)
            .and_then(|c| c.value().parse::<i64>().ok())
        else {
            return Ok(Self::Anonymous);
        };
        match storage.find_user_by_id(id).await? {
            Some(user) => Ok(Self::Authenticated(user)),
            None => {
                debug!(user_id = id, "session refers to unknown user");
                Ok(Self::Anonymous)
            }
        }
    }
}

impl FromRequestParts<PetcareState> for CurrentUser {
    type Rejection = PetcareError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &PetcareState,
    ) -> Result<Self, Self::Rejection> {
        let Ok(jar) = PrivateCookieJar::<Key>::from_request_parts(parts, state).await;
        Self::resolve(&jar, &state.storage).await
    }
}

/// Extractor for routes that need a logged-in user.
///
/// Anonymous requests are redirected to the login page before the handler
/// body runs.
#[derive(Debug, Clone)]
pub struct RequireUser(pub User);

impl FromRequestParts<PetcareState> for RequireUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &PetcareState,
    ) -> Result<Self, Self::Rejection> {
        let Ok(jar) = PrivateCookieJar::<Key>::from_request_parts(parts, state).await;
        match CurrentUser::resolve(&jar, &state.storage).await {
            Ok(CurrentUser::Authenticated(user)) => Ok(Self(user)),
            Ok(CurrentUser::Anonymous) => {
                debug!(path = %parts.uri.path(), "redirecting anonymous request to login");
                let jar = push_flash(
                    jar,
                    Flash::info(LOGIN_REQUIRED_MESSAGE),
                    state.secure_cookie,
                );
                Err((jar, Redirect::to(LOGIN_PATH)).into_response())
            }
            Err(e) => Err(e.into_response()),
        }
    }
}
