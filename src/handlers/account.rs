use axum::{
    Form,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use tracing::{info, warn};

use super::{
    ACCOUNT_CREATED_MESSAGE, DUPLICATE_USERNAME_MESSAGE, GENERIC_FAILURE_MESSAGE,
    INVALID_CREDENTIALS_MESSAGE, flash_failure,
};
use crate::db::NewUser;
use crate::error::PetcareError;
use crate::middleware::auth::{RequireUser, authenticate, end_session, start_session};
use crate::middleware::flash::{Flash, push_flash, take_flashes};
use crate::router::PetcareState;
use crate::types::CredentialsForm;
use crate::views;

/// GET /signup
pub async fn signup_form(jar: PrivateCookieJar) -> impl IntoResponse {
    let (jar, flashes) = take_flashes(jar);
    (jar, Html(views::signup(&flashes)))
}

/// POST /signup -> create an account, then send the user to the login page.
pub async fn signup(
    State(state): State<PetcareState>,
    jar: PrivateCookieJar,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, PetcareError> {
    let (username, password) = match form.into_parts() {
        Ok(parts) => parts,
        Err(e) => {
            let jar = flash_failure(jar, e, state.secure_cookie)?;
            return Ok((jar, Redirect::to("/signup")).into_response());
        }
    };

    if state.storage.find_user_by_username(&username).await?.is_some() {
        warn!(username = %username, "signup rejected: {}", PetcareError::DuplicateUsername);
        let jar = push_flash(
            jar,
            Flash::danger(DUPLICATE_USERNAME_MESSAGE),
            state.secure_cookie,
        );
        return Ok((jar, Redirect::to("/signup")).into_response());
    }

    match state
        .storage
        .insert_user(NewUser { username, password })
        .await
    {
        Ok(user) => {
            info!(user_id = user.id, username = %user.username, "account created");
            let jar = push_flash(
                jar,
                Flash::success(ACCOUNT_CREATED_MESSAGE),
                state.secure_cookie,
            );
            Ok((jar, Redirect::to("/login")).into_response())
        }
        Err(e) => {
            // the insert ran in its own transaction, already rolled back
            warn!(error = %e, "signup failed");
            let (jar, mut flashes) = take_flashes(jar);
            flashes.push(Flash::danger(GENERIC_FAILURE_MESSAGE));
            Ok((jar, Html(views::signup(&flashes))).into_response())
        }
    }
}

/// GET /login
pub async fn login_form(jar: PrivateCookieJar) -> impl IntoResponse {
    let (jar, flashes) = take_flashes(jar);
    (jar, Html(views::login(&flashes)))
}

/// POST /login -> start a session on an exact username/password match.
pub async fn login(
    State(state): State<PetcareState>,
    jar: PrivateCookieJar,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, PetcareError> {
    let matched = match form.into_parts() {
        Ok((username, password)) => {
            let user = authenticate(&state.storage, &username, &password).await?;
            if user.is_none() {
                warn!(username = %username, "login rejected: {}", PetcareError::InvalidCredentials);
            }
            user
        }
        Err(_) => None,
    };

    let Some(user) = matched else {
        let (jar, mut flashes) = take_flashes(jar);
        flashes.push(Flash::danger(INVALID_CREDENTIALS_MESSAGE));
        return Ok((jar, Html(views::login(&flashes))).into_response());
    };

    info!(user_id = user.id, "login");
    let jar = start_session(jar, &user, state.secure_cookie);
    Ok((jar, Redirect::to("/dashboard")).into_response())
}

/// GET /logout
pub async fn logout(RequireUser(user): RequireUser, jar: PrivateCookieJar) -> impl IntoResponse {
    info!(user_id = user.id, "logout");
    (end_session(jar), Redirect::to("/"))
}
