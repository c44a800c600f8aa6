use axum::response::{Html, IntoResponse};
use axum_extra::extract::cookie::PrivateCookieJar;

use crate::middleware::auth::{CurrentUser, RequireUser};
use crate::middleware::flash::take_flashes;
use crate::views;

/// GET / -> landing page, for anyone.
pub async fn home(current: CurrentUser, jar: PrivateCookieJar) -> impl IntoResponse {
    let (jar, flashes) = take_flashes(jar);
    (jar, Html(views::home(current.user(), &flashes)))
}

/// GET /contact_vet -> static information, logged-in users only.
pub async fn contact_vet(
    RequireUser(user): RequireUser,
    jar: PrivateCookieJar,
) -> impl IntoResponse {
    let (jar, flashes) = take_flashes(jar);
    (jar, Html(views::contact_vet(&user, &flashes)))
}
