use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use tracing::debug;

use crate::error::PetcareError;

/// Integer `{pet_id}` path segment. Anything else is a 404, before the
/// login check runs.
#[derive(Debug, Clone, Copy)]
pub struct PetIdPath(pub i64);

impl<S> FromRequestParts<S> for PetIdPath
where
    S: Send + Sync,
{
    type Rejection = PetcareError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<i64>::from_request_parts(parts, state).await {
            Ok(Path(pet_id)) => Ok(Self(pet_id)),
            Err(rejection) => {
                debug!(path = %parts.uri.path(), error = %rejection, "unroutable pet id");
                Err(PetcareError::NotFound)
            }
        }
    }
}
