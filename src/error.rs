use axum::{
    http::StatusCode,
    response::{Html, IntoResponse},
};
use sqlx::error::ErrorKind;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum PetcareError {
    #[error("Username already exists")]
    DuplicateUsername,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Config error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("Session key error: {0}")]
    SessionKey(String),
}

impl PetcareError {
    /// Errors a handler is expected to recover from with a notification.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::DuplicateUsername
                | Self::InvalidCredentials
                | Self::MissingField(_)
                | Self::ConstraintViolation(_)
        )
    }
}

impl From<sqlx::Error> for PetcareError {
    fn from(e: sqlx::Error) -> Self {
        let violation = match &e {
            sqlx::Error::Database(db_err) => matches!(
                db_err.kind(),
                ErrorKind::UniqueViolation
                    | ErrorKind::ForeignKeyViolation
                    | ErrorKind::NotNullViolation
                    | ErrorKind::CheckViolation
            )
            .then(|| db_err.message().to_string()),
            _ => None,
        };
        match violation {
            Some(message) => PetcareError::ConstraintViolation(message),
            None => PetcareError::Database(e),
        }
    }
}

impl IntoResponse for PetcareError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            PetcareError::DuplicateUsername | PetcareError::ConstraintViolation(_) => {
                StatusCode::CONFLICT
            }
            PetcareError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            PetcareError::MissingField(_) => StatusCode::BAD_REQUEST,
            PetcareError::NotFound => StatusCode::NOT_FOUND,
            PetcareError::Database(_)
            | PetcareError::Config(_)
            | PetcareError::SessionKey(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            "An internal server error occurred.".to_string()
        } else {
            self.to_string()
        };
        (status, Html(crate::views::error_page(status, &message))).into_response()
    }
}
