use http::StatusCode;
use sea_orm::error::DbErr;
use serde::Serialize;

/// Error type shared by every service in the crate.
///
/// The crate is consumed as a library from request handlers; `status_code()`
/// is the single source of truth for mapping error classes to distinct
/// response codes without this crate owning an HTTP surface.
#[derive(Debug, thiserror::Error, Serialize)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(
        #[from]
        #[serde(skip)]
        sea_orm::error::DbErr,
    ),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Illegal transition: {0}")]
    IllegalTransition(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Could not allocate folio: {0}")]
    FolioAllocationFailed(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Other error: {0}")]
    Other(
        #[from]
        #[serde(skip)]
        anyhow::Error,
    ),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl ServiceError {
    /// Convenience constructor for wrapping string-based database errors.
    pub fn database_error_message(message: impl Into<String>) -> Self {
        ServiceError::DatabaseError(DbErr::Custom(message.into()))
    }

    /// Returns the HTTP status code for this error.
    /// This is the single source of truth for error-to-status mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ValidationError(_) | Self::InvalidStatus(_) | Self::InvalidOperation(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::IllegalTransition(_) | Self::Conflict(_) => StatusCode::CONFLICT,
            Self::DatabaseError(_)
            | Self::FolioAllocationFailed(_)
            | Self::InternalError(_)
            | Self::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error message suitable for user-facing responses.
    /// Internal errors return generic messages to avoid leaking implementation details.
    pub fn response_message(&self) -> String {
        match self {
            Self::DatabaseError(_) => "Database error".to_string(),
            Self::FolioAllocationFailed(_) | Self::InternalError(_) | Self::Other(_) => {
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_distinguish_error_classes() {
        assert_eq!(
            ServiceError::ValidationError("email is required".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::NotFound("client".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::IllegalTransition("confirmed is terminal".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServiceError::FolioAllocationFailed("retries exhausted".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_errors_are_opaque_to_callers() {
        let err = ServiceError::database_error_message("connection reset by peer");
        assert_eq!(err.response_message(), "Database error");

        let user_err = ServiceError::NotFound("Quote abc not found".into());
        assert!(user_err.response_message().contains("abc"));
    }
}
