//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-class errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`; clients always receive a JSON envelope and never
//! see internal error details.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::DesignerError;

/// Field-level detail for a validation failure.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    /// Name of the offending request field.
    pub field: String,
    /// What was wrong with it.
    pub message: String,
}

impl FieldError {
    /// Build a field error.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Application-level error type for the studio API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Request body failed validation.
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Caller is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Resource absent or not owned by the caller. The two cases are not
    /// distinguished, so existence never leaks.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A per-customer limit was hit.
    #[error("{0}")]
    LimitExceeded(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DesignerError> for AppError {
    fn from(err: DesignerError) -> Self {
        match err {
            DesignerError::Database(e) => Self::Database(e),
            DesignerError::SessionNotFound => {
                Self::NotFound("Session not found or access denied".to_string())
            }
            DesignerError::FavoriteLimitExceeded => {
                Self::LimitExceeded("You can only have up to 5 favorite sessions".to_string())
            }
        }
    }
}

/// JSON error envelope returned to clients.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<FieldError>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Database(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) | Self::LimitExceeded(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        };

        // Don't expose internal error details to clients
        let (message, details) = match self {
            Self::Database(_) | Self::Internal(_) => ("Internal server error".to_string(), None),
            Self::Validation(errors) => ("Validation failed".to_string(), Some(errors)),
            Self::Unauthorized(_) => ("Unauthorized".to_string(), None),
            other => (other.to_string(), None),
        };

        (
            status,
            Json(ErrorBody {
                error: message,
                details,
            }),
        )
            .into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("Session not found or access denied".to_string());
        assert_eq!(
            err.to_string(),
            "Not found: Session not found or access denied"
        );
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Validation(vec![FieldError::new(
                "description",
                "too short"
            )])),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::LimitExceeded("cap".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_designer_error_mapping() {
        assert_eq!(
            get_status(DesignerError::SessionNotFound.into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(DesignerError::FavoriteLimitExceeded.into()),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_limit_exceeded_message_reaches_client() {
        let err: AppError = DesignerError::FavoriteLimitExceeded.into();
        assert_eq!(err.to_string(), "You can only have up to 5 favorite sessions");
    }
}
