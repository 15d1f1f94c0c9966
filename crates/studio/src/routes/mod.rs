//! HTTP route handlers for the studio API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                            - Liveness check
//! GET  /health/ready                      - Readiness check (database ping)
//!
//! # Design API (bearer auth)
//! GET    /api/design/sessions             - List the customer's sessions
//! POST   /api/design/start-session        - Create a session from a design brief
//! POST   /api/design/send-message         - One conversation turn
//! GET    /api/design/session/{id}         - Session with conversation history
//! DELETE /api/design/session/{id}         - Delete a session and its messages
//! POST   /api/design/favorite-toggle      - Toggle favorite status
//!
//! # Maintenance (scheduler secret)
//! POST /internal/cleanup-expired-sessions - Expiry sweep
//! ```

pub mod designer;
pub mod maintenance;

use axum::Router;
use axum::extract::{FromRequest, Request, rejection::JsonRejection};

use crate::error::{AppError, FieldError};
use crate::state::AppState;

/// Build the studio router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(designer::router())
        .merge(maintenance::router())
}

/// JSON extractor that maps body rejections into the API's validation
/// envelope (400 with field detail) instead of axum's plain-text default.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: serde::de::DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_rejection_to_error(&rejection)),
        }
    }
}

fn json_rejection_to_error(rejection: &JsonRejection) -> AppError {
    AppError::Validation(vec![FieldError::new("body", rejection.body_text())])
}
