//! Internal maintenance route handlers.
//!
//! These endpoints are invoked by the external scheduler, not by customers;
//! they authenticate with the shared scheduler secret.

use axum::{Json, Router, extract::State, routing::post};
use chrono::Utc;
use serde::Serialize;

use crate::error::AppError;
use crate::middleware::RequireScheduler;
use crate::services::sweep_expired;
use crate::state::AppState;

/// Build the maintenance router.
pub fn router() -> Router<AppState> {
    Router::new().route("/internal/cleanup-expired-sessions", post(cleanup_expired))
}

/// Response for an expiry sweep run.
#[derive(Debug, Serialize)]
pub struct CleanupResponse {
    /// Number of sessions removed.
    pub removed: u64,
    /// Human-readable summary.
    pub message: String,
}

/// Delete expired, non-favorited sessions and their messages.
///
/// POST /internal/cleanup-expired-sessions
///
/// Idempotent: a run with nothing to remove is a no-op.
async fn cleanup_expired(
    State(state): State<AppState>,
    _scheduler: RequireScheduler,
) -> Result<Json<CleanupResponse>, AppError> {
    let removed = sweep_expired(state.pool(), Utc::now()).await?;

    let message = if removed == 0 {
        "No expired sessions to clean up".to_string()
    } else {
        format!("Cleaned up {removed} expired sessions")
    };

    Ok(Json(CleanupResponse { removed, message }))
}
