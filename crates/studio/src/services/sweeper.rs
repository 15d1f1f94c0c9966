//! Expiry sweep for abandoned design sessions.
//!
//! Invoked by an external scheduler (cron hitting the internal endpoint, or
//! `aurelia-cli sweep`) -- there is no in-process timer. Each run deletes
//! every non-favorited session past its expiration, messages first so the
//! foreign-key relationship holds without a database-level cascade.
//!
//! The run is idempotent and self-healing: a crash between the two deletes
//! leaves message-less sessions that still match the selection predicate on
//! the next run.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{info, instrument};

use crate::db::{MessageRepository, RepositoryError, SessionRepository};

/// Delete all expired, non-favorited sessions and their messages.
///
/// Returns the number of sessions removed.
///
/// # Errors
///
/// Returns an error if any database operation fails; the next scheduled run
/// retries naturally.
#[instrument(skip(pool))]
pub async fn sweep_expired(pool: &PgPool, now: DateTime<Utc>) -> Result<u64, RepositoryError> {
    let sessions = SessionRepository::new(pool);
    let messages = MessageRepository::new(pool);

    let expired = sessions.list_expired(now).await?;

    if expired.is_empty() {
        info!("No expired sessions to clean up");
        return Ok(0);
    }

    let message_count = messages.delete_for_sessions(&expired).await?;
    let session_count = sessions.delete_by_ids(&expired).await?;

    info!(
        sessions = session_count,
        messages = message_count,
        "Cleaned up expired design sessions"
    );

    Ok(session_count)
}
