//! Expiry sweep command.
//!
//! This is the external-scheduler entry point: cron invokes it on a fixed
//! schedule, the sweep runs once and the process exits. The same sweep is
//! reachable over HTTP at `POST /internal/cleanup-expired-sessions`.

use chrono::Utc;

use aurelia_studio::services::sweep_expired;

use super::CommandError;

/// Run the design-session expiry sweep once.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a delete fails; the
/// next scheduled run retries naturally.
pub async fn run() -> Result<(), CommandError> {
    let database_url = super::database_url()?;

    let pool = aurelia_studio::db::create_pool(&database_url).await?;

    let removed = sweep_expired(&pool, Utc::now()).await?;
    tracing::info!(removed, "Expiry sweep complete");

    Ok(())
}
