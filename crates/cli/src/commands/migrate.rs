//! Database migration command.
//!
//! Migrations live in `crates/studio/migrations/` and are embedded at
//! compile time; the studio service never runs them automatically.

use super::CommandError;

/// Run studio database migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let database_url = super::database_url()?;

    tracing::info!("Connecting to studio database...");
    let pool = aurelia_studio::db::create_pool(&database_url).await?;

    tracing::info!("Running studio migrations...");
    sqlx::migrate!("../studio/migrations").run(&pool).await?;

    tracing::info!("Studio migrations complete");
    Ok(())
}
