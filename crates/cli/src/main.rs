//! Aurelia CLI - Database migrations and maintenance tools.
//!
//! # Usage
//!
//! ```bash
//! # Run studio database migrations
//! aurelia-cli migrate
//!
//! # Delete expired, non-favorited design sessions (cron entry point)
//! aurelia-cli sweep
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `sweep` - Run the design-session expiry sweep once and exit

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "aurelia-cli")]
#[command(author, version, about = "Aurelia CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run studio database migrations
    Migrate,
    /// Delete expired, non-favorited design sessions
    Sweep,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Migrate => commands::migrate::run().await,
        Commands::Sweep => commands::sweep::run().await,
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "Command failed");
        std::process::exit(1);
    }
}
