//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! sb-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `STOREBOARD_DATABASE_URL` - SQLite connection string, e.g.
//!   `sqlite://storeboard.db`
//!
//! Migrations live in `crates/api/migrations/` and are embedded into the
//! `storeboard-api` library, so the CLI and the server always agree on the
//! schema version.

use storeboard_api::db;

use super::{CommandError, connect};

/// Apply all pending migrations.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    db::migrate(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
