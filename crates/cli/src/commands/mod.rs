//! Subcommand implementations.

pub mod migrate;
pub mod seed;
pub mod store;

use secrecy::SecretString;
use sqlx::SqlitePool;
use storeboard_api::db;
use storeboard_api::services::ResourceError;
use thiserror::Error;

/// Environment variable holding the SQLite connection string.
pub const DATABASE_URL_VAR: &str = "STOREBOARD_DATABASE_URL";

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A service call was rejected.
    #[error("{0}")]
    Resource(#[from] ResourceError),
}

/// Connect to the database named by `STOREBOARD_DATABASE_URL`.
///
/// # Errors
///
/// Returns `CommandError::MissingEnvVar` if the variable is not set, or
/// `CommandError::Database` if the connection fails.
pub async fn connect() -> Result<SqlitePool, CommandError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var(DATABASE_URL_VAR)
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar(DATABASE_URL_VAR))?;

    tracing::info!("Connecting to database...");
    Ok(db::create_pool(&database_url).await?)
}
