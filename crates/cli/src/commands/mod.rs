//! Command implementations.

pub mod design;
pub mod migrate;
pub mod sites;

use tezweb_server::config::{ConfigError, ServerConfig};
use tezweb_server::db::{self, PgDocumentStore};
use thiserror::Error;

/// Errors shared by commands that talk to the database.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Publish(#[from] tezweb_server::services::PublishError),

    #[error("Invalid value: {0}")]
    Invalid(String),
}

/// Load configuration and connect to `PostgreSQL`.
async fn connect() -> Result<(ServerConfig, PgDocumentStore), CommandError> {
    let config = ServerConfig::from_env()?;
    let database_url = config.require_database_url()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(database_url).await?;
    Ok((config, PgDocumentStore::new(pool)))
}
