//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! tezweb-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `TEZWEB_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string
//!
//! # Migration Files
//!
//! Migrations live in `crates/server/migrations/` and are embedded into the
//! server crate at compile time.

use tezweb_server::db;

use super::{CommandError, connect};

/// Apply all pending document store migrations.
///
/// # Errors
///
/// Returns `CommandError` if no database is configured, the connection fails,
/// or a migration fails to apply.
pub async fn run() -> Result<(), CommandError> {
    let (_, store) = connect().await?;

    tracing::info!("Running migrations...");
    db::migrate(store.pool()).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
