//! Database module for managing `SQLite` connections and migrations.
//!
//! Migrations under `migrations/` are embedded at build time and applied on
//! connect, including the data patch that makes accepting an answer free of
//! any reputation requirement.

#[cfg(test)]
mod config;
pub mod site_info;

use anyhow::{Context as _, Result};
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use tracing::info;

const MAX_CONNECTIONS: u32 = 10;

/// Establishes a connection pool to the `SQLite` database and runs pending migrations.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection fails
/// - Migrations fail to run
pub async fn connect(pool_uri: &str) -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect(pool_uri)
        .await
        .context("unable to connect to the database")?;

    migrate(&pool)
        .await
        .with_context(|| format!("could not run database migrations for database at '{pool_uri}'"))?;

    info!("Connected to database.");
    Ok(pool)
}

/// Applies every embedded migration that has not run yet.
///
/// # Errors
///
/// Returns the underlying migration error.
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!().run(pool).await
}

/// Opens a single-connection in-memory database with all migrations applied.
#[cfg(test)]
pub(crate) async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    migrate(&pool).await.unwrap();
    pool
}
