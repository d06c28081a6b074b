//! Database operations for the ceycan `PostgreSQL` database.
//!
//! # Schema: `ceycan`
//!
//! - `category` - Product categories (unique name, delete guarded)
//! - `product` - Products referencing a category
//! - `user` - Admin identities
//! - `settings` - Singleton-per-kind JSONB settings records
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p ceycan-cli -- migrate
//! ```

pub mod categories;
pub mod products;
pub mod settings;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use categories::CategoryRepository;
pub use products::ProductRepository;
pub use users::UserRepository;

/// Number of connection attempts made at startup before giving up.
const CONNECT_ATTEMPTS: u32 = 3;

/// Fixed delay between startup connection attempts.
const CONNECT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique name).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Create the connection pool, retrying a bounded number of times.
///
/// Startup waits a fixed interval between attempts; after the final
/// failure the error propagates and the process aborts startup.
///
/// # Errors
///
/// Returns the last `sqlx::Error` once all attempts are exhausted.
pub async fn create_pool_with_retry(
    database_url: &secrecy::SecretString,
) -> Result<PgPool, sqlx::Error> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        match create_pool(database_url).await {
            Ok(pool) => return Ok(pool),
            Err(e) if attempt < CONNECT_ATTEMPTS => {
                tracing::warn!(
                    "database connection failed (attempt {attempt}/{CONNECT_ATTEMPTS}): {e}; \
                     retrying in {}s",
                    CONNECT_RETRY_DELAY.as_secs()
                );
                tokio::time::sleep(CONNECT_RETRY_DELAY).await;
            }
            Err(e) => return Err(e),
        }
    }
}
