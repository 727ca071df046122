/// Database connection pool management
///
/// This module provides the SQLite connection pool used by every service.
/// Foreign-key enforcement is switched on for every connection; the schema
/// relies on it for its restrictive-delete guarantees.
///
/// # Example
///
/// ```no_run
/// use gestforma_shared::db::pool::{create_pool, DatabaseConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig {
///         url: "sqlite://gestforma.db".to_string(),
///         ..Default::default()
///     };
///
///     let pool = create_pool(config).await?;
///     let row: (i64,) = sqlx::query_as("SELECT 1").fetch_one(&pool).await?;
///     assert_eq!(row.0, 1);
///     Ok(())
/// }
/// ```
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Configuration for the database connection pool.
///
/// Timeouts are specified in seconds for ease of configuration from
/// environment variables.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// SQLite connection URL (e.g. "sqlite://gestforma.db")
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Timeout for acquiring a connection from the pool (seconds)
    pub connect_timeout_seconds: u64,

    /// SQLite busy timeout (seconds) before a locked write fails
    pub busy_timeout_seconds: u64,

    /// Create the database file if it does not exist
    pub create_if_missing: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            connect_timeout_seconds: 30,
            busy_timeout_seconds: 5,
            create_if_missing: true,
        }
    }
}

/// Creates and initializes the SQLite connection pool.
///
/// This function:
/// 1. Creates a pool with the specified configuration
/// 2. Enables `PRAGMA foreign_keys` on every connection
/// 3. Performs a health check to verify the database is reachable
///
/// # Errors
///
/// Returns an error if the URL is invalid, the database cannot be opened, or
/// the health check fails.
pub async fn create_pool(config: DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    info!(
        max_connections = config.max_connections,
        connect_timeout_seconds = config.connect_timeout_seconds,
        "Creating database connection pool"
    );

    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(config.create_if_missing)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(config.busy_timeout_seconds));

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .connect_with(options)
        .await?;

    health_check(&pool).await?;

    info!("Database connection pool created successfully");
    Ok(pool)
}

/// Performs a health check on the database connection.
///
/// Executes a trivial query to verify the database is reachable.
pub async fn health_check(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    debug!("Performing database health check");

    let result: (i64,) = sqlx::query_as("SELECT 1").fetch_one(pool).await?;

    if result.0 == 1 {
        debug!("Database health check passed");
        Ok(())
    } else {
        warn!(
            "Database health check returned unexpected value: {}",
            result.0
        );
        Err(sqlx::Error::Protocol(
            "Health check returned unexpected value".into(),
        ))
    }
}
