/// Database migration runner
///
/// Migrations live in the `migrations/` directory of this crate and are
/// embedded into the binary at compile time via `sqlx::migrate!`. Each file
/// is named `{version}_{name}.sql` and is applied at most once.
///
/// # Example
///
/// ```no_run
/// use gestforma_shared::db::pool::{create_pool, DatabaseConfig};
/// use gestforma_shared::db::migrations::run_migrations;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig {
///     url: "sqlite://gestforma.db".into(),
///     ..Default::default()
/// })
/// .await?;
///
/// run_migrations(&pool).await?;
/// # Ok(())
/// # }
/// ```
use sqlx::sqlite::SqlitePool;
use tracing::{info, warn};

/// Runs all pending database migrations.
///
/// # Errors
///
/// Returns an error if a migration fails to execute or the migrations table
/// cannot be created.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Starting database migrations");

    match sqlx::migrate!("./migrations").run(pool).await {
        Ok(()) => {
            info!("All database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}
