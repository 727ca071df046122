//! # GestForma API Server
//!
//! Back office for a vocational training center: accounts and roles,
//! trainer/trainee profiles, the course catalog, classes and their module
//! distributions, enrollments, rooms, scheduled sessions, availability
//! windows, and grades.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p gestforma-api
//! ```

use gestforma_api::{
    app::{build_router, AppState},
    config::Config,
};
use gestforma_shared::{
    db::{migrations::run_migrations, pool::{create_pool, DatabaseConfig}},
    seed,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gestforma_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "GestForma API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..DatabaseConfig::default()
    })
    .await?;

    run_migrations(&pool).await?;

    // A partially seeded database is usable; a crashed server is not.
    if let Err(e) = seed::run(&pool).await {
        tracing::error!("Seed failed, continuing unseeded: {}", e);
    }

    let bind_address = config.bind_address();
    let state = AppState::new(pool, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
