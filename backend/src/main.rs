//! AgriStack Mock API - Backend Server
//!
//! Serves the farmer aggregation endpoint over a PostgreSQL record store.

use std::{str::FromStr, sync::Arc};

use agristack_backend::{config::Config, create_app, store::PgRecordStore, AppState};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "agristack_server=debug,agristack_backend=debug,tower_http=debug,sqlx=warn".into()
    });
    let registry = tracing_subscriber::registry().with(filter);
    if std::env::var("AGRI_LOG_FORMAT").is_ok_and(|format| format == "json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    // Load configuration
    let config = Config::load()?;

    tracing::info!("Starting AgriStack Mock API");
    tracing::info!("Environment: {}", config.environment);

    // Create database connection pool; connections open on first use so the
    // server still answers (with 503s) while the database is unreachable
    let connect_options = PgConnectOptions::from_str(&config.database.url)?;
    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect_lazy_with(connect_options);

    let store = Arc::new(PgRecordStore::new(db_pool));
    let addr = config.server.socket_addr()?;

    // Create application state
    let state = AppState::new(store, config);

    // Build application
    let app = create_app(state);

    // Start server
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
