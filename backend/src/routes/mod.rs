//! Route definitions for the AgriStack Mock API

use axum::{routing::get, Router};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Liveness and health (public)
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        // Farmer aggregation
        .nest("/agristack", agristack_routes())
}

/// AgriStack record routes
fn agristack_routes() -> Router<AppState> {
    Router::new().route("/farmer/:farmer_id", get(handlers::get_farmer))
}
