//! Liveness and health check handlers

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::{json, Value};

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

/// Root endpoint
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "AgriStack Mock API Running" }))
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    // Check database connectivity
    let ping = tokio::time::timeout(state.config.server.request_timeout(), state.store.ping());
    let db_status = match ping.await {
        Ok(Ok(())) => "connected".to_string(),
        Ok(Err(e)) => {
            tracing::warn!("Health check could not reach the database: {}", e);
            "disconnected".to_string()
        }
        Err(_) => {
            tracing::warn!("Health check timed out waiting for the database");
            "disconnected".to_string()
        }
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
    })
}
