//! AgriStack Mock API - Backend
//!
//! Read-only aggregation API over farmer, land parcel, crop and scheme
//! records. The binary in `main.rs` wires configuration, logging and the
//! database pool; everything else lives here so it can be driven in tests.

use std::sync::Arc;

use axum::Router;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

pub use crate::config::Config;

use services::FarmerAggregationService;
use store::RecordStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub farmers: FarmerAggregationService,
    pub store: Arc<dyn RecordStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, config: Config) -> Self {
        Self {
            farmers: FarmerAggregationService::new(store.clone())
                .with_deadline(config.server.request_timeout()),
            store,
            config: Arc::new(config),
        }
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors())
        .with_state(state)
}

/// Any origin, method and header, with credentials.
///
/// Wildcards cannot be combined with credentials, so the request's own values
/// are echoed back instead.
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
