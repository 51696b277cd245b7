//! Error handling for the AgriStack Mock API
//!
//! Every error leaves the service as `{"detail": "..."}` with a status code
//! chosen by its kind.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

/// Operator-facing text returned with every 503
pub const DATABASE_UNAVAILABLE_DETAIL: &str = "Database unavailable. Check DATABASE_URL and network. \
This Supabase DB host resolves to IPv6 only; you need IPv6 connectivity \
or an IPv4-capable endpoint (e.g., Supabase connection pooler host).";

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Connectivity or operational fault in the backing store
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[source] StoreError),

    /// Any other store fault; not classified further
    #[error("Store error: {0}")]
    Store(#[source] StoreError),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        if err.is_unavailable() {
            AppError::StoreUnavailable(err)
        } else {
            AppError::Store(err)
        }
    }
}

/// Error response structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> String {
        match self {
            AppError::NotFound(resource) => format!("{} not found", resource),
            AppError::StoreUnavailable(_) => DATABASE_UNAVAILABLE_DETAIL.to_string(),
            AppError::Store(_) => "Internal Server Error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::NotFound(_) => tracing::debug!("Error: {}", self),
            AppError::StoreUnavailable(_) => tracing::warn!("Error: {:?}", self),
            _ => tracing::error!("Error: {:?}", self),
        }

        let body = ErrorResponse {
            detail: self.detail(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
