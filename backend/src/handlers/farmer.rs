//! Farmer profile HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::AppState;

/// Get the aggregated profile of a farmer
pub async fn get_farmer(
    State(state): State<AppState>,
    Path(farmer_id): Path<String>,
) -> impl IntoResponse {
    match state.farmers.get_farmer_profile(&farmer_id).await {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(e) => e.into_response(),
    }
}
