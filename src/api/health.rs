//! Health check endpoint

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

/// Diagnostic response: process status, whether a record store is wired in,
/// and how many items the catalog holds.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub storage_initialized: bool,
    pub total_items: usize,
}

/// GET /api/health
///
/// No side effects, no authentication.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        storage_initialized: state.store.is_some(),
        total_items: state.catalog.len(),
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/api/health", get(health_check))
}
