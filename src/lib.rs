//! qualeval library - sequential image-rating survey server
//!
//! The catalog is built once at startup and shared read-only across request
//! handlers; the record store sits behind the [`store::RecordStore`] trait.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod store;

pub use error::{Error, Result};

use catalog::Catalog;
use store::RecordStore;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Immutable evaluation catalog, built once at startup
    pub catalog: Arc<Catalog>,
    /// Record store, absent when no storage credentials were configured
    pub store: Option<Arc<dyn RecordStore>>,
}

impl AppState {
    pub fn new(catalog: Catalog, store: Option<Arc<dyn RecordStore>>) -> Self {
        Self {
            catalog: Arc::new(catalog),
            store,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::home))
        .route("/evaluate/:position", get(api::evaluate_item))
        .route("/complete", get(api::complete))
        .route("/api/new-session-id", get(api::new_session_id))
        .route("/api/submit", post(api::submit))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
