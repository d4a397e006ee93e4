//! Session identifier issuance
//!
//! Session ids come from a server-side sequence in the record store; the
//! client never mints its own key.

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use tracing::info;

use crate::{AppState, Error, Result};

/// GET /api/new-session-id
pub async fn new_session_id(State(state): State<AppState>) -> Result<Json<Value>> {
    let store = state
        .store
        .as_ref()
        .ok_or_else(|| Error::Config("no record store configured".to_string()))?;

    let session_id = store.issue_session_id().await?;
    info!("Issued session id {}", session_id);

    Ok(Json(json!({ "sessionId": session_id })))
}
