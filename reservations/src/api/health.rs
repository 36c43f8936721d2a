//! Health check endpoint.

use super::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

/// Liveness with store diagnostics.
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// { "status": "ok", "pendingEffects": 0 }
/// ```
///
/// 503 with `"status": "shutting_down"` once shutdown has begun.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let pending = state.store.pending_effects();

    if state.store.is_shutting_down() {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "shutting_down", "pendingEffects": pending })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "pendingEffects": pending })),
    )
}
