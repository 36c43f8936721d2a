//! Admin dashboard endpoint.

use super::extractors::AdminAccess;
use super::state::AppState;
use crate::restaurant::DashboardStats;
use axum::{Json, extract::State};

/// Dashboard figures for the restaurant's current local date.
///
/// Requires the `X-Admin-Password` header.
pub async fn stats(_admin: AdminAccess, State(state): State<AppState>) -> Json<DashboardStats> {
    let today = state.settings.today(state.clock.now());
    Json(state.read(|s| s.restaurant.stats(today)).await)
}
