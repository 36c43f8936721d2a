//! Router configuration.

use super::health::health_check;
use super::state::AppState;
use super::{admin, bookings, reservations, tables};
use axum::{
    Router,
    routing::{get, patch, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the complete Axum router.
///
/// Everything except `/health` lives under `/api/v1`. The `/metrics` route is
/// added by the server binary, which owns the Prometheus recorder.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Reservations
        .route(
            "/reservations",
            post(reservations::create_reservation).get(reservations::list_reservations),
        )
        .route("/reservations/lookup", get(reservations::lookup_reservation))
        .route("/reservations/:id", patch(reservations::update_reservation))
        .route("/reservations/:id/cancel", post(reservations::cancel_reservation))
        // Tables
        .route("/tables", get(tables::list_tables))
        .route("/tables/floor-plan", get(tables::floor_plan))
        .route("/tables/:id", patch(tables::update_table))
        // Booking wizard sessions
        .route("/bookings", post(bookings::start_booking))
        .route("/bookings/:id", get(bookings::get_booking))
        .route("/bookings/:id/input", post(bookings::apply_input))
        .route("/bookings/:id/submit", post(bookings::submit_booking))
        // Admin
        .route("/admin/stats", get(admin::stats));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
