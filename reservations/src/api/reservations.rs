//! Reservation endpoints.
//!
//! - POST /api/v1/reservations - Book a table in one call
//! - GET /api/v1/reservations?status=&q= - Filtered list (admin)
//! - GET /api/v1/reservations/lookup?term= - Find a reservation to cancel
//! - PATCH /api/v1/reservations/:id - Override the status (admin)
//! - POST /api/v1/reservations/:id/cancel - Cancel with a reason

use super::error::AppError;
use super::extractors::AdminAccess;
use super::state::{AppState, unexpected};
use crate::admin::{ReservationFilter, StatusFilter, filter_reservations};
use crate::booking::BookingRequest;
use crate::cancellation::CancellationReason;
use crate::reducer::RestaurantAction;
use crate::restaurant::{CancellationOutcome, CreatedReservation};
use crate::types::{Reservation, ReservationId, ReservationStatus};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

// ============================================================================
// Request Types
// ============================================================================

/// Query string of the admin list
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// `all` or a reservation status
    pub status: Option<String>,
    /// Search text over name, email and phone
    pub q: Option<String>,
}

/// Query string of the cancellation lookup
#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    /// Email, phone or reservation id
    pub term: String,
}

/// Admin status override
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    /// New status
    pub status: ReservationStatus,
}

/// Cancellation form
#[derive(Debug, Deserialize)]
pub struct CancelRequest {
    /// One of the reason labels
    pub reason: String,
    /// Free text, required for `Otro`
    #[serde(default)]
    pub details: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Book a table from a complete request.
///
/// # Errors
///
/// 422 for a field failing the booking gates, 409 if the table was taken in
/// the meantime.
pub async fn create_reservation(
    State(state): State<AppState>,
    Json(request): Json<BookingRequest>,
) -> Result<(StatusCode, Json<CreatedReservation>), AppError> {
    tracing::info!(table_id = %request.table_id, party_size = request.party_size, "Creating reservation");

    match state
        .dispatch(|request_id| RestaurantAction::CreateReservation {
            request_id,
            request,
        })
        .await?
    {
        RestaurantAction::ReservationCreated { created, .. } => Ok((StatusCode::CREATED, Json(created))),
        other => Err(unexpected(&other)),
    }
}

/// Admin list filtered by status and search text.
///
/// # Errors
///
/// 401 without the admin password, 422 for an unknown status.
pub async fn list_reservations(
    _admin: AdminAccess,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Reservation>>, AppError> {
    let filter = ReservationFilter {
        status: query
            .status
            .as_deref()
            .map(str::parse::<StatusFilter>)
            .transpose()?
            .unwrap_or(StatusFilter::All),
        search: query.q.unwrap_or_default(),
    };

    let reservations = state
        .read(|s| {
            filter_reservations(s.restaurant.reservations().list(), &filter)
                .into_iter()
                .cloned()
                .collect()
        })
        .await;

    Ok(Json(reservations))
}

/// Find the reservation a guest wants to cancel.
///
/// # Errors
///
/// 422 for an empty term, 404 when nothing matches, 409 when several do.
pub async fn lookup_reservation(
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
) -> Result<Json<Reservation>, AppError> {
    let reservation = state
        .read(|s| s.restaurant.reservations().find_by_term(&query.term).cloned())
        .await?;
    Ok(Json(reservation))
}

/// Admin override of a reservation status.
///
/// # Errors
///
/// 401 without the admin password, 404 for an unknown reservation.
pub async fn update_reservation(
    _admin: AdminAccess,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<Reservation>, AppError> {
    match state
        .dispatch(|request_id| RestaurantAction::UpdateReservationStatus {
            request_id,
            reservation_id: ReservationId::from_string(id),
            status: body.status,
        })
        .await?
    {
        RestaurantAction::ReservationStatusUpdated { reservation, .. } => Ok(Json(reservation)),
        other => Err(unexpected(&other)),
    }
}

/// Cancel a reservation and release its table.
///
/// # Errors
///
/// 422 for an unknown reason or `Otro` without details, 404 for an unknown
/// reservation, 409 if it is already cancelled.
pub async fn cancel_reservation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<CancelRequest>,
) -> Result<Json<CancellationOutcome>, AppError> {
    let reason = CancellationReason::from_parts(&body.reason, body.details.as_deref())?;

    match state
        .dispatch(|request_id| RestaurantAction::CancelReservation {
            request_id,
            reservation_id: ReservationId::from_string(id),
            reason,
        })
        .await?
    {
        RestaurantAction::ReservationCancelled { outcome, .. } => Ok(Json(outcome)),
        other => Err(unexpected(&other)),
    }
}
