//! Booking wizard sessions.
//!
//! - POST /api/v1/bookings - Open a session
//! - GET /api/v1/bookings/:id - Current session state
//! - POST /api/v1/bookings/:id/input - Apply one input
//! - POST /api/v1/bookings/:id/submit - Create the reservation

use super::error::AppError;
use super::state::{AppState, unexpected};
use crate::booking::{BookingInput, BookingWizard};
use crate::reducer::RestaurantAction;
use crate::restaurant::CreatedReservation;
use crate::types::BookingId;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;
use uuid::Uuid;

/// A session and its id
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    /// Session id
    pub id: BookingId,
    /// Session state
    pub booking: BookingWizard,
}

/// Open a booking session.
///
/// # Errors
///
/// 503 while shutting down.
pub async fn start_booking(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    let booking_id = BookingId::new();

    match state
        .dispatch(|request_id| RestaurantAction::StartBooking {
            request_id,
            booking_id,
        })
        .await?
    {
        RestaurantAction::BookingUpdated { booking, .. } => Ok((
            StatusCode::CREATED,
            Json(BookingResponse {
                id: booking_id,
                booking,
            }),
        )),
        other => Err(unexpected(&other)),
    }
}

/// Current state of a session.
///
/// # Errors
///
/// 404 for an unknown session.
pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking_id = BookingId::from_uuid(id);
    let booking = state
        .read(|s| s.booking(&booking_id).cloned())
        .await
        .ok_or_else(|| AppError::not_found("Booking", booking_id))?;

    Ok(Json(BookingResponse {
        id: booking_id,
        booking,
    }))
}

/// Apply one input to a session.
///
/// # Errors
///
/// 404 for an unknown session, 422 when the input is rejected by the current
/// stage, 409 on `next` from the contact stage or after submission.
pub async fn apply_input(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<BookingInput>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking_id = BookingId::from_uuid(id);

    match state
        .dispatch(|request_id| RestaurantAction::UpdateBooking {
            request_id,
            booking_id,
            input,
        })
        .await?
    {
        RestaurantAction::BookingUpdated { booking, .. } => Ok(Json(BookingResponse {
            id: booking_id,
            booking,
        })),
        other => Err(unexpected(&other)),
    }
}

/// Submit a session from the contact stage.
///
/// # Errors
///
/// 422 for missing contact details, 409 if the session is not at the contact
/// stage or its table was taken.
pub async fn submit_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<CreatedReservation>), AppError> {
    let booking_id = BookingId::from_uuid(id);

    match state
        .dispatch(|request_id| RestaurantAction::SubmitBooking {
            request_id,
            booking_id,
        })
        .await?
    {
        RestaurantAction::BookingSubmitted { created, .. } => Ok((StatusCode::CREATED, Json(created))),
        other => Err(unexpected(&other)),
    }
}
