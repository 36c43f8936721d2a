//! Restaurant reducer.
//!
//! Commands and the events they produce share one action enum. A command is
//! validated and applied to [`RestaurantState`] in a single `reduce` call; its
//! outcome event (or [`RestaurantAction::CommandRejected`]) is emitted through
//! an effect so callers waiting on the store can observe it by request id.
//! Events carry snapshots and are no-ops when they come back into the reducer.

use crate::booking::{BookingInput, BookingRequest, BookingWizard};
use crate::cancellation::CancellationReason;
use crate::error::ReservationError;
use crate::restaurant::{CancellationOutcome, CreatedReservation, Restaurant};
use crate::types::{
    BookingId, RequestId, Reservation, ReservationId, ReservationStatus, Table, TableId,
    TableStatus,
};
use alrock_core::environment::{Clock, Latency, NoLatency};
use alrock_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Offset, Utc};
use std::collections::HashMap;
use std::sync::Arc;

// ============================================================================
// State
// ============================================================================

/// Restaurant plus the open booking wizard sessions
#[derive(Clone, Debug, Default)]
pub struct RestaurantState {
    /// Tables and reservations
    pub restaurant: Restaurant,
    /// Wizard sessions by id
    // TODO: evict sessions that never reach Submitted once they sit idle past a TTL
    pub bookings: HashMap<BookingId, BookingWizard>,
}

impl RestaurantState {
    /// State with no booking sessions
    #[must_use]
    pub fn new(restaurant: Restaurant) -> Self {
        Self {
            restaurant,
            bookings: HashMap::new(),
        }
    }

    /// A booking session, if it exists
    #[must_use]
    pub fn booking(&self, id: &BookingId) -> Option<&BookingWizard> {
        self.bookings.get(id)
    }
}

// ============================================================================
// Actions (Commands + Events)
// ============================================================================

/// Actions for the restaurant reducer
#[derive(Clone, Debug)]
pub enum RestaurantAction {
    // Commands
    /// Create a reservation from a complete request, through the wizard gating
    CreateReservation {
        /// Correlation id
        request_id: RequestId,
        /// Everything the guest entered
        request: BookingRequest,
    },

    /// Open a booking wizard session
    StartBooking {
        /// Correlation id
        request_id: RequestId,
        /// Id for the new session
        booking_id: BookingId,
    },

    /// Feed one input to a wizard session
    UpdateBooking {
        /// Correlation id
        request_id: RequestId,
        /// Session
        booking_id: BookingId,
        /// Input
        input: BookingInput,
    },

    /// Submit a wizard session from the contact stage
    SubmitBooking {
        /// Correlation id
        request_id: RequestId,
        /// Session
        booking_id: BookingId,
    },

    /// Return a submitted session to its first stage
    ResetBooking {
        /// Session
        booking_id: BookingId,
    },

    /// Cancel a reservation
    CancelReservation {
        /// Correlation id
        request_id: RequestId,
        /// Reservation to cancel
        reservation_id: ReservationId,
        /// Why
        reason: CancellationReason,
    },

    /// Admin override of a reservation status
    UpdateReservationStatus {
        /// Correlation id
        request_id: RequestId,
        /// Reservation
        reservation_id: ReservationId,
        /// New status
        status: ReservationStatus,
    },

    /// Admin change of a table status
    SetTableStatus {
        /// Correlation id
        request_id: RequestId,
        /// Table
        table_id: TableId,
        /// New status
        status: TableStatus,
        /// Hold end, required for `reserved`
        reserved_until: Option<DateTime<Utc>>,
    },

    // Events
    /// A reservation was created by [`RestaurantAction::CreateReservation`]
    ReservationCreated {
        /// Correlation id
        request_id: RequestId,
        /// Reservation and held table
        created: CreatedReservation,
    },

    /// A wizard session changed
    BookingUpdated {
        /// Correlation id
        request_id: RequestId,
        /// Session
        booking_id: BookingId,
        /// Session after the change
        booking: BookingWizard,
    },

    /// A wizard session was submitted
    BookingSubmitted {
        /// Correlation id
        request_id: RequestId,
        /// Session
        booking_id: BookingId,
        /// Reservation and held table
        created: CreatedReservation,
    },

    /// A reservation was cancelled
    ReservationCancelled {
        /// Correlation id
        request_id: RequestId,
        /// Cancelled reservation, released table and charge
        outcome: CancellationOutcome,
    },

    /// A reservation status was overridden
    ReservationStatusUpdated {
        /// Correlation id
        request_id: RequestId,
        /// Reservation after the change
        reservation: Reservation,
    },

    /// A table status was changed
    TableStatusChanged {
        /// Correlation id
        request_id: RequestId,
        /// Table after the change
        table: Table,
    },

    /// A command failed validation; state is unchanged
    CommandRejected {
        /// Correlation id
        request_id: RequestId,
        /// Why
        error: ReservationError,
    },
}

impl RestaurantAction {
    /// Whether this is an event produced for the command with `request_id`
    #[must_use]
    pub fn is_outcome_for(&self, request_id: RequestId) -> bool {
        match self {
            Self::ReservationCreated { request_id: id, .. }
            | Self::BookingUpdated { request_id: id, .. }
            | Self::BookingSubmitted { request_id: id, .. }
            | Self::ReservationCancelled { request_id: id, .. }
            | Self::ReservationStatusUpdated { request_id: id, .. }
            | Self::TableStatusChanged { request_id: id, .. }
            | Self::CommandRejected { request_id: id, .. } => *id == request_id,
            _ => false,
        }
    }
}

// ============================================================================
// Environment
// ============================================================================

/// Timing and locale settings of the booking flow
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BookingSettings {
    /// How long a new reservation holds its table
    pub table_hold: Duration,
    /// How long a submitted wizard stays on its confirmation
    pub reset_delay: std::time::Duration,
    /// Restaurant local time
    pub utc_offset: FixedOffset,
}

impl BookingSettings {
    /// The restaurant's local date at `now`
    #[must_use]
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.utc_offset).date_naive()
    }
}

impl Default for BookingSettings {
    fn default() -> Self {
        Self {
            table_hold: Duration::hours(2),
            reset_delay: std::time::Duration::from_secs(3),
            utc_offset: FixedOffset::east_opt(3600).unwrap_or_else(|| Utc.fix()),
        }
    }
}

/// Environment dependencies for the restaurant reducer
#[derive(Clone)]
pub struct RestaurantEnvironment {
    /// Clock for timestamps, holds and "today"
    pub clock: Arc<dyn Clock>,
    /// Pause before a cancellation is reported
    pub latency: Arc<dyn Latency>,
    /// Booking settings
    pub settings: BookingSettings,
}

impl RestaurantEnvironment {
    /// Creates a new `RestaurantEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, latency: Arc<dyn Latency>, settings: BookingSettings) -> Self {
        Self {
            clock,
            latency,
            settings,
        }
    }

    /// Environment of the server: no cancellation pause
    #[must_use]
    pub fn live(clock: Arc<dyn Clock>, settings: BookingSettings) -> Self {
        Self::new(clock, Arc::new(NoLatency), settings)
    }
}

// ============================================================================
// Reducer
// ============================================================================

/// Reducer for the restaurant
#[derive(Clone, Debug, Default)]
pub struct RestaurantReducer;

impl RestaurantReducer {
    /// Creates a new `RestaurantReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn create_reservation(
        state: &mut RestaurantState,
        request: &BookingRequest,
        env: &RestaurantEnvironment,
    ) -> Result<CreatedReservation, ReservationError> {
        let now = env.clock.now();
        let new = BookingWizard::complete(
            request,
            state.restaurant.tables().list(),
            env.settings.today(now),
        )?;
        state
            .restaurant
            .create_reservation(new, now, env.settings.table_hold)
    }

    fn update_booking(
        state: &mut RestaurantState,
        booking_id: BookingId,
        input: BookingInput,
        env: &RestaurantEnvironment,
    ) -> Result<BookingWizard, ReservationError> {
        let today = env.settings.today(env.clock.now());
        let RestaurantState {
            restaurant,
            bookings,
        } = state;

        let booking = bookings
            .get_mut(&booking_id)
            .ok_or_else(|| ReservationError::not_found("Booking", booking_id))?;
        booking.apply(input, restaurant.tables().list(), today)?;
        Ok(booking.clone())
    }

    fn submit_booking(
        state: &mut RestaurantState,
        booking_id: BookingId,
        env: &RestaurantEnvironment,
    ) -> Result<CreatedReservation, ReservationError> {
        let RestaurantState {
            restaurant,
            bookings,
        } = state;

        let booking = bookings
            .get_mut(&booking_id)
            .ok_or_else(|| ReservationError::not_found("Booking", booking_id))?;
        let new = booking.submission()?;
        let created = restaurant.create_reservation(new, env.clock.now(), env.settings.table_hold)?;
        booking.mark_submitted(created.reservation.id.clone());
        Ok(created)
    }

    fn record_creation(result: &Result<CreatedReservation, ReservationError>) {
        let outcome = if result.is_ok() { "created" } else { "rejected" };
        metrics::counter!("alrock_reservations_total", "outcome" => outcome).increment(1);
    }

    fn reject(request_id: RequestId, error: ReservationError) -> SmallVec<[Effect<RestaurantAction>; 4]> {
        tracing::warn!(%request_id, code = error.code(), %error, "Command rejected");
        smallvec![emit(RestaurantAction::CommandRejected { request_id, error })]
    }

    fn respond(
        request_id: RequestId,
        result: Result<RestaurantAction, ReservationError>,
    ) -> SmallVec<[Effect<RestaurantAction>; 4]> {
        match result {
            Ok(event) => smallvec![emit(event)],
            Err(error) => Self::reject(request_id, error),
        }
    }
}

/// Report `action` back to the store as soon as the effect runs
fn emit(action: RestaurantAction) -> Effect<RestaurantAction> {
    Effect::future(async move { Some(action) })
}

impl Reducer for RestaurantReducer {
    type State = RestaurantState;
    type Action = RestaurantAction;
    type Environment = RestaurantEnvironment;

    #[allow(clippy::too_many_lines)] // One arm per command
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Reservations ==========
            RestaurantAction::CreateReservation {
                request_id,
                request,
            } => {
                let result = Self::create_reservation(state, &request, env);
                Self::record_creation(&result);
                Self::respond(
                    request_id,
                    result.map(|created| RestaurantAction::ReservationCreated {
                        request_id,
                        created,
                    }),
                )
            },

            RestaurantAction::CancelReservation {
                request_id,
                reservation_id,
                reason,
            } => {
                let now = env.clock.now();
                match state.restaurant.cancel_reservation(
                    &reservation_id,
                    &reason,
                    now,
                    env.settings.utc_offset,
                ) {
                    Ok(outcome) => {
                        metrics::counter!(
                            "alrock_cancellations_total",
                            "charge" => outcome.charge.as_str()
                        )
                        .increment(1);

                        let pause = env.latency.pause();
                        smallvec![Effect::future(async move {
                            pause.await;
                            Some(RestaurantAction::ReservationCancelled {
                                request_id,
                                outcome,
                            })
                        })]
                    },
                    Err(error) => Self::reject(request_id, error),
                }
            },

            RestaurantAction::UpdateReservationStatus {
                request_id,
                reservation_id,
                status,
            } => Self::respond(
                request_id,
                state
                    .restaurant
                    .update_reservation_status(&reservation_id, status)
                    .map(|reservation| RestaurantAction::ReservationStatusUpdated {
                        request_id,
                        reservation,
                    }),
            ),

            RestaurantAction::SetTableStatus {
                request_id,
                table_id,
                status,
                reserved_until,
            } => Self::respond(
                request_id,
                state
                    .restaurant
                    .set_table_status(&table_id, status, reserved_until)
                    .map(|table| RestaurantAction::TableStatusChanged { request_id, table }),
            ),

            // ========== Booking wizard ==========
            RestaurantAction::StartBooking {
                request_id,
                booking_id,
            } => {
                if state.bookings.contains_key(&booking_id) {
                    return Self::reject(
                        request_id,
                        ReservationError::InvalidState(format!("booking {booking_id} already exists")),
                    );
                }

                let booking = BookingWizard::new();
                state.bookings.insert(booking_id, booking.clone());
                tracing::debug!(%booking_id, "Booking started");

                smallvec![emit(RestaurantAction::BookingUpdated {
                    request_id,
                    booking_id,
                    booking,
                })]
            },

            RestaurantAction::UpdateBooking {
                request_id,
                booking_id,
                input,
            } => Self::respond(
                request_id,
                Self::update_booking(state, booking_id, input, env).map(|booking| {
                    RestaurantAction::BookingUpdated {
                        request_id,
                        booking_id,
                        booking,
                    }
                }),
            ),

            RestaurantAction::SubmitBooking {
                request_id,
                booking_id,
            } => {
                let result = Self::submit_booking(state, booking_id, env);
                Self::record_creation(&result);

                match result {
                    Ok(created) => smallvec![
                        emit(RestaurantAction::BookingSubmitted {
                            request_id,
                            booking_id,
                            created,
                        }),
                        Effect::delay(
                            env.settings.reset_delay,
                            RestaurantAction::ResetBooking { booking_id },
                        ),
                    ],
                    Err(error) => Self::reject(request_id, error),
                }
            },

            RestaurantAction::ResetBooking { booking_id } => {
                if let Some(booking) = state.bookings.get_mut(&booking_id) {
                    booking.reset();
                    tracing::debug!(%booking_id, "Booking reset");
                }
                SmallVec::new()
            },

            // ========== Events ==========
            RestaurantAction::ReservationCreated { .. }
            | RestaurantAction::BookingUpdated { .. }
            | RestaurantAction::BookingSubmitted { .. }
            | RestaurantAction::ReservationCancelled { .. }
            | RestaurantAction::ReservationStatusUpdated { .. }
            | RestaurantAction::TableStatusChanged { .. }
            | RestaurantAction::CommandRejected { .. } => SmallVec::new(),
        }
    }
}
