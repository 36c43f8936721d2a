//! Application state for the HTTP server.

use super::error::AppError;
use crate::RestaurantStore;
use crate::admin::AdminGate;
use crate::reducer::{BookingSettings, RestaurantAction, RestaurantState};
use crate::types::RequestId;
use alrock_core::environment::Clock;
use std::sync::Arc;
use std::time::Duration;

/// Application state shared across all HTTP handlers.
///
/// Cloned (cheaply via Arc) for each request.
#[derive(Clone)]
pub struct AppState {
    /// Store serialising every mutation
    pub store: Arc<RestaurantStore>,
    /// Password gate for admin routes
    pub admin: Arc<AdminGate>,
    /// Clock used for read-side "today"
    pub clock: Arc<dyn Clock>,
    /// Booking settings, shared with the reducer
    pub settings: BookingSettings,
    /// How long a handler waits for a command outcome
    pub request_timeout: Duration,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(
        store: Arc<RestaurantStore>,
        admin: Arc<AdminGate>,
        clock: Arc<dyn Clock>,
        settings: BookingSettings,
        request_timeout: Duration,
    ) -> Self {
        Self {
            store,
            admin,
            clock,
            settings,
            request_timeout,
        }
    }

    /// Send a command and wait for its outcome event
    ///
    /// The command is built with a fresh request id; the first event carrying
    /// that id is returned, except [`RestaurantAction::CommandRejected`], which
    /// becomes an error.
    ///
    /// # Errors
    ///
    /// The rejection's domain error, or the store error if the outcome never
    /// arrived.
    pub async fn dispatch<F>(&self, command: F) -> Result<RestaurantAction, AppError>
    where
        F: FnOnce(RequestId) -> RestaurantAction,
    {
        let request_id = RequestId::new();
        let outcome = self
            .store
            .send_and_wait_for(
                command(request_id),
                |action| action.is_outcome_for(request_id),
                self.request_timeout,
            )
            .await?;

        match outcome {
            RestaurantAction::CommandRejected { error, .. } => Err(error.into()),
            event => Ok(event),
        }
    }

    /// Read from the current state
    pub async fn read<T, F>(&self, f: F) -> T
    where
        F: FnOnce(&RestaurantState) -> T,
    {
        self.store.state(f).await
    }
}

/// An outcome event other than the one the handler asked for
pub(crate) fn unexpected(action: &RestaurantAction) -> AppError {
    AppError::internal("Unexpected action received")
        .with_source(anyhow::anyhow!("unexpected outcome: {action:?}"))
}
