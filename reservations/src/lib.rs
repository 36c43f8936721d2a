//! # Alrock Reservations
//!
//! Table reservations for Alrock Burger: twenty tables, a three-stage booking
//! wizard, guest cancellations and an admin view.
//!
//! ## Architecture
//!
//! - **Domain** ([`types`], [`tables`], [`reservations`], [`availability`],
//!   [`floor_plan`], [`booking`], [`cancellation`], [`admin`]): plain values
//!   and validating operations, no I/O
//! - **Aggregate** ([`restaurant::Restaurant`]): the cross-entity operations,
//!   each atomic over tables and reservations
//! - **Reducer** ([`reducer`]): commands in, outcome events out as effects
//! - **Store** ([`RestaurantStore`]): serialises every mutation
//! - **HTTP** ([`api`]): axum handlers dispatching commands to the store

pub mod admin;
pub mod api;
pub mod availability;
pub mod booking;
pub mod cancellation;
pub mod config;
pub mod error;
pub mod floor_plan;
pub mod metrics;
pub mod reducer;
pub mod reservations;
pub mod restaurant;
pub mod seed;
pub mod tables;
pub mod types;

pub use error::ReservationError;
pub use reducer::{
    BookingSettings, RestaurantAction, RestaurantEnvironment, RestaurantReducer, RestaurantState,
};
pub use restaurant::Restaurant;

use alrock_runtime::Store;

/// The store holding the restaurant
pub type RestaurantStore =
    Store<RestaurantState, RestaurantAction, RestaurantEnvironment, RestaurantReducer>;

/// Actions kept for late subscribers; every in-flight HTTP request listens
///
/// A request that falls more than this many outcomes behind can miss its own
/// and answer 408 although its command was applied. A timeout is never proof
/// that a reservation was not created or cancelled.
const ACTION_BROADCAST_CAPACITY: usize = 256;

/// Build a store over `restaurant` with no booking sessions
#[must_use]
pub fn build_store(restaurant: Restaurant, environment: RestaurantEnvironment) -> RestaurantStore {
    Store::with_broadcast_capacity(
        RestaurantState::new(restaurant),
        RestaurantReducer::new(),
        environment,
        ACTION_BROADCAST_CAPACITY,
    )
}
