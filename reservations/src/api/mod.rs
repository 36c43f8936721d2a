//! HTTP JSON API over the restaurant store.
//!
//! Mutations are sent to the store as commands and answered with the outcome
//! event carrying the same request id; reads go straight to the store state.

pub mod admin;
pub mod bookings;
pub mod error;
pub mod extractors;
pub mod health;
pub mod reservations;
pub mod router;
pub mod state;
pub mod tables;

pub use error::AppError;
pub use router::build_router;
pub use state::AppState;
