//! Business metrics for the reservation service.
//!
//! # Exported Metrics
//!
//! ## Counters
//! - `alrock_reservations_total{outcome}` - Reservation attempts (created, rejected)
//! - `alrock_cancellations_total{charge}` - Cancellations by charge (free, half, full)
//!
//! ## Runtime
//! - `store.commands.total`, `store.effects.executed{type}`,
//!   `store.reducer.duration_seconds` - recorded by the store

use metrics::{describe_counter, describe_histogram};

/// Initialize and register all business metrics descriptions.
///
/// This should be called once at application startup, before any metrics are recorded.
pub fn register_business_metrics() {
    describe_counter!(
        "alrock_reservations_total",
        "Reservation attempts by outcome (created, rejected)"
    );
    describe_counter!(
        "alrock_cancellations_total",
        "Cancellations by late-cancellation charge (free, half, full)"
    );

    describe_counter!("store.commands.total", "Actions sent to the store");
    describe_counter!("store.effects.executed", "Effects executed by type");
    describe_histogram!(
        "store.reducer.duration_seconds",
        "Time spent inside the reducer per action"
    );

    tracing::info!("Business metrics registered");
}
