//! # Alrock Testing
//!
//! Testing utilities for reducers and stores.
//!
//! This crate provides:
//! - Deterministic implementations of the environment traits
//! - A Given-When-Then harness for reducers ([`ReducerTest`])
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use alrock_testing::{test_clock, ReducerTest};
//!
//! ReducerTest::new(RestaurantReducer)
//!     .with_env(test_environment())
//!     .given_state(RestaurantState::seeded())
//!     .when_action(action)
//!     .then_state(|s| assert_eq!(s.restaurant.reservations().len(), 4))
//!     .run();
//! ```

use alrock_core::environment::{Clock, Latency};
use chrono::{DateTime, Utc};


pub use reducer_test::{ReducerTest, assertions};

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Latency, Utc};
    use futures::future::BoxFuture;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex, PoisonError};
    use std::time::Duration;

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use alrock_testing::mocks::FixedClock;
    /// use alrock_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// Never in practice: the timestamp is a literal.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// Clock that only moves when told to
    ///
    /// Clones share the same time, so a test can keep one copy and hand
    /// another to the environment.
    #[derive(Debug, Clone)]
    pub struct ManualClock {
        time: Arc<Mutex<DateTime<Utc>>>,
    }

    impl ManualClock {
        /// Create a clock starting at `time`
        #[must_use]
        pub fn new(time: DateTime<Utc>) -> Self {
            Self {
                time: Arc::new(Mutex::new(time)),
            }
        }

        /// Move the clock forward
        pub fn advance(&self, by: chrono::Duration) {
            let mut time = self.time.lock().unwrap_or_else(PoisonError::into_inner);
            *time += by;
        }

        /// Jump to an absolute time
        pub fn set(&self, to: DateTime<Utc>) {
            *self.time.lock().unwrap_or_else(PoisonError::into_inner) = to;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.time.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }

    /// Latency backed by `tokio::time::sleep`
    ///
    /// Pair with `#[tokio::test(start_paused = true)]` to observe the pause
    /// without slowing the suite down.
    #[derive(Debug, Clone, Copy)]
    pub struct SimulatedLatency(pub Duration);

    impl Latency for SimulatedLatency {
        fn pause(&self) -> BoxFuture<'static, ()> {
            Box::pin(tokio::time::sleep(self.0))
        }
    }

    /// Latency that never waits but records how often it was requested
    #[derive(Debug, Clone, Default)]
    pub struct CountingLatency {
        calls: Arc<AtomicUsize>,
    }

    impl CountingLatency {
        /// Number of pauses requested so far
        #[must_use]
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Latency for CountingLatency {
        fn pause(&self) -> BoxFuture<'static, ()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(futures::future::ready(()))
        }
    }
}

// Re-export commonly used items
pub use mocks::{CountingLatency, FixedClock, ManualClock, SimulatedLatency, test_clock};
