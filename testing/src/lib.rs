//! # Computer Club Testing
//!
//! Testing utilities and helpers for the computer club simulator.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - A Given-When-Then harness for reducers
//! - Assertion helpers for output records
//! - Property-based testing strategies
//!
//! ## Example
//!
//! ```ignore
//! use computer_club_testing::{ReducerTest, test_tariff};
//!
//! ReducerTest::new(ClubReducer::new())
//!     .with_env(ClubEnvironment::new(test_tariff()))
//!     .given_state(ClubState::new(config))
//!     .when_action(ClubAction::Open)
//!     .then_outputs(|outputs| assert_eq!(outputs.len(), 1))
//!     .run();
//! ```

use computer_club_core::environment::{HourlyTariff, Tariff};


pub use reducer_test::{ReducerTest, assertions};

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{HourlyTariff, Tariff};
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Tariff that charges the same amount for every interval
    ///
    /// Useful when a test is about *which* intervals were settled rather than
    /// how much they cost. It also counts how many intervals it was asked to
    /// bill.
    ///
    /// # Example
    ///
    /// ```
    /// use computer_club_testing::mocks::FlatTariff;
    /// use computer_club_core::environment::Tariff;
    ///
    /// let tariff = FlatTariff::new(7);
    /// assert_eq!(tariff.charge(1), 7);
    /// assert_eq!(tariff.charge(500), 7);
    /// assert_eq!(tariff.charges(), 2);
    /// ```
    #[derive(Debug, Default)]
    pub struct FlatTariff {
        amount: u64,
        charges: AtomicU32,
    }

    impl FlatTariff {
        /// Create a flat tariff charging `amount` per interval
        #[must_use]
        pub const fn new(amount: u64) -> Self {
            Self {
                amount,
                charges: AtomicU32::new(0),
            }
        }

        /// Number of intervals billed so far
        #[must_use]
        pub fn charges(&self) -> u32 {
            self.charges.load(Ordering::Relaxed)
        }
    }

    impl Tariff for FlatTariff {
        fn charge(&self, _minutes: u32) -> u64 {
            self.charges.fetch_add(1, Ordering::Relaxed);
            self.amount
        }
    }

    /// Default hourly tariff for tests (10 per started hour)
    #[must_use]
    pub const fn test_tariff() -> HourlyTariff {
        HourlyTariff::new(10)
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use proptest::prelude::*;

    /// Non-decreasing minute offsets within `start..=end`.
    ///
    /// Produces between `min_len` and `max_len` timestamps, sorted ascending,
    /// the shape an ordered event log needs.
    pub fn sorted_minutes(
        start: u32,
        end: u32,
        min_len: usize,
        max_len: usize,
    ) -> impl Strategy<Value = Vec<u32>> {
        prop::collection::vec(start..=end, min_len..=max_len).prop_map(|mut minutes| {
            minutes.sort_unstable();
            minutes
        })
    }

    /// Short client names drawn from a small alphabet so that collisions,
    /// repeats and ordering ties actually happen.
    pub fn client_name() -> impl Strategy<Value = String> {
        "[a-e][0-9]{0,2}"
    }
}

// Re-export commonly used items
pub use mocks::{FlatTariff, test_tariff};
