//! # Computer Club Core
//!
//! Core traits for the computer club simulator.
//!
//! The simulator is built as a functional core with an imperative shell:
//! all business logic lives in a reducer, and everything that touches files,
//! terminals or clocks stays outside of it.
//!
//! ## Core Concepts
//!
//! - **State**: Owned domain state, threaded explicitly through every call
//! - **Action**: All possible inputs to a reducer
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Outputs)`
//! - **Output**: Records produced by a transition (never printed by the reducer)
//! - **Environment**: Injected policies via traits (e.g. the billing [`Tariff`])
//!
//! ## Example
//!
//! ```
//! use computer_club_core::{reducer::Reducer, smallvec, SmallVec};
//!
//! #[derive(Default)]
//! struct Turnstile {
//!     passed: u32,
//! }
//!
//! enum TurnstileAction {
//!     Push,
//! }
//!
//! struct TurnstileReducer;
//!
//! impl Reducer for TurnstileReducer {
//!     type State = Turnstile;
//!     type Action = TurnstileAction;
//!     type Environment = ();
//!     type Output = u32;
//!     type Error = std::convert::Infallible;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut Turnstile,
//!         action: TurnstileAction,
//!         _env: &(),
//!     ) -> Result<SmallVec<[u32; 4]>, Self::Error> {
//!         match action {
//!             TurnstileAction::Push => state.passed += 1,
//!         }
//!         Ok(smallvec![state.passed])
//!     }
//! }
//!
//! let mut state = Turnstile::default();
//! let outputs = TurnstileReducer.reduce(&mut state, TurnstileAction::Push, &());
//! assert_eq!(outputs.ok().map(|o| o.into_vec()), Some(vec![1]));
//! ```
//!
//! [`Tariff`]: environment::Tariff

pub use smallvec::{SmallVec, smallvec};

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Outputs)`
///
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    /// - `Output`: The records a transition produces
    /// - `Error`: Fatal failures that abort the whole run
    ///
    /// Recoverable, expected outcomes (a rejected request, a validation
    /// notice) are outputs, not errors. `Error` is reserved for malformed
    /// input and broken invariants.
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// The output record type
        type Output;

        /// The fatal error type
        type Error;

        /// Reduce an action into state changes and outputs
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns the produced output records, in order
        ///
        /// A transition that reports a recoverable problem must leave the
        /// state untouched.
        ///
        /// # Errors
        ///
        /// Returns `Self::Error` when the action cannot be applied at all.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> Result<SmallVec<[Self::Output; 4]>, Self::Error>;
    }
}

/// Environment module - Dependency injection traits
///
/// Policies a reducer needs but should not hard-code are abstracted behind
/// traits and injected via the Environment parameter.
pub mod environment {
    /// Billing policy for an occupancy interval.
    ///
    /// # Examples
    ///
    /// ```
    /// use computer_club_core::environment::{HourlyTariff, Tariff};
    ///
    /// let tariff = HourlyTariff::new(10);
    /// assert_eq!(tariff.charge(0), 0);
    /// assert_eq!(tariff.charge(60), 10);
    /// assert_eq!(tariff.charge(61), 20);
    /// ```
    pub trait Tariff: Send + Sync {
        /// Revenue for an interval of `minutes` minutes.
        fn charge(&self, minutes: u32) -> u64;
    }

    /// Charges a fixed rate per started hour.
    ///
    /// Partial hours always round up.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct HourlyTariff {
        rate: u32,
    }

    impl HourlyTariff {
        /// Create a tariff charging `rate` per started hour
        #[must_use]
        pub const fn new(rate: u32) -> Self {
            Self { rate }
        }

        /// The hourly rate
        #[must_use]
        pub const fn rate(&self) -> u32 {
            self.rate
        }
    }

    impl Tariff for HourlyTariff {
        fn charge(&self, minutes: u32) -> u64 {
            u64::from(self.rate) * u64::from(minutes.div_ceil(60))
        }
    }

    impl<T: Tariff + ?Sized> Tariff for std::sync::Arc<T> {
        fn charge(&self, minutes: u32) -> u64 {
            (**self).charge(minutes)
        }
    }
}
