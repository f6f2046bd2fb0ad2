//! # Computer Club Runtime
//!
//! Runtime for the computer club simulator.
//!
//! This crate provides the [`Store`] that coordinates reducer execution: it
//! owns the state, feeds it one action at a time, and hands the produced
//! output records back to the caller. Writing those records anywhere is the
//! caller's job.
//!
//! ## Core Components
//!
//! - **Store**: Owns state, reducer and environment; processes actions to completion
//! - **Metrics**: Metric descriptions and an optional Prometheus recorder
//!
//! ## Example
//!
//! ```ignore
//! use computer_club_runtime::Store;
//!
//! let mut store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action and collect what it produced
//! let outputs = store.send(Action::DoSomething)?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field);
//! ```

use computer_club_core::{SmallVec, reducer::Reducer};

/// Prometheus metrics for observability
pub mod metrics;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError<E> {
        /// The reducer refused an action with a fatal error
        ///
        /// The store must not be used for further actions after this; the
        /// state may hold a partially applied transition.
        #[error("action #{sequence} could not be applied")]
        Reducer {
            /// 1-based position of the failing action
            sequence: u64,
            /// The reducer's error
            #[source]
            source: E,
        },
    }
}

pub use error::StoreError;

/// Store module - The runtime for reducers
///
/// Processing is strictly sequential: every action runs to completion, and
/// its outputs are returned, before the next action is accepted. There is one
/// writer and no concurrent readers, so the state needs no locking.
pub mod store {
    use super::{Reducer, SmallVec, StoreError};
    use std::time::Instant;

    /// The Store - runtime coordinator for a reducer
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    ///
    /// # Example
    ///
    /// ```ignore
    /// let mut store = Store::new(
    ///     ClubState::new(config),
    ///     ClubReducer::new(),
    ///     ClubEnvironment::from_config(&config),
    /// );
    ///
    /// let outputs = store.send(ClubAction::Open)?;
    /// ```
    #[derive(Debug)]
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: S,
        reducer: R,
        environment: E,
        processed: u64,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        /// Create a new store with initial state, reducer, and environment
        #[must_use]
        pub const fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self {
                state: initial_state,
                reducer,
                environment,
                processed: 0,
            }
        }

        /// Send an action through the reducer
        ///
        /// Returns the output records the transition produced, in order.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::Reducer`] if the reducer fails fatally.
        #[tracing::instrument(skip(self, action), name = "store_send", fields(sequence = self.processed + 1))]
        pub fn send(&mut self, action: A) -> Result<SmallVec<[R::Output; 4]>, StoreError<R::Error>> {
            self.processed += 1;
            tracing::trace!("Processing action");

            let start = Instant::now();
            let result = self.reducer.reduce(&mut self.state, action, &self.environment);
            let duration = start.elapsed();

            match result {
                Ok(outputs) => {
                    crate::metrics::StoreMetrics::record_action(duration, outputs.len());
                    tracing::trace!("Reducer completed, returned {} outputs", outputs.len());
                    Ok(outputs)
                },
                Err(source) => {
                    crate::metrics::StoreMetrics::record_error();
                    tracing::error!("Reducer failed fatally");
                    Err(StoreError::Reducer {
                        sequence: self.processed,
                        source,
                    })
                },
            }
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let queued = store.state(|s| s.queue.len());
        /// ```
        pub fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            f(&self.state)
        }

        /// Number of actions sent so far, including a failed one
        #[must_use]
        pub const fn processed(&self) -> u64 {
            self.processed
        }

        /// Consume the store and return the final state
        #[must_use]
        pub fn into_state(self) -> S {
            self.state
        }
    }
}

pub use store::Store;
