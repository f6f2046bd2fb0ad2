//! Computer club day simulator.
//!
//! Replays a chronological log of client events (arrive, sit, wait, leave)
//! against a club with a fixed number of places, and produces:
//!
//! - an echo of every input line
//! - synthesized events: forced departures (11), seatings from the queue
//!   (12) and business-rule notices (13)
//! - a per-place revenue and busy-time report at closing
//!
//! The club logic is a [`ClubReducer`] driven by a
//! [`Store`](computer_club_runtime::Store); parsing and writing live at the
//! edges in [`input`] and [`output`].
//!
//! # Quick Start
//!
//! ```
//! use computer_club::{OutputFormat, simulation};
//!
//! # fn example() -> Result<(), computer_club::SimulationError> {
//! let log = "\
//! 1
//! 09:00 19:00
//! 10
//! 09:41 1 client1
//! 09:48 2 client1 1
//! ";
//! let mut report = Vec::new();
//! simulation::run(log.as_bytes(), &mut report, OutputFormat::Text)?;
//!
//! let report = String::from_utf8_lossy(&report);
//! assert!(report.ends_with("19:00 11 client1\n19:00\n1 100 09:12\n"));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod config;
pub mod error;
pub mod input;
pub mod metrics;
pub mod output;
pub mod reducer;
pub mod settlement;
pub mod simulation;
pub mod types;

// Re-export commonly used types
pub use error::{ClubError, ConfigError, InputError, SimulationError};
pub use output::{OutputFormat, OutputSink};
pub use reducer::{ClubEnvironment, ClubReducer, Outputs};
pub use types::{
    ClubAction, ClubConfig, ClubOutput, ClubState, EventKind, InputEvent, Minutes, Notice, Place,
    PlaceId, Presence, Settlement,
};
