//! Fatal error types.
//!
//! Everything here aborts the run. Business-rule problems (a client who is
//! not inside, a busy place, ...) are not errors in this sense; they are
//! [`Notice`](crate::types::Notice) outputs and processing continues.

use crate::types::{Minutes, PlaceId};
use computer_club_runtime::StoreError;
use std::num::ParseIntError;
use thiserror::Error;

/// Invalid club configuration
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The club must have at least one place
    #[error("place count must be positive")]
    NoPlaces,

    /// More places than the club will allocate
    #[error("place count {places} exceeds the maximum of {max}")]
    TooManyPlaces {
        /// Requested place count
        places: u32,
        /// Largest accepted place count
        max: u32,
    },

    /// Opening hours are empty or inverted
    #[error("closing time {close} is not after opening time {open}")]
    ClosesBeforeOpening {
        /// Opening time
        open: Minutes,
        /// Closing time
        close: Minutes,
    },
}

/// Malformed input log
///
/// Line numbers are 1-based and count every line of the file, header
/// included.
#[derive(Debug, Error)]
pub enum InputError {
    /// Reading the input failed
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// The file ended before the header was complete
    #[error("line {line}: missing {expected}")]
    MissingLine {
        /// Line that should have been there
        line: usize,
        /// What the line should have contained
        expected: &'static str,
    },

    /// A numeric field did not parse
    #[error("line {line}: invalid {field} {value:?}")]
    InvalidNumber {
        /// Offending line
        line: usize,
        /// Name of the field
        field: &'static str,
        /// Raw field text
        value: String,
        /// Parser error
        source: ParseIntError,
    },

    /// A time field is not `HH:MM`
    #[error("line {line}: invalid time {value:?}")]
    InvalidTime {
        /// Offending line
        line: usize,
        /// Raw field text
        value: String,
        /// Parser error
        source: chrono::ParseError,
    },

    /// Wrong number of space-separated fields
    #[error("line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        /// Offending line
        line: usize,
        /// Required field count
        expected: usize,
        /// Actual field count
        found: usize,
    },

    /// Event identifier outside `1..=4`
    #[error("line {line}: unknown event id {id:?}")]
    UnknownEventId {
        /// Offending line
        line: usize,
        /// Raw identifier
        id: String,
    },

    /// `Sit` names a place the club does not have
    #[error("line {line}: place {place} does not exist (club has {places} places)")]
    PlaceOutOfRange {
        /// Offending line
        line: usize,
        /// Requested place number
        place: u32,
        /// Configured place count
        places: u32,
    },

    /// The header describes an impossible club
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Invariant violation inside the club state
///
/// These indicate a bug in the caller, never a user mistake.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClubError {
    /// The place number is not part of this club
    #[error("place {0} does not exist")]
    UnknownPlace(PlaceId),

    /// Tried to vacate a place nobody occupies
    #[error("place {0} is not occupied")]
    PlaceNotOccupied(PlaceId),

    /// Tried to seat someone on an occupied place
    #[error("place {0} is already occupied")]
    PlaceOccupied(PlaceId),
}

/// Anything that aborts a simulation run
#[derive(Debug, Error)]
pub enum SimulationError {
    /// The input log is malformed
    #[error(transparent)]
    Input(#[from] InputError),

    /// The reducer hit an invariant violation
    #[error("simulation aborted")]
    Club(#[from] StoreError<ClubError>),

    /// Writing output failed
    #[error("failed to write output")]
    Write(#[source] std::io::Error),
}
