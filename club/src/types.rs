//! Domain types for the computer club.
//!
//! The club is a fixed set of numbered places, a registry of the clients
//! currently inside, and a FIFO queue of clients waiting for a place. Time
//! is simulated: every value is minutes since midnight taken from the log.

use crate::error::{ClubError, ConfigError};
use computer_club_core::environment::Tariff;
use serde::{Serialize, Serializer};
use std::collections::{HashMap, VecDeque};
use std::num::NonZeroU32;
use std::str::FromStr;
use thiserror::Error;

/// Minutes since midnight, or a duration in minutes
///
/// Displays as zero-padded `HH:MM`, which is also how it serializes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Minutes(u32);

impl Minutes {
    /// Midnight / zero duration
    pub const ZERO: Self = Self(0);

    /// Creates a value from a raw minute count
    #[must_use]
    pub const fn new(minutes: u32) -> Self {
        Self(minutes)
    }

    /// Creates a value from hours and minutes
    #[must_use]
    pub const fn from_hm(hours: u32, minutes: u32) -> Self {
        Self(hours * 60 + minutes)
    }

    /// Returns the raw minute count
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Minutes elapsed from `earlier` to `self`, zero if `earlier` is later
    #[must_use]
    pub const fn since(self, earlier: Self) -> Self {
        Self(self.0.saturating_sub(earlier.0))
    }
}

impl std::ops::AddAssign for Minutes {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl std::fmt::Display for Minutes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl FromStr for Minutes {
    type Err = chrono::ParseError;

    /// Parses a time of day in `HH:MM` form
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use chrono::Timelike;

        let time = chrono::NaiveTime::parse_from_str(s, "%H:%M")?;
        Ok(Self::from_hm(time.hour(), time.minute()))
    }
}

impl Serialize for Minutes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Place number, `1..=places`
///
/// Zero is not representable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PlaceId(NonZeroU32);

impl PlaceId {
    /// Creates a place number, `None` for zero
    #[must_use]
    pub const fn new(number: u32) -> Option<Self> {
        match NonZeroU32::new(number) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }

    /// Returns the place number
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    const fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl std::fmt::Display for PlaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Club configuration, fixed for the whole day
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClubConfig {
    places: u32,
    open: Minutes,
    close: Minutes,
    hourly_rate: u32,
}

impl ClubConfig {
    /// Largest accepted place count; every place is allocated up front
    pub const MAX_PLACES: u32 = 100_000;

    /// Creates a validated configuration
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if there are no places, more than
    /// [`Self::MAX_PLACES`], or the club closes before (or when) it opens.
    pub const fn new(
        places: u32,
        open: Minutes,
        close: Minutes,
        hourly_rate: u32,
    ) -> Result<Self, ConfigError> {
        if places == 0 {
            return Err(ConfigError::NoPlaces);
        }
        if places > Self::MAX_PLACES {
            return Err(ConfigError::TooManyPlaces {
                places,
                max: Self::MAX_PLACES,
            });
        }
        if close.get() <= open.get() {
            return Err(ConfigError::ClosesBeforeOpening { open, close });
        }
        Ok(Self {
            places,
            open,
            close,
            hourly_rate,
        })
    }

    /// Number of places
    #[must_use]
    pub const fn places(&self) -> u32 {
        self.places
    }

    /// Opening time
    #[must_use]
    pub const fn open(&self) -> Minutes {
        self.open
    }

    /// Closing time
    #[must_use]
    pub const fn close(&self) -> Minutes {
        self.close
    }

    /// Price of one started hour
    #[must_use]
    pub const fn hourly_rate(&self) -> u32 {
        self.hourly_rate
    }

    /// Whether `place` is one of this club's places
    #[must_use]
    pub const fn has_place(&self, place: PlaceId) -> bool {
        place.get() <= self.places
    }

    /// All place numbers in order
    pub fn place_ids(&self) -> impl Iterator<Item = PlaceId> + use<> {
        (1..=self.places).filter_map(PlaceId::new)
    }
}

/// Per-place occupancy and accounting
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Place {
    occupied_since: Option<Minutes>,
    busy: Minutes,
    revenue: u64,
}

impl Place {
    /// Whether someone sits here
    #[must_use]
    pub const fn is_occupied(&self) -> bool {
        self.occupied_since.is_some()
    }

    /// Start of the current occupancy
    #[must_use]
    pub const fn occupied_since(&self) -> Option<Minutes> {
        self.occupied_since
    }

    /// Total minutes of settled occupancy
    #[must_use]
    pub const fn busy(&self) -> Minutes {
        self.busy
    }

    /// Total settled revenue
    #[must_use]
    pub const fn revenue(&self) -> u64 {
        self.revenue
    }
}

/// Where a client inside the club currently is
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Presence {
    /// Inside but not seated (just arrived, or waiting)
    Unseated,
    /// Seated at a place
    At(PlaceId),
}

/// One settled occupancy interval
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settlement {
    /// Place that was vacated
    pub place: PlaceId,
    /// Length of the interval
    pub minutes: Minutes,
    /// Revenue charged for it
    pub revenue: u64,
}

/// Full club state for one simulated day
#[derive(Clone, Debug)]
pub struct ClubState {
    config: ClubConfig,
    places: Vec<Place>,
    registry: HashMap<String, Presence>,
    queue: VecDeque<String>,
}

impl ClubState {
    /// Creates an empty club: all places free, nobody inside
    #[must_use]
    pub fn new(config: ClubConfig) -> Self {
        Self {
            places: vec![Place::default(); config.places as usize],
            config,
            registry: HashMap::new(),
            queue: VecDeque::new(),
        }
    }

    /// The configuration
    #[must_use]
    pub const fn config(&self) -> &ClubConfig {
        &self.config
    }

    /// A place by number
    #[must_use]
    pub fn place(&self, place: PlaceId) -> Option<&Place> {
        self.places.get(place.index())
    }

    /// All places with their numbers, in order
    pub fn places(&self) -> impl Iterator<Item = (PlaceId, &Place)> {
        self.config.place_ids().zip(&self.places)
    }

    /// Presence of a client, `None` if not inside
    #[must_use]
    pub fn presence(&self, client: &str) -> Option<Presence> {
        self.registry.get(client).copied()
    }

    /// Whether the client is inside the club
    #[must_use]
    pub fn is_present(&self, client: &str) -> bool {
        self.registry.contains_key(client)
    }

    /// Number of clients inside the club
    #[must_use]
    pub fn present_count(&self) -> usize {
        self.registry.len()
    }

    /// Clients inside with their presence, in no particular order
    pub fn clients(&self) -> impl Iterator<Item = (&str, Presence)> {
        self.registry.iter().map(|(name, presence)| (name.as_str(), *presence))
    }

    /// Names of all clients inside, sorted ascending
    #[must_use]
    pub fn present_clients_sorted(&self) -> Vec<String> {
        let mut clients: Vec<String> = self.registry.keys().cloned().collect();
        clients.sort_unstable();
        clients
    }

    /// Waiting clients, head first
    pub fn queue(&self) -> impl ExactSizeIterator<Item = &str> {
        self.queue.iter().map(String::as_str)
    }

    /// Number of waiting clients
    #[must_use]
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Whether the client is waiting in the queue
    #[must_use]
    pub fn is_queued(&self, client: &str) -> bool {
        self.queue.iter().any(|queued| queued == client)
    }

    /// Whether at least one place is free
    #[must_use]
    pub fn any_place_free(&self) -> bool {
        self.places.iter().any(|place| !place.is_occupied())
    }

    /// Registers an arriving client as present but unseated
    pub fn admit(&mut self, client: String) {
        self.registry.insert(client, Presence::Unseated);
    }

    /// Seats a client at a free place starting at `time`
    ///
    /// # Errors
    ///
    /// Returns [`ClubError::UnknownPlace`] or [`ClubError::PlaceOccupied`];
    /// the state is unchanged in both cases.
    pub fn seat(&mut self, time: Minutes, client: String, place: PlaceId) -> Result<(), ClubError> {
        let slot = self
            .places
            .get_mut(place.index())
            .ok_or(ClubError::UnknownPlace(place))?;
        if slot.is_occupied() {
            return Err(ClubError::PlaceOccupied(place));
        }
        slot.occupied_since = Some(time);
        self.registry.insert(client, Presence::At(place));
        Ok(())
    }

    /// Vacates a place at `time`, settling the interval with `tariff`
    ///
    /// The client leaves the registry; callers that keep the client inside
    /// re-register them.
    ///
    /// # Errors
    ///
    /// Returns [`ClubError::UnknownPlace`] or [`ClubError::PlaceNotOccupied`];
    /// the state is unchanged in both cases.
    pub fn vacate<T: Tariff + ?Sized>(
        &mut self,
        time: Minutes,
        client: &str,
        place: PlaceId,
        tariff: &T,
    ) -> Result<Settlement, ClubError> {
        let slot = self
            .places
            .get_mut(place.index())
            .ok_or(ClubError::UnknownPlace(place))?;
        let since = slot
            .occupied_since
            .take()
            .ok_or(ClubError::PlaceNotOccupied(place))?;

        let minutes = time.since(since);
        let revenue = tariff.charge(minutes.get());
        slot.busy += minutes;
        slot.revenue += revenue;
        self.registry.remove(client);

        Ok(Settlement {
            place,
            minutes,
            revenue,
        })
    }

    /// Removes a client from the registry and the queue
    ///
    /// Does not touch places; vacate first if the client is seated.
    pub fn dismiss(&mut self, client: &str) {
        self.registry.remove(client);
        self.queue.retain(|queued| queued != client);
    }

    /// Appends a client to the queue
    pub fn enqueue(&mut self, client: String) {
        self.queue.push_back(client);
    }

    /// Takes the client at the head of the queue
    pub fn dequeue(&mut self) -> Option<String> {
        self.queue.pop_front()
    }

    /// Removes a client from the queue, wherever they are in it
    pub fn leave_queue(&mut self, client: &str) {
        self.queue.retain(|queued| queued != client);
    }

    /// Empties the queue
    pub fn clear_queue(&mut self) {
        self.queue.clear();
    }
}

/// Business-rule notice (wire event 13)
///
/// These are expected outcomes of normal operation, reported as output
/// lines. They never change state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize)]
pub enum Notice {
    /// The client is already inside
    #[error("YouShallNotPass")]
    YouShallNotPass,

    /// Arrival before opening time
    #[error("NotOpenYet")]
    NotOpenYet,

    /// The requested place is occupied
    #[error("PlaceIsBusy")]
    PlaceIsBusy,

    /// The client is not inside
    #[error("ClientUnknown")]
    ClientUnknown,

    /// Waiting while a place is free
    #[error("ICanWaitNoLonger!")]
    #[serde(rename = "ICanWaitNoLonger!")]
    ICanWaitNoLonger,
}

impl Notice {
    /// Wire code as printed after event id 13
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::YouShallNotPass => "YouShallNotPass",
            Self::NotOpenYet => "NotOpenYet",
            Self::PlaceIsBusy => "PlaceIsBusy",
            Self::ClientUnknown => "ClientUnknown",
            Self::ICanWaitNoLonger => "ICanWaitNoLonger!",
        }
    }
}

/// Kind of an incoming event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    /// Event 1: the client arrives
    Arrive,
    /// Event 2: the client sits at a place (or moves to it)
    Sit(PlaceId),
    /// Event 3: the client waits for a place
    Wait,
    /// Event 4: the client leaves
    Leave,
}

impl EventKind {
    /// Wire event id
    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Self::Arrive => 1,
            Self::Sit(_) => 2,
            Self::Wait => 3,
            Self::Leave => 4,
        }
    }
}

/// One incoming event from the log
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputEvent {
    /// When it happened
    pub time: Minutes,
    /// What happened
    pub kind: EventKind,
    /// Who did it
    pub client: String,
    /// The line exactly as read, echoed verbatim
    pub line: String,
}

impl InputEvent {
    /// Creates an event whose echo line is the canonical rendering
    #[must_use]
    pub fn new(time: Minutes, kind: EventKind, client: impl Into<String>) -> Self {
        let client = client.into();
        let line = match kind {
            EventKind::Sit(place) => format!("{time} {} {client} {place}", kind.id()),
            EventKind::Arrive | EventKind::Wait | EventKind::Leave => {
                format!("{time} {} {client}", kind.id())
            },
        };
        Self {
            time,
            kind,
            client,
            line,
        }
    }

    /// Replaces the echo line with the text as read
    #[must_use]
    pub fn with_line(mut self, line: impl Into<String>) -> Self {
        self.line = line.into();
        self
    }
}

/// Inputs to the club reducer
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClubAction {
    /// Start of the day: report opening time
    Open,
    /// One event from the log
    Event(InputEvent),
    /// End of the day: evict everyone and report
    Close,
}

/// Output records, in the order they are to be written
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClubOutput {
    /// Opening time
    Opened {
        /// Opening time
        time: Minutes,
    },

    /// An input line, verbatim
    Echo {
        /// The line
        line: String,
    },

    /// Event 11: a client was made to leave
    ForcedOut {
        /// When
        time: Minutes,
        /// Who
        client: String,
    },

    /// Event 12: a waiting client was seated at a freed place
    AutoSeated {
        /// When
        time: Minutes,
        /// Who
        client: String,
        /// Where
        place: PlaceId,
    },

    /// Event 13: a business-rule notice
    Notice {
        /// When
        time: Minutes,
        /// Which rule
        notice: Notice,
    },

    /// Closing time
    Closed {
        /// Closing time
        time: Minutes,
    },

    /// Day totals for one place
    Summary {
        /// Place number
        place: PlaceId,
        /// Revenue
        revenue: u64,
        /// Total occupied time
        busy: Minutes,
    },
}
