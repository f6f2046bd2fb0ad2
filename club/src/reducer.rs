//! Reducer logic for the club.
//!
//! Every incoming event is echoed first, then applied as exactly one
//! transition. Business-rule violations become [`Notice`] outputs and leave
//! the state untouched; only invariant violations fail the reducer.

use crate::error::ClubError;
use crate::metrics::ClubMetrics;
use crate::settlement;
use crate::types::{
    ClubAction, ClubConfig, ClubOutput, ClubState, EventKind, InputEvent, Minutes, Notice,
    PlaceId, Presence,
};
use computer_club_core::{
    SmallVec,
    environment::{HourlyTariff, Tariff},
    reducer::Reducer,
    smallvec,
};

/// Output buffer for one action
pub type Outputs = SmallVec<[ClubOutput; 4]>;

/// Environment dependencies for the club reducer
#[derive(Debug, Clone)]
pub struct ClubEnvironment<T: Tariff = HourlyTariff> {
    /// Billing policy for settled intervals
    pub tariff: T,
}

impl<T: Tariff> ClubEnvironment<T> {
    /// Creates a new `ClubEnvironment`
    #[must_use]
    pub const fn new(tariff: T) -> Self {
        Self { tariff }
    }
}

impl ClubEnvironment<HourlyTariff> {
    /// Environment billing the configured hourly rate
    #[must_use]
    pub const fn from_config(config: &ClubConfig) -> Self {
        Self::new(HourlyTariff::new(config.hourly_rate()))
    }
}

/// Reducer for the club
///
/// Generic over the tariff type so tests can inject their own billing.
#[derive(Debug, Clone, Copy)]
pub struct ClubReducer<T = HourlyTariff> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> ClubReducer<T> {
    /// Creates a new `ClubReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<T> Default for ClubReducer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Tariff> ClubReducer<T> {
    fn notice(outputs: &mut Outputs, time: Minutes, notice: Notice) {
        tracing::warn!(%time, code = notice.code(), "Event rejected");
        ClubMetrics::record_notice(notice);
        outputs.push(ClubOutput::Notice { time, notice });
    }

    fn apply_event(
        state: &mut ClubState,
        event: InputEvent,
        env: &ClubEnvironment<T>,
        outputs: &mut Outputs,
    ) -> Result<(), ClubError> {
        let InputEvent {
            time, kind, client, ..
        } = event;

        match kind {
            EventKind::Arrive => {
                Self::arrive(state, time, client, outputs);
                Ok(())
            },
            EventKind::Sit(place) => Self::sit(state, env, time, client, place, outputs),
            EventKind::Wait => Self::wait(state, env, time, client, outputs),
            EventKind::Leave => Self::leave(state, env, time, &client, outputs),
        }
    }

    fn arrive(state: &mut ClubState, time: Minutes, client: String, outputs: &mut Outputs) {
        if time < state.config().open() {
            return Self::notice(outputs, time, Notice::NotOpenYet);
        }
        if state.is_present(&client) {
            return Self::notice(outputs, time, Notice::YouShallNotPass);
        }

        tracing::debug!(%time, %client, "Client arrived");
        state.admit(client);
    }

    fn sit(
        state: &mut ClubState,
        env: &ClubEnvironment<T>,
        time: Minutes,
        client: String,
        place: PlaceId,
        outputs: &mut Outputs,
    ) -> Result<(), ClubError> {
        let Some(presence) = state.presence(&client) else {
            Self::notice(outputs, time, Notice::ClientUnknown);
            return Ok(());
        };
        let target = state.place(place).ok_or(ClubError::UnknownPlace(place))?;
        if target.is_occupied() {
            Self::notice(outputs, time, Notice::PlaceIsBusy);
            return Ok(());
        }

        // Both checks passed; nothing below can be rejected.
        if let Presence::At(current) = presence {
            let settled = state.vacate(time, &client, current, &env.tariff)?;
            ClubMetrics::record_settlement(&settled);
            tracing::debug!(%time, %client, from = %current, to = %place, "Client moved");
        } else {
            tracing::debug!(%time, %client, %place, "Client seated");
        }
        state.leave_queue(&client);
        state.seat(time, client, place)
    }

    fn wait(
        state: &mut ClubState,
        env: &ClubEnvironment<T>,
        time: Minutes,
        client: String,
        outputs: &mut Outputs,
    ) -> Result<(), ClubError> {
        if state.any_place_free() {
            Self::notice(outputs, time, Notice::ICanWaitNoLonger);
            return Ok(());
        }
        if state.is_queued(&client) {
            tracing::debug!(%time, %client, "Client already waiting");
            return Ok(());
        }
        if state.queue_len() >= state.config().places() as usize {
            tracing::info!(%time, %client, "Queue full, client sent away");
            ClubMetrics::record_forced_out();
            outputs.push(ClubOutput::ForcedOut {
                time,
                client: client.clone(),
            });
            return Self::depart(state, env, time, &client, outputs);
        }

        tracing::debug!(%time, %client, position = state.queue_len() + 1, "Client queued");
        state.enqueue(client);
        Ok(())
    }

    fn leave(
        state: &mut ClubState,
        env: &ClubEnvironment<T>,
        time: Minutes,
        client: &str,
        outputs: &mut Outputs,
    ) -> Result<(), ClubError> {
        if !state.is_present(client) {
            Self::notice(outputs, time, Notice::ClientUnknown);
            return Ok(());
        }

        tracing::debug!(%time, %client, "Client left");
        Self::depart(state, env, time, client, outputs)
    }

    /// Takes a client out of the club. A freed place goes to the head of
    /// the queue.
    fn depart(
        state: &mut ClubState,
        env: &ClubEnvironment<T>,
        time: Minutes,
        client: &str,
        outputs: &mut Outputs,
    ) -> Result<(), ClubError> {
        match state.presence(client) {
            Some(Presence::At(place)) => {
                let settled = state.vacate(time, client, place, &env.tariff)?;
                ClubMetrics::record_settlement(&settled);
                state.leave_queue(client);
                Self::hand_over(state, env, time, place, outputs)
            },
            Some(Presence::Unseated) | None => {
                state.dismiss(client);
                Ok(())
            },
        }
    }

    /// Seats waiting clients at a freed place. A waiting client who already
    /// held a place frees it in turn.
    fn hand_over(
        state: &mut ClubState,
        env: &ClubEnvironment<T>,
        time: Minutes,
        place: PlaceId,
        outputs: &mut Outputs,
    ) -> Result<(), ClubError> {
        let mut freed = Some(place);
        while let Some(place) = freed.take() {
            let Some(next) = state.dequeue() else {
                break;
            };
            if let Some(Presence::At(previous)) = state.presence(&next) {
                let settled = state.vacate(time, &next, previous, &env.tariff)?;
                ClubMetrics::record_settlement(&settled);
                freed = Some(previous);
            }
            state.seat(time, next.clone(), place)?;

            tracing::debug!(%time, client = %next, %place, "Waiting client seated");
            ClubMetrics::record_auto_seated();
            outputs.push(ClubOutput::AutoSeated {
                time,
                client: next,
                place,
            });
        }
        Ok(())
    }
}

impl<T: Tariff> Reducer for ClubReducer<T> {
    type State = ClubState;
    type Action = ClubAction;
    type Environment = ClubEnvironment<T>;
    type Output = ClubOutput;
    type Error = ClubError;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Result<Outputs, ClubError> {
        match action {
            ClubAction::Open => {
                let time = state.config().open();
                tracing::info!(
                    %time,
                    places = state.config().places(),
                    rate = state.config().hourly_rate(),
                    "Club opened"
                );
                Ok(smallvec![ClubOutput::Opened { time }])
            },
            ClubAction::Event(event) => {
                let mut outputs: Outputs = smallvec![ClubOutput::Echo {
                    line: event.line.clone(),
                }];
                Self::apply_event(state, event, env, &mut outputs)?;
                Ok(outputs)
            },
            ClubAction::Close => settlement::close_day(state, &env.tariff),
        }
    }
}
