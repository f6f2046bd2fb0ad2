//! Property tests over generated, time-ordered event logs.

#![allow(clippy::unwrap_used)]

use computer_club::{
    ClubAction, ClubConfig, ClubEnvironment, ClubOutput, ClubReducer, ClubState, EventKind,
    InputEvent, Minutes, PlaceId, Presence,
};
use computer_club::simulation::ClubStore;
use computer_club_runtime::Store;
use computer_club_testing::properties::{client_name, sorted_minutes};
use proptest::prelude::*;
use std::collections::HashSet;

const OPEN: u32 = 9 * 60;
const CLOSE: u32 = 19 * 60;

/// (kind selector, client, place number) for one event; the timestamp is
/// drawn separately so the log stays sorted.
fn event_shape(places: u32) -> impl Strategy<Value = (u8, String, u32)> {
    (0u8..4, client_name(), 1..=places)
}

fn day() -> impl Strategy<Value = (u32, u32, Vec<InputEvent>)> {
    (1u32..=4, 0u32..=50).prop_flat_map(|(places, rate)| {
        (
            Just(places),
            Just(rate),
            sorted_minutes(OPEN, CLOSE, 0, 60),
            prop::collection::vec(event_shape(places), 60),
        )
            .prop_map(|(places, rate, times, shapes)| {
                let events = times
                    .into_iter()
                    .zip(shapes)
                    .map(|(time, (kind, client, place))| {
                        let kind = match kind {
                            0 => EventKind::Arrive,
                            1 => EventKind::Sit(PlaceId::new(place).unwrap()),
                            2 => EventKind::Wait,
                            _ => EventKind::Leave,
                        };
                        InputEvent::new(Minutes::new(time), kind, client)
                    })
                    .collect();
                (places, rate, events)
            })
    })
}

fn check_invariants(state: &ClubState) -> Result<(), TestCaseError> {
    let config = state.config();
    let day_length = config.close().since(config.open());

    prop_assert!(state.queue_len() <= config.places() as usize);

    let mut held = HashSet::new();
    for (client, presence) in state.clients() {
        if let Presence::At(place) = presence {
            prop_assert!(held.insert(place), "place {place} held twice (by {client})");
            prop_assert!(state.place(place).unwrap().is_occupied());
        }
    }
    let occupied = state.places().filter(|(_, slot)| slot.is_occupied()).count();
    prop_assert_eq!(occupied, held.len());

    for (place, slot) in state.places() {
        prop_assert!(slot.busy() <= day_length, "place {place} busy {}", slot.busy());
        let rate = u64::from(config.hourly_rate());
        prop_assert!(slot.revenue() >= rate * u64::from(slot.busy().get().div_ceil(60)));
        if rate > 0 {
            prop_assert_eq!(slot.revenue() % rate, 0);
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn invariants_hold_through_the_day((places, rate, events) in day()) {
        let config = ClubConfig::new(places, Minutes::new(OPEN), Minutes::new(CLOSE), rate).unwrap();
        let mut store: ClubStore = Store::new(
            ClubState::new(config.clone()),
            ClubReducer::new(),
            ClubEnvironment::from_config(&config),
        );

        store.send(ClubAction::Open).unwrap();
        for event in events {
            let line = event.line.clone();
            let outputs = store.send(ClubAction::Event(event)).unwrap();
            prop_assert_eq!(&outputs[0], &ClubOutput::Echo { line });
            let no_extra_echo = outputs[1..].iter().all(|o| !matches!(o, ClubOutput::Echo { .. }));
            prop_assert!(no_extra_echo);
            store.state(check_invariants)?;
        }

        let before_close: HashSet<String> =
            store.state(|s| s.clients().map(|(name, _)| name.to_string()).collect());
        let outputs = store.send(ClubAction::Close).unwrap();

        let evicted: Vec<&str> = outputs
            .iter()
            .filter_map(|o| match o {
                ClubOutput::ForcedOut { client, .. } => Some(client.as_str()),
                _ => None,
            })
            .collect();
        prop_assert!(evicted.windows(2).all(|w| w[0] < w[1]), "eviction order {evicted:?}");
        prop_assert_eq!(evicted.iter().map(|c| c.to_string()).collect::<HashSet<_>>(), before_close);

        let summaries = outputs
            .iter()
            .filter(|o| matches!(o, ClubOutput::Summary { .. }))
            .count();
        prop_assert_eq!(summaries, places as usize);

        let state = store.into_state();
        check_invariants(&state)?;
        prop_assert_eq!(state.present_count(), 0);
        prop_assert_eq!(state.queue_len(), 0);
    }

    #[test]
    fn rejected_events_leave_state_untouched((places, rate, events) in day()) {
        let config = ClubConfig::new(places, Minutes::new(OPEN), Minutes::new(CLOSE), rate).unwrap();
        let reducer: ClubReducer = ClubReducer::new();
        let env = ClubEnvironment::from_config(&config);
        let mut state = ClubState::new(config);

        for event in events {
            let before = snapshot(&state);
            let outputs = computer_club_core::reducer::Reducer::reduce(
                &reducer,
                &mut state,
                ClubAction::Event(event),
                &env,
            )
            .unwrap();
            if outputs.iter().any(|o| matches!(o, ClubOutput::Notice { .. })) {
                prop_assert_eq!(outputs.len(), 2);
                prop_assert_eq!(snapshot(&state), before);
            }
        }
    }
}

type Snapshot = (Vec<(String, Presence)>, Vec<String>, Vec<(Option<Minutes>, Minutes, u64)>);

fn snapshot(state: &ClubState) -> Snapshot {
    let mut clients: Vec<(String, Presence)> =
        state.clients().map(|(name, presence)| (name.to_string(), presence)).collect();
    clients.sort_by(|a, b| a.0.cmp(&b.0));
    let queue = state.queue().map(str::to_string).collect();
    let places = state
        .places()
        .map(|(_, slot)| (slot.occupied_since(), slot.busy(), slot.revenue()))
        .collect();
    (clients, queue, places)
}
