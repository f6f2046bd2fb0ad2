//! Replay benchmarks
//!
//! Measures end-to-end throughput on a synthetic busy day: parsing, reducer
//! and text rendering together, plus the reducer alone.
//!
//! Run with: `cargo bench -p computer-club`

#![allow(missing_docs)] // Benchmarks don't need extensive docs
#![allow(clippy::expect_used)] // Benchmarks can use expect for setup

use computer_club::simulation::{self, ClubStore};
use computer_club::{
    ClubAction, ClubConfig, ClubEnvironment, ClubReducer, ClubState, EventKind, InputEvent,
    Minutes, OutputFormat, PlaceId,
};
use computer_club_runtime::Store;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use std::fmt::Write as _;
use std::hint::black_box;

const PLACES: u32 = 20;

/// A day where clients arrive, sit, queue and leave in a rotating pattern
fn busy_day(clients: u32) -> Vec<InputEvent> {
    let mut events = Vec::new();
    for n in 0..clients {
        let time = Minutes::from_hm(9, 0).get() + n * 600 / clients;
        let at = Minutes::new(time);
        let name = format!("client{n}");
        events.push(InputEvent::new(at, EventKind::Arrive, name.as_str()));
        let place = PlaceId::new(n % PLACES + 1).expect("nonzero");
        events.push(InputEvent::new(at, EventKind::Sit(place), name.as_str()));
        events.push(InputEvent::new(at, EventKind::Wait, name.as_str()));
        if n >= PLACES / 2 {
            let earlier = format!("client{}", n - PLACES / 2);
            events.push(InputEvent::new(at, EventKind::Leave, earlier));
        }
    }
    events
}

fn render_log(events: &[InputEvent]) -> String {
    let mut log = format!("{PLACES}\n09:00 19:00\n10\n");
    for event in events {
        writeln!(log, "{}", event.line).expect("write to string");
    }
    log
}

fn bench_replay(c: &mut Criterion) {
    let events = busy_day(5_000);
    let log = render_log(&events);

    let mut group = c.benchmark_group("replay");
    group.throughput(Throughput::Elements(events.len() as u64));

    group.bench_function("text_end_to_end", |b| {
        b.iter(|| {
            let mut out = Vec::with_capacity(log.len() * 2);
            simulation::run(black_box(log.as_bytes()), &mut out, OutputFormat::Text).expect("valid log");
            out
        });
    });

    group.bench_function("reducer_only", |b| {
        let config = ClubConfig::new(PLACES, Minutes::from_hm(9, 0), Minutes::from_hm(19, 0), 10)
            .expect("valid config");
        b.iter(|| {
            let mut store: ClubStore = Store::new(
                ClubState::new(config.clone()),
                ClubReducer::new(),
                ClubEnvironment::from_config(&config),
            );
            for event in events.iter().cloned() {
                black_box(store.send(ClubAction::Event(event)).expect("no invariant violation"));
            }
            store.send(ClubAction::Close).expect("close")
        });
    });

    group.finish();
}

criterion_group!(benches, bench_replay);
criterion_main!(benches);
