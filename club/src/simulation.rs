//! Runs one simulated day end to end.

use crate::error::SimulationError;
use crate::input::LogReader;
use crate::output::{OutputFormat, OutputSink};
use crate::reducer::{ClubEnvironment, ClubReducer};
use crate::types::{ClubAction, ClubState};
use computer_club_runtime::Store;
use std::io::{BufRead, Write};

/// Store type driving the club
pub type ClubStore = Store<ClubState, ClubAction, ClubEnvironment, ClubReducer>;

/// Result of a completed run
#[derive(Debug)]
pub struct RunSummary {
    /// State after closing: everyone gone, places hold the day's totals
    pub state: ClubState,
    /// Actions processed, including `Open` and `Close`
    pub actions: u64,
    /// Output records written
    pub records: usize,
}

/// Replays the log in `input` and writes the report to `output`
///
/// Every record is written as soon as its action is processed, so when a
/// later line turns out to be malformed, everything before it has already
/// been written (and is flushed before the error is returned).
///
/// # Errors
///
/// Returns [`SimulationError`] if the input is malformed, the reducer hits
/// an invariant violation, or writing fails.
#[tracing::instrument(skip_all, fields(format = ?format))]
pub fn run<R, W>(input: R, output: W, format: OutputFormat) -> Result<RunSummary, SimulationError>
where
    R: BufRead,
    W: Write,
{
    let mut events = LogReader::new(input)?;
    let config = events.config().clone();
    let mut store: ClubStore = Store::new(
        ClubState::new(config.clone()),
        ClubReducer::new(),
        ClubEnvironment::from_config(&config),
    );
    let mut sink = OutputSink::new(output, format);

    let replayed = replay(&mut store, &mut events, &mut sink);
    let flushed = sink.finish().map_err(SimulationError::Write);
    let records = replayed?;
    flushed?;

    let actions = store.processed();
    tracing::info!(actions, records, lines = events.lines_read(), "Simulation finished");

    Ok(RunSummary {
        state: store.into_state(),
        actions,
        records,
    })
}

fn replay<R: BufRead, W: Write>(
    store: &mut ClubStore,
    events: &mut LogReader<R>,
    sink: &mut OutputSink<W>,
) -> Result<usize, SimulationError> {
    let mut emit = |store: &mut ClubStore, action: ClubAction| -> Result<(), SimulationError> {
        let outputs = store.send(action)?;
        sink.write_all(&outputs).map_err(SimulationError::Write)
    };

    emit(store, ClubAction::Open)?;
    for event in events {
        emit(store, ClubAction::Event(event?))?;
    }
    emit(store, ClubAction::Close)?;

    Ok(sink.written())
}
