//! `computer-club` binary: replays an event log file and prints the report
//! to stdout.

use anyhow::Context;
use clap::Parser;
use computer_club::config::Cli;
use computer_club::simulation;
use computer_club_runtime::metrics::MetricsRecorder;
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_level.as_str().into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    let mut recorder = MetricsRecorder::new();
    if cli.metrics {
        recorder.install().context("failed to install metrics recorder")?;
        computer_club::metrics::describe();
    }

    let file = File::open(&cli.input)
        .with_context(|| format!("failed to open {}", cli.input.display()))?;
    let stdout = io::stdout().lock();

    let summary = simulation::run(BufReader::new(file), BufWriter::new(stdout), cli.format)
        .with_context(|| format!("failed to process {}", cli.input.display()))?;

    tracing::debug!(
        actions = summary.actions,
        records = summary.records,
        "Report written"
    );

    if let Some(rendered) = recorder.render() {
        eprintln!("{rendered}");
    }

    Ok(())
}
