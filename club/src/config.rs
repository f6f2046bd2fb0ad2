//! Command-line configuration.
//!
//! Flags can also be set from the environment; the input path is always
//! positional.

use crate::output::OutputFormat;
use clap::Parser;
use std::path::PathBuf;

/// Replays a computer club event log and prints the day's report.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "computer-club", version, about, long_about = None)]
pub struct Cli {
    /// Path to the event log.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output encoding.
    #[arg(long, value_enum, env = "CLUB_OUTPUT_FORMAT", default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Log filter used when `RUST_LOG` is not set (written to stderr).
    #[arg(long, env = "CLUB_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Print Prometheus metrics to stderr after the run.
    #[arg(long)]
    pub metrics: bool,
}
