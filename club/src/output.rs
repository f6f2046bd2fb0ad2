//! Output rendering.
//!
//! Text is the line-oriented report format; JSON writes one object per
//! record (JSON Lines) for machine consumers.

use crate::types::ClubOutput;
use std::fmt;
use std::io::{self, Write};

impl fmt::Display for ClubOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Opened { time } | Self::Closed { time } => write!(f, "{time}"),
            Self::Echo { line } => f.write_str(line),
            Self::ForcedOut { time, client } => write!(f, "{time} 11 {client}"),
            Self::AutoSeated {
                time,
                client,
                place,
            } => write!(f, "{time} 12 {client} {place}"),
            Self::Notice { time, notice } => write!(f, "{time} 13 {notice}"),
            Self::Summary {
                place,
                revenue,
                busy,
            } => write!(f, "{place} {revenue} {busy}"),
        }
    }
}

/// Output encoding
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One plain-text line per record
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Writes output records in the chosen format
#[derive(Debug)]
pub struct OutputSink<W> {
    writer: W,
    format: OutputFormat,
    written: usize,
}

impl<W: Write> OutputSink<W> {
    /// Creates a sink over `writer`
    pub const fn new(writer: W, format: OutputFormat) -> Self {
        Self {
            writer,
            format,
            written: 0,
        }
    }

    /// Writes one record
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    pub fn write(&mut self, output: &ClubOutput) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(self.writer, "{output}")?,
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.writer, output)?;
                self.writer.write_all(b"\n")?;
            },
        }
        self.written += 1;
        Ok(())
    }

    /// Writes several records in order
    ///
    /// # Errors
    ///
    /// Returns the first I/O error; later records are not written.
    pub fn write_all<'a>(&mut self, outputs: impl IntoIterator<Item = &'a ClubOutput>) -> io::Result<()> {
        outputs.into_iter().try_for_each(|output| self.write(output))
    }

    /// Number of records written
    #[must_use]
    pub const fn written(&self) -> usize {
        self.written
    }

    /// Flushes and returns the writer
    ///
    /// # Errors
    ///
    /// Returns the flush error.
    pub fn finish(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}
