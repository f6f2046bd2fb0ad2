//! Input log parsing.
//!
//! The log is three header lines (place count, `HH:MM HH:MM` opening hours,
//! hourly rate) followed by one event per line:
//!
//! ```text
//! <HH:MM> <id> <client> [<place>]
//! ```
//!
//! Lines are parsed lazily so that the caller can process (and print) every
//! valid event before a later malformed line aborts the run.

use crate::error::InputError;
use crate::types::{ClubConfig, EventKind, InputEvent, Minutes, PlaceId};
use std::io::BufRead;

/// Input lines with a running 1-based line number
#[derive(Debug)]
struct NumberedLines<R> {
    lines: std::io::Lines<R>,
    line: usize,
}

impl<R: BufRead> NumberedLines<R> {
    fn next_line(&mut self) -> Option<Result<String, InputError>> {
        let line = self.lines.next()?;
        self.line += 1;
        Some(line.map(strip_cr).map_err(InputError::from))
    }

    fn header_line(&mut self, expected: &'static str) -> Result<String, InputError> {
        self.next_line().unwrap_or(Err(InputError::MissingLine {
            line: self.line + 1,
            expected,
        }))
    }
}

/// Streaming reader over an input log
#[derive(Debug)]
pub struct LogReader<R> {
    source: NumberedLines<R>,
    config: ClubConfig,
}

impl<R: BufRead> LogReader<R> {
    /// Reads the header and returns a reader positioned at the first event
    ///
    /// # Errors
    ///
    /// Returns [`InputError`] if the header is missing, malformed, or
    /// describes an impossible club.
    pub fn new(input: R) -> Result<Self, InputError> {
        let mut source = NumberedLines {
            lines: input.lines(),
            line: 0,
        };

        let places = source.header_line("place count")?;
        let places = parse_number(source.line, "place count", places.trim())?;

        let hours = source.header_line("opening hours")?;
        let fields: Vec<&str> = hours.split_ascii_whitespace().collect();
        let [open, close] = fields[..] else {
            return Err(InputError::FieldCount {
                line: source.line,
                expected: 2,
                found: fields.len(),
            });
        };
        let open = parse_time(source.line, open)?;
        let close = parse_time(source.line, close)?;

        let rate = source.header_line("hourly rate")?;
        let rate = parse_number(source.line, "hourly rate", rate.trim())?;

        let config = ClubConfig::new(places, open, close, rate)?;
        tracing::debug!(places, %open, %close, rate, "Read log header");
        Ok(Self { source, config })
    }

    /// The configuration from the header
    #[must_use]
    pub const fn config(&self) -> &ClubConfig {
        &self.config
    }

    /// Number of lines read so far
    #[must_use]
    pub const fn lines_read(&self) -> usize {
        self.source.line
    }

    fn parse_event(&self, raw: String) -> Result<InputEvent, InputError> {
        let line = self.source.line;
        let fields: Vec<&str> = raw.split_ascii_whitespace().collect();
        let [time, id, client, ..] = fields[..] else {
            return Err(InputError::FieldCount {
                line,
                expected: 3,
                found: fields.len(),
            });
        };

        let time = parse_time(line, time)?;
        let kind = match id {
            "1" => EventKind::Arrive,
            "2" => EventKind::Sit(self.parse_place(line, &fields)?),
            "3" => EventKind::Wait,
            "4" => EventKind::Leave,
            other => {
                return Err(InputError::UnknownEventId {
                    line,
                    id: other.to_string(),
                });
            },
        };
        if !matches!(kind, EventKind::Sit(_)) && fields.len() != 3 {
            return Err(InputError::FieldCount {
                line,
                expected: 3,
                found: fields.len(),
            });
        }

        let client = client.to_string();
        Ok(InputEvent::new(time, kind, client).with_line(raw))
    }

    fn parse_place(&self, line: usize, fields: &[&str]) -> Result<PlaceId, InputError> {
        let &[_, _, _, place] = fields else {
            return Err(InputError::FieldCount {
                line,
                expected: 4,
                found: fields.len(),
            });
        };
        let number = parse_number(line, "place", place)?;
        PlaceId::new(number)
            .filter(|place| self.config.has_place(*place))
            .ok_or(InputError::PlaceOutOfRange {
                line,
                place: number,
                places: self.config.places(),
            })
    }
}

impl<R: BufRead> Iterator for LogReader<R> {
    type Item = Result<InputEvent, InputError>;

    /// Next event; blank lines are skipped
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let raw = match self.source.next_line()? {
                Ok(raw) => raw,
                Err(e) => return Some(Err(e)),
            };
            if raw.trim().is_empty() {
                continue;
            }
            return Some(self.parse_event(raw));
        }
    }
}

fn strip_cr(mut line: String) -> String {
    if line.ends_with('\r') {
        line.pop();
    }
    line
}

fn parse_number(line: usize, field: &'static str, value: &str) -> Result<u32, InputError> {
    value.parse().map_err(|source| InputError::InvalidNumber {
        line,
        field,
        value: value.to_string(),
        source,
    })
}

fn parse_time(line: usize, value: &str) -> Result<Minutes, InputError> {
    value.parse().map_err(|source| InputError::InvalidTime {
        line,
        value: value.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use std::io::Cursor;

    const HEADER: &str = "3\n09:00 19:00\n10\n";

    fn reader(body: &str) -> LogReader<Cursor<String>> {
        LogReader::new(Cursor::new(format!("{HEADER}{body}"))).unwrap()
    }

    fn place(n: u32) -> PlaceId {
        PlaceId::new(n).unwrap()
    }

    #[test]
    fn header_becomes_config() {
        let log = reader("");
        let config = log.config();
        assert_eq!(config.places(), 3);
        assert_eq!(config.open(), Minutes::from_hm(9, 0));
        assert_eq!(config.close(), Minutes::from_hm(19, 0));
        assert_eq!(config.hourly_rate(), 10);
        assert_eq!(log.lines_read(), 3);
    }

    #[test]
    fn header_errors() {
        let missing = LogReader::new(Cursor::new("3\n09:00 19:00\n")).unwrap_err();
        assert!(matches!(
            missing,
            InputError::MissingLine {
                line: 3,
                expected: "hourly rate"
            }
        ));

        let bad_count = LogReader::new(Cursor::new("three\n09:00 19:00\n10\n")).unwrap_err();
        assert!(matches!(bad_count, InputError::InvalidNumber { line: 1, .. }));

        let negative = LogReader::new(Cursor::new("-1\n09:00 19:00\n10\n")).unwrap_err();
        assert!(matches!(negative, InputError::InvalidNumber { line: 1, .. }));

        let one_time = LogReader::new(Cursor::new("3\n09:00\n10\n")).unwrap_err();
        assert!(matches!(
            one_time,
            InputError::FieldCount {
                line: 2,
                expected: 2,
                found: 1
            }
        ));

        let bad_time = LogReader::new(Cursor::new("3\n9:00am 19:00\n10\n")).unwrap_err();
        assert!(matches!(bad_time, InputError::InvalidTime { line: 2, .. }));

        let inverted = LogReader::new(Cursor::new("3\n19:00 09:00\n10\n")).unwrap_err();
        assert!(matches!(inverted, InputError::Config(_)));

        let huge = LogReader::new(Cursor::new("4000000000\n09:00 19:00\n10\n")).unwrap_err();
        assert!(matches!(
            huge,
            InputError::Config(ConfigError::TooManyPlaces {
                places: 4_000_000_000,
                ..
            })
        ));
    }

    #[test]
    fn parses_every_event_kind() {
        let events: Vec<InputEvent> = reader("08:48 1 client1\n09:48 2 client1 3\n10:00 3 client1\n10:30 4 client1\n")
            .collect::<Result<_, _>>()
            .unwrap();

        let kinds: Vec<EventKind> = events.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![EventKind::Arrive, EventKind::Sit(place(3)), EventKind::Wait, EventKind::Leave]
        );
        assert_eq!(events[1].time, Minutes::from_hm(9, 48));
        assert!(events.iter().all(|e| e.client == "client1"));
    }

    #[test]
    fn keeps_raw_line_for_echo() {
        let event = reader("09:48  2 client1 1\r\n").next().unwrap().unwrap();
        assert_eq!(event.line, "09:48  2 client1 1");
        assert_eq!(event.kind, EventKind::Sit(place(1)));
    }

    #[test]
    fn skips_blank_lines() {
        let events: Vec<_> = reader("\n09:00 1 a\n   \n").collect();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn event_errors_carry_line_numbers() {
        let mut log = reader("09:00 1 a\n09:00 5 a\n");
        assert!(log.next().unwrap().is_ok());
        assert!(matches!(
            log.next().unwrap(),
            Err(InputError::UnknownEventId { line: 5, .. })
        ));
    }

    #[test]
    fn rejects_malformed_events() {
        let first_error = |body: &str| reader(body).next().unwrap().unwrap_err();

        assert!(matches!(first_error("09:00 1\n"), InputError::FieldCount { found: 2, .. }));
        assert!(matches!(first_error("09:00 1 a 1\n"), InputError::FieldCount { found: 4, .. }));
        assert!(matches!(
            first_error("09:00 2 a\n"),
            InputError::FieldCount { expected: 4, .. }
        ));
        assert!(matches!(first_error("9.00 1 a\n"), InputError::InvalidTime { .. }));
        assert!(matches!(first_error("09:00 2 a x\n"), InputError::InvalidNumber { .. }));
        assert!(matches!(
            first_error("09:00 2 a 4\n"),
            InputError::PlaceOutOfRange {
                place: 4,
                places: 3,
                ..
            }
        ));
        assert!(matches!(
            first_error("09:00 2 a 0\n"),
            InputError::PlaceOutOfRange { place: 0, .. }
        ));
    }
}
