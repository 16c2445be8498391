//! Source log line parsing.

use chrono::NaiveDateTime;
use regex::Regex;

use crate::models::Observation;
use crate::utils::is_loopback;

/// Timestamp format used by the source log and the violation record store
pub const LOG_TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Parser for accepted-connection lines in the source log
///
/// A relevant line starts with a `YYYY/MM/DD HH:MM:SS` timestamp and
/// contains `from <ip>:<port> accepted ... email: <token>` further on.
/// Parsing is best-effort against an external log format: anything that
/// does not match is skipped, never an error.
pub struct LogParser {
    accept_pattern: Regex,
    timestamp_pattern: Regex,
}

impl LogParser {
    pub fn new() -> Self {
        Self {
            accept_pattern: Regex::new(
                r"from\s+(\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}):\d+\s+accepted.*?email:\s*(\S+)",
            )
            .expect("accept pattern is valid"),
            timestamp_pattern: Regex::new(r"^(\d{4}/\d{2}/\d{2} \d{2}:\d{2}:\d{2})")
                .expect("timestamp pattern is valid"),
        }
    }

    /// Parse one log line into an [`Observation`]
    ///
    /// Returns `None` when the line lacks a well-formed leading timestamp
    /// (it cannot be placed in time), does not match the accept pattern,
    /// or the connection came from a loopback address.
    pub fn parse_line(&self, line: &str) -> Option<Observation> {
        let timestamp = self
            .timestamp_pattern
            .captures(line)
            .and_then(|caps| NaiveDateTime::parse_from_str(&caps[1], LOG_TIMESTAMP_FORMAT).ok())?;

        let caps = self.accept_pattern.captures(line)?;
        let address = caps[1].to_string();
        let email = caps[2].to_string();

        if is_loopback(&address) {
            return None;
        }

        Some(Observation {
            email,
            address,
            timestamp,
        })
    }
}

impl Default for LogParser {
    fn default() -> Self {
        Self::new()
    }
}
