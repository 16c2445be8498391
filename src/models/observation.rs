//! Parsed connection log entries.

use chrono::NaiveDateTime;

/// A single accepted-connection observation extracted from the source log.
///
/// The source format carries no time zone, so timestamps are kept as naive
/// local datetimes and only ever compared against each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    /// Account token the connection was accepted on behalf of
    pub email: String,
    /// Client IP address, never loopback
    pub address: String,
    /// Leading timestamp of the log line
    pub timestamp: NaiveDateTime,
}
