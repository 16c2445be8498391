//! Source log retention decisions.

use std::fs::OpenOptions;
use std::path::Path;

use crate::models::LimiterError;

/// Decides when the source log is truncated to bound rescan cost and
/// tracker memory
#[derive(Debug, Clone)]
pub struct RetentionPolicy {
    clear_interval_seconds: i64,
}

impl RetentionPolicy {
    pub fn new(clear_interval_seconds: u64) -> Self {
        Self {
            clear_interval_seconds: clear_interval_seconds as i64,
        }
    }

    /// Whether the source log should be truncated after this cycle
    ///
    /// True when any candidate violation occurred this cycle, or when the
    /// periodic interval since the last truncation has elapsed.
    pub fn should_clear(&self, violation_this_cycle: bool, last_clear: i64, now: i64) -> bool {
        violation_this_cycle || now - last_clear > self.clear_interval_seconds
    }
}

/// Truncate the source log to empty content
///
/// The file is opened without create: the log is produced by an external
/// process, and truncation only ever follows a scan that read it.
pub fn truncate_log(path: &Path) -> Result<(), LimiterError> {
    OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(path)
        .map(|_| ())
        .map_err(|source| LimiterError::Truncate {
            path: path.display().to_string(),
            source,
        })
}
