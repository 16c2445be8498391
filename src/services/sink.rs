//! Append-only violation record store.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use crate::models::{LimiterError, Violation};
use crate::services::parser::LOG_TIMESTAMP_FORMAT;

/// Writer for the violation record store consumed by the external ban
/// actuator
///
/// The line format is a wire contract: the actuator matches on
/// `Email = (\S+).*SRC = (\S+)` behind a leading timestamp. Field order
/// and literal tokens must not change.
pub struct ViolationSink {
    path: PathBuf,
}

impl ViolationSink {
    /// Create a sink writing to `path`, creating its parent directory when
    /// missing
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, LimiterError> {
        let path = path.into();
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir).map_err(|source| LimiterError::ViolationLog {
                    path: path.display().to_string(),
                    source,
                })?;
            }
        }
        Ok(Self { path })
    }

    /// Format the record line for a violation, without the trailing newline
    pub fn format_record(violation: &Violation) -> String {
        format!(
            "{} [LIMIT_IP] Email = {} || SRC = {}",
            violation.timestamp.format(LOG_TIMESTAMP_FORMAT),
            violation.email,
            violation.address
        )
    }

    /// Append one violation record line
    pub fn append(&self, violation: &Violation) -> Result<(), LimiterError> {
        let line = format!("{}\n", Self::format_record(violation));

        let io_error = |source| LimiterError::ViolationLog {
            path: self.path.display().to_string(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(io_error)?;
        file.write_all(line.as_bytes()).map_err(io_error)
    }
}
