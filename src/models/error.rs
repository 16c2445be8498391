//! Error types for the limiter engine.

/// Errors surfaced by the limiter engine
///
/// Every I/O variant is recoverable at the poll-loop boundary: it is
/// logged and the loop continues with the next cycle. Only configuration
/// errors abort startup.
#[derive(Debug, thiserror::Error)]
pub enum LimiterError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to read source log {path}: {source}")]
    SourceLog {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to append violation record to {path}: {source}")]
    ViolationLog {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to truncate source log {path}: {source}")]
    Truncate {
        path: String,
        source: std::io::Error,
    },
}
