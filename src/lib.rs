//! IP Limiter - per-identity concurrent-IP quota enforcement
//!
//! A daemon that watches an append-only connection log, decides which IP
//! addresses push an account over its concurrency quota, and appends one
//! structured violation record per excess address for an external
//! log-watching ban tool to act on. It demonstrates:
//! - Best-effort regex parsing of an external log format
//! - Snapshot-based activity tracking with a recency window
//! - Deterministic quota evaluation with cooldown deduplication
//! - Fire-and-forget webhook notification
//! - Bounded log growth through truncation-based retention
//!
//! ## Architecture
//!
//! The codebase is organized into focused modules:
//! - `models/` - Observations, violation records, and payload structures
//! - `services/` - The detection engine: parser, tracker, evaluator,
//!   dedup cache, record sink, webhook notifier, retention, poll loop
//! - `utils/` - Address helpers
//! - `config/` - Configuration structures and environment loading
//!
//! ## Quick Start
//!
//! ```no_run
//! use ip_limiter::{IpLimiter, LimiterConfig, WebhookConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = LimiterConfig::from_env();
//!     config.validate()?;
//!     let mut limiter = IpLimiter::new(config, &WebhookConfig::from_env())?;
//!     limiter.run().await?;
//!     Ok(())
//! }
//! ```

// Core modules
pub mod config;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types and functions for convenience
pub use config::{LimiterConfig, WebhookConfig};
pub use models::{LimiterError, Observation, Violation, WebhookEvent};
pub use services::{
    ACTIVE_WINDOW_SECONDS, ActivitySnapshot, COOLDOWN_SECONDS, Evaluation, IpLimiter, LogParser,
    RetentionPolicy, ViolationCache, ViolationSink, WebhookNotifier,
};
pub use utils::{is_loopback, mask_address};
