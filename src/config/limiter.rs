//! Limiter engine configuration.

use std::collections::HashSet;
use std::env;
use std::path::Path;

use crate::models::LimiterError;

/// Configuration for the IP limiter engine
#[derive(Debug, Clone)]
pub struct LimiterConfig {
    /// Connection log to scan (read + truncate)
    pub source_log_path: String,
    /// Append-only violation record store consumed by the ban actuator
    pub violation_log_path: String,
    /// Maximum concurrently active addresses allowed per email
    pub max_ips_per_identity: usize,
    /// Poll period in seconds
    pub check_interval_seconds: u64,
    /// Periodic source-log truncation interval in seconds
    pub log_clear_interval_seconds: u64,
    /// Emails exempt from quota evaluation
    pub whitelist_emails: HashSet<String>,
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            source_log_path: "/var/log/vpn/access.log".to_string(),
            violation_log_path: "/var/log/ip-limiter/violations.log".to_string(),
            max_ips_per_identity: 1,
            check_interval_seconds: 5,
            log_clear_interval_seconds: 3600,
            whitelist_emails: HashSet::new(),
        }
    }
}

impl LimiterConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let source_log_path =
            env::var("SOURCE_LOG_PATH").unwrap_or(defaults.source_log_path);

        let violation_log_path =
            env::var("VIOLATION_LOG_PATH").unwrap_or(defaults.violation_log_path);

        let max_ips_per_identity = env::var("MAX_IPS_PER_IDENTITY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.max_ips_per_identity);

        let check_interval_seconds = env::var("CHECK_INTERVAL")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.check_interval_seconds);

        let log_clear_interval_seconds = env::var("LOG_CLEAR_INTERVAL")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.log_clear_interval_seconds);

        let whitelist_emails = env::var("WHITELIST_EMAILS")
            .map(|v| parse_list(&v))
            .unwrap_or_default();

        Self {
            source_log_path,
            violation_log_path,
            max_ips_per_identity,
            check_interval_seconds,
            log_clear_interval_seconds,
            whitelist_emails,
        }
    }

    /// Validate the configuration before starting the engine
    ///
    /// Intervals must be positive and the parent directories of both log
    /// paths must exist. A limit of zero is valid: it marks every active
    /// address as over quota.
    pub fn validate(&self) -> Result<(), LimiterError> {
        if self.check_interval_seconds == 0 {
            return Err(LimiterError::Config(
                "CHECK_INTERVAL must be greater than zero".to_string(),
            ));
        }
        if self.log_clear_interval_seconds == 0 {
            return Err(LimiterError::Config(
                "LOG_CLEAR_INTERVAL must be greater than zero".to_string(),
            ));
        }

        for (name, path) in [
            ("SOURCE_LOG_PATH", &self.source_log_path),
            ("VIOLATION_LOG_PATH", &self.violation_log_path),
        ] {
            let dir = Path::new(path).parent().unwrap_or(Path::new("/"));
            if !dir.as_os_str().is_empty() && !dir.is_dir() {
                return Err(LimiterError::Config(format!(
                    "directory {} for {} does not exist",
                    dir.display(),
                    name
                )));
            }
        }

        Ok(())
    }
}

/// Parse a comma-separated list, trimming whitespace and dropping empties
fn parse_list(value: &str) -> HashSet<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
