//! The scan-evaluate-emit-retain engine and its poll loop.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use tokio::signal::unix::{SignalKind, signal};
use tracing::{debug, error, info};

use crate::config::{LimiterConfig, WebhookConfig};
use crate::models::{LimiterError, Violation};
use crate::services::dedup::ViolationCache;
use crate::services::evaluator::{self, Evaluation};
use crate::services::notifier::WebhookNotifier;
use crate::services::parser::LogParser;
use crate::services::retention::{self, RetentionPolicy};
use crate::services::sink::ViolationSink;
use crate::services::tracker::ActivitySnapshot;

/// Concurrent-IP quota enforcement engine
///
/// One instance owns all process-lifetime state: the dedup cache and the
/// retention clock, cleared together exactly when the source log is
/// truncated. A single sequential control loop drives full scan cycles;
/// the only concurrency is detached webhook delivery.
pub struct IpLimiter {
    config: LimiterConfig,
    parser: LogParser,
    sink: ViolationSink,
    notifier: Option<WebhookNotifier>,
    retention: RetentionPolicy,
    cache: ViolationCache,
    last_clear: i64,
}

impl IpLimiter {
    /// Build the engine from configuration
    pub fn new(config: LimiterConfig, webhook: &WebhookConfig) -> Result<Self, LimiterError> {
        let sink = ViolationSink::new(&config.violation_log_path)?;
        let notifier = WebhookNotifier::new(webhook)
            .map_err(|err| LimiterError::Config(format!("webhook client: {err}")))?;
        let retention = RetentionPolicy::new(config.log_clear_interval_seconds);

        Ok(Self {
            parser: LogParser::new(),
            sink,
            notifier,
            retention,
            cache: ViolationCache::new(),
            last_clear: Utc::now().timestamp(),
            config,
        })
    }

    /// Run the poll loop until SIGINT or SIGTERM
    ///
    /// Cycle errors are logged and swallowed; the loop only terminates on
    /// an explicit shutdown signal. In-flight webhook tasks are neither
    /// awaited nor cancelled: they are bounded by their own timeout.
    pub async fn run(&mut self) -> Result<(), LimiterError> {
        self.log_startup();

        let mut sigterm = signal(SignalKind::terminate())
            .map_err(|err| LimiterError::Config(format!("signal handler: {err}")))?;
        let mut ticker =
            tokio::time::interval(Duration::from_secs(self.config.check_interval_seconds));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Received interrupt, shutting down");
                    break;
                }
                _ = sigterm.recv() => {
                    info!("Received terminate signal, shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    self.run_cycle();
                }
            }
        }

        info!("IP limiter stopped");
        Ok(())
    }

    fn log_startup(&self) {
        info!(
            version = env!("CARGO_PKG_VERSION"),
            build_time = env!("VERGEN_BUILD_TIMESTAMP"),
            "IP limiter starting"
        );
        info!(
            source_log = %self.config.source_log_path,
            violation_log = %self.config.violation_log_path,
            "Log paths"
        );
        info!(
            max_ips = self.config.max_ips_per_identity,
            check_interval_seconds = self.config.check_interval_seconds,
            log_clear_interval_seconds = self.config.log_clear_interval_seconds,
            whitelisted = self.config.whitelist_emails.len(),
            "Quota settings"
        );
        match &self.notifier {
            Some(notifier) => info!(destination = %notifier.destination(), "Webhook enabled"),
            None => info!("Webhook disabled"),
        }
    }

    /// Run one full scan-evaluate-emit-retain cycle
    ///
    /// Every failure inside a cycle is recoverable: it is logged and the
    /// rest of the cycle (or the next one) proceeds.
    pub fn run_cycle(&mut self) {
        let Some(content) = self.read_source_log() else {
            return;
        };

        let observations = content
            .lines()
            .filter_map(|line| self.parser.parse_line(line));
        let snapshot = ActivitySnapshot::from_observations(observations);

        // A scan without observations makes no decisions: evaluation,
        // emission, and retention all need a reference time.
        let Some(reference_time) = snapshot.reference_time() else {
            debug!("Scan produced no observations");
            return;
        };

        let mut violation_this_cycle = false;
        for (email, last_seen) in snapshot.identities() {
            if self.config.whitelist_emails.contains(email) {
                continue;
            }

            let evaluation =
                evaluator::evaluate(last_seen, reference_time, self.config.max_ips_per_identity);
            if !evaluation.is_violation() {
                continue;
            }

            violation_this_cycle = true;
            self.emit_violations(email, &evaluation);
        }

        let now = Utc::now().timestamp();
        if self
            .retention
            .should_clear(violation_this_cycle, self.last_clear, now)
        {
            self.clear_source_log();
        }
    }

    /// Read the current source log snapshot
    ///
    /// A missing file is normal (the external writer may not have created
    /// it yet); other I/O errors skip this cycle's evaluation. Content is
    /// decoded lossily: one mangled line must not hide the rest.
    fn read_source_log(&self) -> Option<String> {
        match fs::read(&self.config.source_log_path) {
            Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
            Err(err) if err.kind() == ErrorKind::NotFound => None,
            Err(err) => {
                error!(
                    path = %self.config.source_log_path,
                    error = %err,
                    "Failed to read source log"
                );
                None
            }
        }
    }

    /// Gate each excess address through the dedup cache, then record and
    /// notify the confirmed ones
    fn emit_violations(&mut self, email: &str, evaluation: &Evaluation) {
        for address in &evaluation.excess {
            let now = Utc::now().timestamp();
            if !self.cache.check_and_update(email, address, now) {
                debug!(email, address = %address, "Violation suppressed by cooldown");
                continue;
            }

            let violation = Violation::new(
                email,
                address,
                evaluation.active.len(),
                self.config.max_ips_per_identity,
            );
            violation.log();

            if let Err(err) = self.sink.append(&violation) {
                error!(error = %err, "Failed to write violation record");
            }

            if let Some(notifier) = &self.notifier {
                notifier.notify(&violation);
            }
        }
    }

    /// Truncate the source log and reset the state scoped to it
    fn clear_source_log(&mut self) {
        if let Err(err) = retention::truncate_log(Path::new(&self.config.source_log_path)) {
            error!(error = %err, "Failed to truncate source log");
            return;
        }

        self.cache.clear();
        self.last_clear = Utc::now().timestamp();
        info!(path = %self.config.source_log_path, "Source log truncated");
    }
}
