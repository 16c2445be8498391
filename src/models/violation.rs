//! Violation records and webhook notification payloads.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::utils::mask_address;

/// A confirmed, non-duplicate decision that `address` exceeds `email`'s
/// concurrent-IP quota.
#[derive(Debug, Clone)]
pub struct Violation {
    pub email: String,
    pub address: String,
    /// Number of concurrently active addresses at decision time
    pub active_count: usize,
    /// The quota that was exceeded
    pub limit: usize,
    /// Wall-clock time the decision was confirmed
    pub timestamp: DateTime<Local>,
}

impl Violation {
    /// Create a violation stamped with the current wall-clock time
    pub fn new(email: &str, address: &str, active_count: usize, limit: usize) -> Self {
        Self {
            email: email.to_string(),
            address: address.to_string(),
            active_count,
            limit,
            timestamp: Local::now(),
        }
    }

    /// Log the violation to the operational log using structured logging
    pub fn log(&self) {
        warn!(
            target: "violation_audit",
            email = %self.email,
            banned_ip = %self.address,
            active_ips = self.active_count,
            limit = self.limit,
            "Concurrent IP quota exceeded"
        );
    }
}

/// JSON payload delivered to the webhook endpoint for each violation
///
/// Field names are an outbound contract; consumers match on them exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    pub server: String,
    pub ban_duration_minutes: u64,
    pub ip_masked: String,
    pub ip_full: String,
    pub email: String,
    pub reason: String,
    /// ISO-8601 timestamp of the decision
    pub timestamp: String,
    pub active_ip_count: usize,
    pub limit: usize,
}

impl WebhookEvent {
    /// Build the payload for a violation
    pub fn from_violation(violation: &Violation, server: &str, ban_duration_minutes: u64) -> Self {
        Self {
            server: server.to_string(),
            ban_duration_minutes,
            ip_masked: mask_address(&violation.address),
            ip_full: violation.address.clone(),
            email: violation.email.clone(),
            reason: format!(
                "connected from {} concurrent IPs (limit: {})",
                violation.active_count, violation.limit
            ),
            timestamp: violation.timestamp.to_rfc3339(),
            active_ip_count: violation.active_count,
            limit: violation.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webhook_event_from_violation() {
        let violation = Violation::new("user@example.com", "203.0.113.7", 3, 1);
        let event = WebhookEvent::from_violation(&violation, "edge-1", 30);

        assert_eq!(event.server, "edge-1");
        assert_eq!(event.ban_duration_minutes, 30);
        assert_eq!(event.ip_masked, "203.0.**.**");
        assert_eq!(event.ip_full, "203.0.113.7");
        assert_eq!(event.email, "user@example.com");
        assert_eq!(event.active_ip_count, 3);
        assert_eq!(event.limit, 1);
        assert!(event.reason.contains("3 concurrent IPs"));
        assert!(event.reason.contains("limit: 1"));
    }

    #[test]
    fn test_webhook_event_field_names() {
        let violation = Violation::new("user@example.com", "203.0.113.7", 2, 1);
        let event = WebhookEvent::from_violation(&violation, "edge-1", 30);
        let json = serde_json::to_value(&event).unwrap();

        for field in [
            "server",
            "ban_duration_minutes",
            "ip_masked",
            "ip_full",
            "email",
            "reason",
            "timestamp",
            "active_ip_count",
            "limit",
        ] {
            assert!(json.get(field).is_some(), "missing field {field}");
        }
    }
}
