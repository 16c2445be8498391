//! Webhook notification configuration.

use std::env;

/// Configuration for outbound webhook notifications
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// Notification endpoint; `None` disables delivery entirely
    pub url: Option<String>,
    /// Extra headers applied to every request
    pub headers: Vec<(String, String)>,
    /// Server label included in the payload
    pub server_name: String,
    /// Informational ban-duration hint included in the payload
    pub ban_duration_minutes: u64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: None,
            headers: Vec::new(),
            server_name: "VPN Server".to_string(),
            ban_duration_minutes: 30,
        }
    }
}

impl WebhookConfig {
    /// Load configuration from environment variables, falling back to defaults
    ///
    /// An empty or literal `none` `WEBHOOK_URL` disables notifications.
    pub fn from_env() -> Self {
        let url = env::var("WEBHOOK_URL")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("none"));

        let headers = env::var("WEBHOOK_HEADERS")
            .map(|v| parse_headers(&v))
            .unwrap_or_default();

        let server_name =
            env::var("SERVER_NAME").unwrap_or_else(|_| "VPN Server".to_string());

        let ban_duration_minutes = env::var("BAN_DURATION_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        Self {
            url,
            headers,
            server_name,
            ban_duration_minutes,
        }
    }

    /// Whether a notification endpoint is configured
    pub fn is_enabled(&self) -> bool {
        self.url.is_some()
    }
}

/// Parse `Key: Value,Key2: Value2` header pairs, skipping malformed entries
fn parse_headers(value: &str) -> Vec<(String, String)> {
    value
        .split(',')
        .filter_map(|pair| {
            let (name, value) = pair.split_once(':')?;
            let name = name.trim();
            let value = value.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), value.to_string()))
        })
        .collect()
}
