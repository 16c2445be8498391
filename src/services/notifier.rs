//! Fire-and-forget webhook notification delivery.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use crate::config::WebhookConfig;
use crate::models::{Violation, WebhookEvent};

/// Per-request delivery timeout; protects the notifier's own resources,
/// not the poll loop, which never waits on delivery
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Delivers violation events to a configured webhook endpoint
///
/// Every event is dispatched as a detached task: the caller never blocks
/// on delivery, and any failure (timeout, non-success status, network
/// error) is logged at warning severity and dropped. No retries.
pub struct WebhookNotifier {
    client: Client,
    url: String,
    headers: Vec<(String, String)>,
    server_name: String,
    ban_duration_minutes: u64,
}

impl WebhookNotifier {
    /// Build a notifier from configuration
    ///
    /// Returns `Ok(None)` when no endpoint is configured.
    pub fn new(config: &WebhookConfig) -> Result<Option<Self>, reqwest::Error> {
        let Some(url) = config.url.clone() else {
            return Ok(None);
        };

        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Some(Self {
            client,
            url,
            headers: config.headers.clone(),
            server_name: config.server_name.clone(),
            ban_duration_minutes: config.ban_duration_minutes,
        }))
    }

    /// Host component of the configured endpoint, for logging
    pub fn destination(&self) -> String {
        url::Url::parse(&self.url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| "invalid_url".to_string())
    }

    /// Dispatch one event without blocking the caller
    pub fn notify(&self, violation: &Violation) {
        let event =
            WebhookEvent::from_violation(violation, &self.server_name, self.ban_duration_minutes);
        let client = self.client.clone();
        let url = self.url.clone();
        let headers = self.headers.clone();

        tokio::spawn(async move {
            let mut request = client.post(&url).json(&event);
            for (name, value) in &headers {
                request = request.header(name.as_str(), value.as_str());
            }

            match request.send().await {
                Ok(response) if response.status().is_success() => {
                    debug!(
                        email = %event.email,
                        ip = %event.ip_full,
                        "Webhook delivered"
                    );
                }
                Ok(response) => {
                    warn!(
                        status = response.status().as_u16(),
                        email = %event.email,
                        "Webhook returned non-success status"
                    );
                }
                Err(err) if err.is_timeout() => {
                    warn!(email = %event.email, "Webhook request timed out");
                }
                Err(err) => {
                    warn!(email = %event.email, error = %err, "Webhook delivery failed");
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WebhookConfig;

    #[test]
    fn test_disabled_without_url() {
        let config = WebhookConfig::default();
        assert!(WebhookNotifier::new(&config).unwrap().is_none());
    }

    #[test]
    fn test_destination_extracts_host() {
        let config = WebhookConfig {
            url: Some("https://hooks.example.com/notify?key=abc".to_string()),
            ..WebhookConfig::default()
        };
        let notifier = WebhookNotifier::new(&config).unwrap().unwrap();
        assert_eq!(notifier.destination(), "hooks.example.com");
    }

    #[test]
    fn test_destination_handles_invalid_url() {
        let config = WebhookConfig {
            url: Some("not a url".to_string()),
            ..WebhookConfig::default()
        };
        let notifier = WebhookNotifier::new(&config).unwrap().unwrap();
        assert_eq!(notifier.destination(), "invalid_url");
    }
}
