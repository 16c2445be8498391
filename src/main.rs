use std::process::ExitCode;

use tracing::error;
use tracing_subscriber::EnvFilter;

use ip_limiter::{IpLimiter, LimiterConfig, WebhookConfig};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = LimiterConfig::from_env();
    if let Err(err) = config.validate() {
        error!(error = %err, "Invalid configuration");
        return ExitCode::FAILURE;
    }

    let webhook = WebhookConfig::from_env();

    let mut limiter = match IpLimiter::new(config, &webhook) {
        Ok(limiter) => limiter,
        Err(err) => {
            error!(error = %err, "Failed to initialize limiter");
            return ExitCode::FAILURE;
        }
    };

    match limiter.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "Limiter terminated with error");
            ExitCode::FAILURE
        }
    }
}
