//! # Configuration
//!
//! Runtime settings loaded from the environment with the `APP_` prefix,
//! for example `APP_SERVER_ADDR=0.0.0.0:9090`. Every field has a default
//! suitable for local development.

use crate::application::services::price_feed::RetryPolicy;
use serde::Deserialize;
use std::time::Duration;

/// Application settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Socket address the HTTP server binds to.
    pub server_addr: String,
    /// Base URL of the upstream stock service.
    pub stock_service_url: String,
    /// Timeout for one-shot quote requests, in milliseconds.
    pub request_timeout_ms: u64,
    /// Maximum consecutive reconnect attempts for the price stream.
    pub stream_retry_attempts: u32,
    /// Delay between reconnect attempts, in milliseconds.
    pub stream_retry_delay_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_addr: "0.0.0.0:8080".to_string(),
            stock_service_url: "http://localhost:7000".to_string(),
            request_timeout_ms: 5000,
            stream_retry_attempts: 100,
            stream_retry_delay_ms: 1000,
        }
    }
}

impl AppConfig {
    /// Loads settings from `APP_`-prefixed environment variables, falling
    /// back to the defaults for anything unset.
    ///
    /// # Errors
    ///
    /// Returns a [`config::ConfigError`] if a variable is present but
    /// cannot be parsed into its field type.
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("APP").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Quote request timeout as a [`Duration`].
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Retry budget for the shared price stream.
    #[must_use]
    pub const fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.stream_retry_attempts,
            Duration::from_millis(self.stream_retry_delay_ms),
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_local_development() {
        let config = AppConfig::default();
        assert_eq!(config.server_addr, "0.0.0.0:8080");
        assert_eq!(config.stock_service_url, "http://localhost:7000");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(
            config.retry_policy(),
            RetryPolicy::new(100, Duration::from_secs(1))
        );
    }

    #[test]
    fn partial_overrides_keep_other_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"stream_retry_attempts": 3}"#).unwrap();
        assert_eq!(config.stream_retry_attempts, 3);
        assert_eq!(config.server_addr, "0.0.0.0:8080");
    }
}
