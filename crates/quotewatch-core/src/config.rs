use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use std::time::Duration;

use crate::controller::{ControllerSettings, PollingController};
use crate::endpoint::{EndpointBuilder, DEFAULT_BASE_URL};
use crate::fetch::FetchClient;
use crate::http_client::HttpClient;
use crate::market::MarketDataClient;
use crate::pacing::PacingMode;
use crate::retry::RetryConfig;
use crate::ValidationError;

pub const API_KEY_ENV: &str = "QUOTEWATCH_API_KEY";
pub const BASE_URL_ENV: &str = "QUOTEWATCH_BASE_URL";
pub const REFRESH_SECS_ENV: &str = "QUOTEWATCH_REFRESH_SECS";
pub const RETRY_BACKOFF_ENV: &str = "QUOTEWATCH_RETRY_BACKOFF";
pub const PACING_ENV: &str = "QUOTEWATCH_PACING";

/// Runtime configuration. Defaults target the public Alpha Vantage endpoint
/// with the `demo` key.
#[derive(Clone, PartialEq)]
pub struct Config {
    pub base_url: String,
    pub api_key: String,
    pub timeout_ms: u64,
    pub retry: RetryConfig,
    pub controller: ControllerSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            api_key: String::from("demo"),
            timeout_ms: 5_000,
            retry: RetryConfig::default(),
            controller: ControllerSettings::default(),
        }
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("api_key", &"***")
            .field("timeout_ms", &self.timeout_ms)
            .field("retry", &self.retry)
            .field("controller", &self.controller)
            .finish()
    }
}

impl Config {
    /// Defaults overridden by `QUOTEWATCH_*` environment variables.
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(api_key) = lookup(API_KEY_ENV).filter(|value| !value.trim().is_empty()) {
            config.api_key = api_key.trim().to_owned();
        }

        if let Some(base_url) = lookup(BASE_URL_ENV) {
            let trimmed = base_url.trim();
            if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
                return Err(ValidationError::InvalidConfig {
                    key: BASE_URL_ENV,
                    value: base_url,
                    reason: "must be an http(s) URL",
                });
            }
            config.base_url = trimmed.to_owned();
        }

        if let Some(raw) = lookup(REFRESH_SECS_ENV) {
            let seconds = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|seconds| *seconds > 0)
                .ok_or_else(|| ValidationError::InvalidConfig {
                    key: REFRESH_SECS_ENV,
                    value: raw.clone(),
                    reason: "must be a positive number of seconds",
                })?;
            config.controller.refresh_interval = Duration::from_secs(seconds);
        }

        if let Some(raw) = lookup(RETRY_BACKOFF_ENV) {
            config.retry = match raw.trim().to_ascii_lowercase().as_str() {
                "fixed" => RetryConfig::default(),
                "exponential" => RetryConfig::exponential(config.retry.max_retries),
                _ => {
                    return Err(ValidationError::InvalidConfig {
                        key: RETRY_BACKOFF_ENV,
                        value: raw,
                        reason: "must be 'fixed' or 'exponential'",
                    })
                }
            };
        }

        if let Some(raw) = lookup(PACING_ENV) {
            config.controller.pacing =
                PacingMode::parse(&raw).ok_or_else(|| ValidationError::InvalidConfig {
                    key: PACING_ENV,
                    value: raw.clone(),
                    reason: "must be 'interval' or 'token-bucket'",
                })?;
        }

        Ok(config)
    }

    pub fn endpoints(&self) -> EndpointBuilder {
        EndpointBuilder::new(self.base_url.clone(), self.api_key.clone())
    }

    pub fn market_client(&self, http: Arc<dyn HttpClient>) -> MarketDataClient {
        let fetcher = FetchClient::new(http, self.retry.clone()).with_timeout_ms(self.timeout_ms);
        MarketDataClient::new(fetcher, self.endpoints())
    }

    pub fn controller(&self, http: Arc<dyn HttpClient>) -> PollingController {
        PollingController::new(self.market_client(http), self.controller.clone())
    }
}
