//! Fetch client: GET + JSON parse + provider marker handling + retry.
//!
//! Alpha Vantage signals throttling inside a `200 OK` body (`"Note"`) and
//! reports bad calls the same way (`"Error Message"`), so classification has
//! to look at the payload, not just the status code.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::endpoint::redact_api_key;
use crate::http_client::{HttpClient, HttpRequest};
use crate::retry::RetryConfig;
use crate::FetchError;

/// Payload key marking a throttled response.
pub const RATE_LIMIT_MARKER: &str = "Note";

/// Payload key carrying an explicit provider error.
pub const ERROR_MARKER: &str = "Error Message";

/// Outcome of a single attempt.
#[derive(Debug)]
enum Attempt {
    Retry(FetchError),
    Fail(FetchError),
}

/// HTTP client wrapper that retries throttled and transient failures.
#[derive(Clone)]
pub struct FetchClient {
    http: Arc<dyn HttpClient>,
    retry: RetryConfig,
    timeout_ms: u64,
}

impl FetchClient {
    pub fn new(http: Arc<dyn HttpClient>, retry: RetryConfig) -> Self {
        Self {
            http,
            retry,
            timeout_ms: 5_000,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    /// Fetch with the configured retry budget.
    pub async fn fetch(&self, url: &str) -> Result<Value, FetchError> {
        self.fetch_with_retry(url, self.retry.max_retries).await
    }

    /// Fetch `url`, retrying up to `retries_remaining` more times.
    ///
    /// Throttled responses and transport/parse failures wait the backoff delay
    /// and try again; when the budget is spent the last error is returned.
    /// Explicit provider errors fail at once without touching the budget.
    pub async fn fetch_with_retry(
        &self,
        url: &str,
        retries_remaining: u32,
    ) -> Result<Value, FetchError> {
        let mut remaining = self.retry.effective_budget(retries_remaining);
        let mut attempt = 0_u32;

        loop {
            let error = match self.attempt(url).await {
                Ok(value) => return Ok(value),
                Err(Attempt::Fail(error)) => return Err(error),
                Err(Attempt::Retry(error)) => error,
            };

            if remaining == 0 {
                return Err(error);
            }

            let delay = self.retry.delay_for_attempt(attempt);
            warn!(
                url = %redact_api_key(url),
                reason = error.code(),
                retries_left = remaining,
                delay_ms = delay.as_millis() as u64,
                "{}; retrying",
                error.message()
            );
            tokio::time::sleep(delay).await;

            remaining -= 1;
            attempt = attempt.saturating_add(1);
        }
    }

    async fn attempt(&self, url: &str) -> Result<Value, Attempt> {
        debug!(url = %redact_api_key(url), "fetching");

        let request = HttpRequest::get(url)
            .with_header("Accept", "application/json")
            .with_timeout_ms(self.timeout_ms);
        let response = self.http.execute(request).await.map_err(|error| {
            let failure = FetchError::transport(error.message());
            if error.retryable() {
                Attempt::Retry(failure)
            } else {
                Attempt::Fail(failure)
            }
        })?;

        if !response.is_success() {
            // Provider markers decide even on an error status.
            if let Some(payload) = serde_json::from_str::<Value>(&response.body)
                .ok()
                .filter(carries_marker)
            {
                return classify_payload(payload);
            }

            let failure =
                FetchError::transport(format!("provider returned status {}", response.status));
            return Err(if self.retry.should_retry_status(response.status) {
                Attempt::Retry(failure)
            } else {
                Attempt::Fail(failure)
            });
        }

        let payload = serde_json::from_str::<Value>(&response.body).map_err(|error| {
            Attempt::Retry(FetchError::transport(format!(
                "failed to parse response: {error}"
            )))
        })?;

        classify_payload(payload)
    }
}

fn carries_marker(payload: &Value) -> bool {
    payload.get(RATE_LIMIT_MARKER).is_some() || payload.get(ERROR_MARKER).is_some()
}

fn classify_payload(payload: Value) -> Result<Value, Attempt> {
    if payload.get(RATE_LIMIT_MARKER).is_some() {
        return Err(Attempt::Retry(FetchError::rate_limited()));
    }

    if let Some(message) = payload.get(ERROR_MARKER) {
        let message = match message {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        return Err(Attempt::Fail(FetchError::api(message)));
    }

    Ok(payload)
}
