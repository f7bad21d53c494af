//! HTTP delivery with exponential-backoff retry.
//!
//! [`WebhookClient`] POSTs a JSON payload and returns the decoded response
//! body. Transient failures (network, timeout, 5xx, undecodable body) are
//! retried up to the attempt budget with exponential backoff; 4xx statuses
//! fail immediately.

use std::time::Duration;

use serde::Serialize;

use crate::error::WebhookError;

/// Per-attempt timeout.
const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(30);

/// Total attempts per `submit` call (first try included).
const MAX_ATTEMPTS: u32 = 3;

/// Base backoff delay; doubled per attempt index.
const BASE_DELAY: Duration = Duration::from_millis(1000);

/// Backoff ceiling.
const MAX_DELAY: Duration = Duration::from_millis(10_000);

/// Retry behaviour of a [`WebhookClient`].
///
/// The defaults match production behaviour; tests inject shorter values.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, first try included. Clamped to at least 1.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles per attempt index.
    pub base_delay: Duration,
    /// Upper bound on any single backoff delay.
    pub max_delay: Duration,
    /// Independent timeout applied to each attempt.
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            base_delay: BASE_DELAY,
            max_delay: MAX_DELAY,
            attempt_timeout: ATTEMPT_TIMEOUT,
        }
    }
}

impl RetryPolicy {
    /// Backoff delay applied after the failure of attempt `attempt`
    /// (0-based): `min(base * 2^attempt, max)`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(self.max_delay)
    }
}

/// Stateless webhook delivery client.
///
/// Holds a pre-configured HTTP client; `submit` calls are independent and
/// side-effect free beyond the network request itself (no caching). Within
/// one call, attempts are strictly sequential -- a retry never starts before
/// the previous attempt has settled and its backoff delay has elapsed.
pub struct WebhookClient {
    client: reqwest::Client,
    policy: RetryPolicy,
}

impl WebhookClient {
    /// Create a client with the production retry policy.
    pub fn new() -> Self {
        Self::with_policy(RetryPolicy::default())
    }

    /// Create a client with an explicit retry policy.
    pub fn with_policy(policy: RetryPolicy) -> Self {
        let client = reqwest::Client::builder()
            .timeout(policy.attempt_timeout)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { client, policy }
    }

    /// Deliver a JSON payload and return the decoded response body.
    ///
    /// A status in [400, 500) rejects immediately regardless of remaining
    /// attempt budget; any other failure is retried until the budget is
    /// exhausted, after which the last observed error is surfaced.
    pub async fn submit<T>(&self, url: &str, payload: &T) -> Result<serde_json::Value, WebhookError>
    where
        T: Serialize + ?Sized,
    {
        let retries = self.policy.max_attempts.max(1) - 1;

        for attempt in 0..retries {
            match self.try_send(url, payload).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_client_error() => return Err(e),
                Err(e) => {
                    tracing::warn!(
                        attempt = attempt + 1,
                        url,
                        error = %e,
                        "Webhook attempt failed, retrying"
                    );
                    tokio::time::sleep(self.policy.delay_for(attempt)).await;
                }
            }
        }

        // Final attempt after the last backoff; its error is surfaced as-is.
        self.try_send(url, payload).await.inspect_err(|e| {
            tracing::error!(url, error = %e, "Webhook delivery failed after all attempts");
        })
    }

    /// Execute a single POST and decode the JSON response.
    async fn try_send<T>(&self, url: &str, payload: &T) -> Result<serde_json::Value, WebhookError>
    where
        T: Serialize + ?Sized,
    {
        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| self.classify_transport(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WebhookError::Status {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        response.json().await.map_err(|e| {
            if e.is_timeout() {
                WebhookError::Timeout(self.policy.attempt_timeout)
            } else {
                WebhookError::Decode(e.to_string())
            }
        })
    }

    fn classify_transport(&self, e: reqwest::Error) -> WebhookError {
        if e.is_timeout() {
            WebhookError::Timeout(self.policy.attempt_timeout)
        } else {
            WebhookError::Network(e)
        }
    }
}

impl Default for WebhookClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(1), Duration::from_millis(2000));
        assert_eq!(policy.delay_for(2), Duration::from_millis(4000));
        assert_eq!(policy.delay_for(3), Duration::from_millis(8000));
        // Capped at 10s from attempt index 4 onwards.
        assert_eq!(policy.delay_for(4), Duration::from_millis(10_000));
        assert_eq!(policy.delay_for(10), Duration::from_millis(10_000));
    }

    #[test]
    fn default_policy_matches_production_constants() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.attempt_timeout, Duration::from_secs(30));
    }

    #[test]
    fn new_does_not_panic() {
        let _client = WebhookClient::new();
    }
}
