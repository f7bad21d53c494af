//! Error taxonomy for webhook delivery.

use std::time::Duration;

/// Failure modes of a webhook submission.
///
/// `Status` carries the numeric status and status text; a status in
/// [400, 500) is terminal (the caller's request is at fault), everything
/// else is eligible for retry.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// The transport failed (DNS, connection refused, TLS, ...).
    #[error("Failed to reach webhook endpoint: {0}")]
    Network(#[source] reqwest::Error),

    /// A single attempt exceeded its timeout and was aborted.
    #[error("Webhook request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// The remote returned a non-2xx status code.
    #[error("Webhook request failed with status {status} {status_text}")]
    Status { status: u16, status_text: String },

    /// The response body was not valid JSON.
    #[error("Webhook returned an unreadable body: {0}")]
    Decode(String),
}

impl WebhookError {
    /// True for HTTP statuses in [400, 500) -- failures the caller caused,
    /// which another attempt cannot fix.
    pub fn is_client_error(&self) -> bool {
        matches!(self, WebhookError::Status { status, .. } if (400..500).contains(status))
    }

    /// Everything except a client error may succeed on a later attempt.
    pub fn is_retryable(&self) -> bool {
        !self.is_client_error()
    }
}
