//! Webhook submission client.
//!
//! Delivers a JSON payload to an admin-configured URL and returns the parsed
//! JSON result, tolerating transient network failure: each attempt has an
//! independent timeout, attempts are bounded, and retries back off
//! exponentially. Client errors (4xx) are never retried.

pub mod client;
pub mod error;

pub use client::{RetryPolicy, WebhookClient};
pub use error::WebhookError;
