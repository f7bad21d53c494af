//! Display model for webhook responses.
//!
//! Webhook bodies are open-shaped JSON. The `result` key, when present and
//! non-null, takes precedence as the display content; otherwise the whole
//! body is used. The shape is resolved exactly once, here, into a tagged
//! union -- downstream code never threads raw `Value`s around.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Resolved display content of a webhook response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "content")]
pub enum ResultContent {
    /// A single block of text.
    Scalar(String),
    /// Discrete content blocks, rendered in order.
    List(Vec<String>),
}

impl ResultContent {
    /// Resolve a decoded webhook body into display content.
    pub fn from_response(body: &Value) -> Self {
        let content = match body.get("result") {
            Some(v) if !v.is_null() => v,
            _ => body,
        };
        match content {
            Value::String(s) => ResultContent::Scalar(s.clone()),
            Value::Array(items) => {
                ResultContent::List(items.iter().map(stringify_block).collect())
            }
            other => ResultContent::Scalar(stringify_block(other)),
        }
    }

    /// Plain-text rendering for the copy-to-clipboard affordance; list
    /// blocks are joined with newlines.
    pub fn copy_text(&self) -> String {
        match self {
            ResultContent::Scalar(s) => s.clone(),
            ResultContent::List(items) => items.join("\n"),
        }
    }
}

fn stringify_block(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
