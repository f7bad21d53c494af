//! The per-form-instance controller and its state machine.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use serde_json::Value;

use toolforge_core::form::{
    default_values, generate_schema, FieldType, FieldValue, FormConfig, FormSchema, FormValues,
    ResultContent,
};
use toolforge_webhook::{WebhookClient, WebhookError};

use crate::sink::{SubmissionRecord, SubmissionSink};

/// How long the "copied" indicator stays on after a copy.
const COPY_FEEDBACK: Duration = Duration::from_secs(2);

/// Default idle hint shown under the submit control.
const DEFAULT_IDLE_HINT: &str = "Submit the form to generate results";

/// Default heading for the response panel.
const DEFAULT_RESULT_TITLE: &str = "Result";

/// Visible state of the form.
///
/// `Validating` is synchronous relative to caller interaction -- it is
/// entered and left within one call, never across an await point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormState {
    Idle,
    Validating,
    Submitting,
    Success,
    Error,
}

/// Rendered outcome of a successful submission.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionDisplay {
    /// Heading for the response panel.
    pub title: String,
    /// The decoded webhook body, verbatim.
    pub body: Value,
    /// The body resolved to display content.
    pub content: ResultContent,
}

/// Failure modes of `submit`/`regenerate`.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("Webhook URL is not configured")]
    MissingWebhookUrl,

    /// Local validation failed; the field→message map is surfaced inline.
    #[error("Validation failed")]
    Validation(BTreeMap<String, String>),

    #[error(transparent)]
    Webhook(#[from] WebhookError),

    #[error("No previously validated payload to regenerate")]
    NothingToRegenerate,
}

/// Controller for one dynamic form instance.
///
/// Owns the [`FormValues`] exclusively; `submit` and `regenerate` take
/// `&mut self`, so at most one submission can be in flight per instance.
/// There is no cancel affordance -- a submission runs to a terminal state.
pub struct FormSession {
    config: FormConfig,
    schema: FormSchema,
    values: FormValues,
    state: FormState,
    response: Option<SubmissionDisplay>,
    error: Option<String>,
    field_errors: BTreeMap<String, String>,
    last_payload: Option<FormValues>,
    copied_at: Option<Instant>,
    client: Arc<WebhookClient>,
    sink: Option<Arc<dyn SubmissionSink>>,
}

impl FormSession {
    /// Build a session from an immutable config. Values start at their
    /// per-type defaults.
    pub fn new(config: FormConfig, client: Arc<WebhookClient>) -> Self {
        let schema = generate_schema(&config.fields);
        let values = default_values(&config.fields);
        Self {
            config,
            schema,
            values,
            state: FormState::Idle,
            response: None,
            error: None,
            field_errors: BTreeMap::new(),
            last_payload: None,
            copied_at: None,
            client,
            sink: None,
        }
    }

    /// Attach a history sink. Persistence only happens when a sink is
    /// present and the config carries tool identifiers.
    pub fn with_sink(mut self, sink: Arc<dyn SubmissionSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn field_errors(&self) -> &BTreeMap<String, String> {
        &self.field_errors
    }

    /// Response panel content, present only in the `Success` state.
    pub fn response(&self) -> Option<&SubmissionDisplay> {
        self.response.as_ref()
    }

    /// Banner text for the `Error` state.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Hint shown while idle with no response or error.
    pub fn idle_hint(&self) -> &str {
        self.config
            .messages
            .as_ref()
            .and_then(|m| m.success.as_deref())
            .unwrap_or(DEFAULT_IDLE_HINT)
    }

    /// Write a raw caller-supplied value into the form, mapped to the
    /// field's semantic type: checked-boolean for checkboxes, parsed-float
    /// for numbers, raw string otherwise. Unknown field names are ignored.
    pub fn set_field(&mut self, name: &str, raw: &Value) {
        let Some(spec) = self.config.fields.iter().find(|f| f.name == name) else {
            return;
        };
        let value = parse_raw_value(spec.field_type, raw);
        self.values.insert(spec.name.clone(), value);
    }

    /// Seed values from a JSON object body (one submit request's payload).
    /// Only keys matching configured fields are read.
    pub fn seed(&mut self, body: &Value) {
        let field_names: Vec<String> =
            self.config.fields.iter().map(|f| f.name.clone()).collect();
        for name in field_names {
            if let Some(raw) = body.get(&name) {
                self.set_field(&name, raw);
            }
        }
    }

    /// Blur-time validation of a single field. Updates (or clears) that
    /// field's inline error and returns the current message, if any.
    pub fn validate_field(&mut self, name: &str) -> Option<&str> {
        self.state = FormState::Validating;
        match self.schema.validate_field(name, &self.values) {
            Some(message) => {
                self.field_errors.insert(name.to_string(), message);
            }
            None => {
                self.field_errors.remove(name);
            }
        }
        self.state = FormState::Idle;
        self.field_errors.get(name).map(String::as_str)
    }

    /// Validate everything and, if clean, deliver the payload.
    ///
    /// On success the response panel is populated, values reset to their
    /// defaults, and the record is forwarded to the sink without being
    /// awaited. On failure the response is cleared and values are retained
    /// so the caller can correct and resubmit.
    pub async fn submit(&mut self) -> Result<SubmissionDisplay, SubmitError> {
        self.state = FormState::Validating;
        let outcome = self.schema.safe_validate(&self.values);
        if !outcome.valid {
            self.field_errors = outcome.errors.clone();
            self.state = FormState::Idle;
            return Err(SubmitError::Validation(outcome.errors));
        }
        self.field_errors.clear();

        if self.config.webhook_url.is_empty() {
            self.state = FormState::Error;
            self.error = Some(SubmitError::MissingWebhookUrl.to_string());
            return Err(SubmitError::MissingWebhookUrl);
        }

        // The payload is now validated; keep it for regeneration.
        let payload = self.values.clone();
        self.last_payload = Some(payload.clone());

        let display = self.dispatch(&payload).await?;

        // Reset to defaults only after a successful submit.
        self.values = default_values(&self.config.fields);
        self.persist(payload, display.body.clone());

        Ok(display)
    }

    /// Install a payload that was validated by an earlier session (e.g. a
    /// stored submission) so [`regenerate`](Self::regenerate) can re-run it.
    pub fn restore_payload(&mut self, payload: FormValues) {
        self.last_payload = Some(payload);
    }

    /// Re-submit the last successfully-validated payload without
    /// re-running validation. Values are not reset and no history record
    /// is written -- this re-runs the same inputs for a fresh result.
    pub async fn regenerate(&mut self) -> Result<SubmissionDisplay, SubmitError> {
        let payload = self
            .last_payload
            .clone()
            .ok_or(SubmitError::NothingToRegenerate)?;
        let display = self.dispatch(&payload).await?;
        Ok(display)
    }

    /// Back to the initial state: default values, no panel, no errors.
    pub fn reset(&mut self) {
        self.values = default_values(&self.config.fields);
        self.field_errors.clear();
        self.response = None;
        self.error = None;
        self.state = FormState::Idle;
    }

    /// Plain-text rendering of the current response for the clipboard.
    pub fn copy_text(&self) -> Option<String> {
        self.response.as_ref().map(|d| d.content.copy_text())
    }

    /// Record that the response was copied at `now`. Independent of the
    /// submit state machine.
    pub fn mark_copied(&mut self, now: Instant) {
        self.copied_at = Some(now);
    }

    /// Whether the transient "copied" indicator is still showing at `now`.
    pub fn is_copied(&self, now: Instant) -> bool {
        self.copied_at
            .is_some_and(|at| now.duration_since(at) < COPY_FEEDBACK)
    }

    /// One webhook round trip plus state bookkeeping, shared by submit and
    /// regenerate.
    async fn dispatch(&mut self, payload: &FormValues) -> Result<SubmissionDisplay, SubmitError> {
        self.response = None;
        self.state = FormState::Submitting;

        match self.client.submit(&self.config.webhook_url, payload).await {
            Ok(body) => {
                let display = SubmissionDisplay {
                    title: self
                        .config
                        .result_title
                        .clone()
                        .unwrap_or_else(|| DEFAULT_RESULT_TITLE.to_string()),
                    content: ResultContent::from_response(&body),
                    body,
                };
                self.response = Some(display.clone());
                self.error = None;
                self.state = FormState::Success;
                Ok(display)
            }
            Err(e) => {
                self.response = None;
                self.error = Some(e.to_string());
                self.state = FormState::Error;
                Err(SubmitError::Webhook(e))
            }
        }
    }

    /// Spawn the best-effort history write. Runs after the success state is
    /// already established and is never awaited; failure is only logged.
    fn persist(&self, form_data: FormValues, result: Value) {
        let (Some(sink), Some(tool_id), Some(tool_name)) = (
            self.sink.clone(),
            self.config.tool_id,
            self.config.tool_name.clone(),
        ) else {
            return;
        };

        let record = SubmissionRecord {
            tool_id,
            tool_name,
            form_data,
            result,
        };
        tokio::spawn(async move {
            if let Err(e) = sink.record(record).await {
                tracing::warn!(tool_id, error = %e, "Failed to persist submission history");
            }
        });
    }
}

/// Map a raw JSON value onto a field's semantic type.
fn parse_raw_value(field_type: FieldType, raw: &Value) -> FieldValue {
    match field_type {
        FieldType::Checkbox => FieldValue::Bool(raw.as_bool().unwrap_or(false)),
        FieldType::Number => match raw {
            Value::Number(n) => FieldValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            // An unparseable string is kept as text so validation can
            // report "must be a number" instead of silently coercing.
            Value::String(s) => match s.trim().parse::<f64>() {
                Ok(n) if !s.trim().is_empty() => FieldValue::Number(n),
                _ => FieldValue::Text(s.clone()),
            },
            _ => FieldValue::Text(String::new()),
        },
        FieldType::Text | FieldType::Textarea | FieldType::Select => match raw {
            Value::String(s) => FieldValue::Text(s.clone()),
            Value::Number(n) => FieldValue::Text(n.to_string()),
            Value::Bool(b) => FieldValue::Text(b.to_string()),
            _ => FieldValue::Text(String::new()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use toolforge_core::form::{FieldSpec, ValidationRules};

    fn spec(name: &str, field_type: FieldType, required: bool) -> FieldSpec {
        FieldSpec {
            name: name.to_string(),
            label: name.to_string(),
            field_type,
            placeholder: None,
            required,
            validation: Some(ValidationRules::required_only(required)),
            options: None,
        }
    }

    fn config(fields: Vec<FieldSpec>) -> FormConfig {
        FormConfig {
            fields,
            webhook_url: "http://localhost:1/hook".to_string(),
            result_title: None,
            tool_id: None,
            tool_name: None,
            messages: None,
        }
    }

    fn session(fields: Vec<FieldSpec>) -> FormSession {
        FormSession::new(config(fields), Arc::new(WebhookClient::new()))
    }

    #[test]
    fn starts_idle_with_default_values() {
        let s = session(vec![
            spec("idea", FieldType::Text, true),
            spec("agree", FieldType::Checkbox, false),
        ]);
        assert_eq!(s.state(), FormState::Idle);
        assert_eq!(s.values()["idea"], FieldValue::Text(String::new()));
        assert_eq!(s.values()["agree"], FieldValue::Bool(false));
    }

    #[test]
    fn set_field_dispatches_by_type() {
        let mut s = session(vec![
            spec("idea", FieldType::Text, false),
            spec("age", FieldType::Number, false),
            spec("agree", FieldType::Checkbox, false),
        ]);

        s.set_field("idea", &json!("sell snow"));
        s.set_field("age", &json!("42"));
        s.set_field("agree", &json!(true));

        assert_eq!(s.values()["idea"], FieldValue::Text("sell snow".into()));
        assert_eq!(s.values()["age"], FieldValue::Number(42.0));
        assert_eq!(s.values()["agree"], FieldValue::Bool(true));
    }

    #[test]
    fn unparseable_number_stays_text_for_validation() {
        let mut s = session(vec![spec("age", FieldType::Number, true)]);
        s.set_field("age", &json!("ten"));
        assert_eq!(s.values()["age"], FieldValue::Text("ten".into()));
        assert_eq!(s.validate_field("age"), Some("age must be a number"));
    }

    #[test]
    fn unknown_field_names_are_ignored() {
        let mut s = session(vec![spec("idea", FieldType::Text, false)]);
        s.set_field("bogus", &json!("x"));
        assert!(!s.values().contains_key("bogus"));
    }

    #[test]
    fn seed_reads_only_configured_fields() {
        let mut s = session(vec![
            spec("idea", FieldType::Text, false),
            spec("agree", FieldType::Checkbox, false),
        ]);
        s.seed(&json!({"idea": "go north", "agree": true, "injected": "nope"}));
        assert_eq!(s.values()["idea"], FieldValue::Text("go north".into()));
        assert_eq!(s.values()["agree"], FieldValue::Bool(true));
        assert!(!s.values().contains_key("injected"));
    }

    #[test]
    fn blur_validation_sets_and_clears_inline_error() {
        let mut s = session(vec![spec("idea", FieldType::Text, true)]);

        assert_eq!(s.validate_field("idea"), Some("idea is required"));
        assert_eq!(s.field_errors().len(), 1);

        s.set_field("idea", &json!("sell snow"));
        assert_eq!(s.validate_field("idea"), None);
        assert!(s.field_errors().is_empty());
        assert_eq!(s.state(), FormState::Idle);
    }

    #[tokio::test]
    async fn invalid_submit_reports_errors_and_stays_off_the_network() {
        // Unroutable webhook URL: reaching the network would fail loudly,
        // so an Err(Validation) here proves no request was attempted.
        let mut s = session(vec![spec("idea", FieldType::Text, true)]);

        let err = s.submit().await.unwrap_err();
        match err {
            SubmitError::Validation(errors) => {
                assert_eq!(errors["idea"], "idea is required");
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
        assert_eq!(s.state(), FormState::Idle);
        assert_eq!(s.field_errors()["idea"], "idea is required");
    }

    #[tokio::test]
    async fn missing_webhook_url_is_an_error_state() {
        let mut cfg = config(vec![spec("idea", FieldType::Text, false)]);
        cfg.webhook_url = String::new();
        let mut s = FormSession::new(cfg, Arc::new(WebhookClient::new()));

        let err = s.submit().await.unwrap_err();
        assert!(matches!(err, SubmitError::MissingWebhookUrl));
        assert_eq!(s.state(), FormState::Error);
        assert_eq!(s.error_message(), Some("Webhook URL is not configured"));
    }

    #[tokio::test]
    async fn regenerate_without_payload_is_rejected() {
        let mut s = session(vec![spec("idea", FieldType::Text, false)]);
        let err = s.regenerate().await.unwrap_err();
        assert!(matches!(err, SubmitError::NothingToRegenerate));
    }

    #[test]
    fn copied_indicator_reverts_after_two_seconds() {
        let mut s = session(vec![spec("idea", FieldType::Text, false)]);
        let t0 = Instant::now();

        assert!(!s.is_copied(t0));
        s.mark_copied(t0);
        assert!(s.is_copied(t0 + Duration::from_millis(1500)));
        assert!(!s.is_copied(t0 + Duration::from_millis(2500)));
    }

    #[test]
    fn idle_hint_prefers_configured_message() {
        let mut cfg = config(vec![spec("idea", FieldType::Text, false)]);
        cfg.messages = Some(toolforge_core::form::FormMessages {
            success: Some("Ready when you are".to_string()),
            error: None,
        });
        let s = FormSession::new(cfg, Arc::new(WebhookClient::new()));
        assert_eq!(s.idle_hint(), "Ready when you are");
    }
}
