//! End-to-end controller tests against a local mock webhook.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;
use toolforge_core::form::{
    FieldSpec, FieldType, FieldValue, FormConfig, ResultContent, ValidationRules,
};
use toolforge_forms::{FormSession, FormState, SubmissionRecord, SubmissionSink, SubmitError};
use toolforge_webhook::{RetryPolicy, WebhookClient};
use wiremock::matchers::{body_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_client() -> Arc<WebhookClient> {
    Arc::new(WebhookClient::with_policy(RetryPolicy {
        max_attempts: 3,
        base_delay: Duration::from_millis(5),
        max_delay: Duration::from_millis(20),
        attempt_timeout: Duration::from_millis(250),
    }))
}

fn idea_config(webhook_url: String) -> FormConfig {
    FormConfig {
        fields: vec![FieldSpec {
            name: "idea".to_string(),
            label: "idea".to_string(),
            field_type: FieldType::Text,
            placeholder: None,
            required: true,
            validation: Some(ValidationRules::required_only(true)),
            options: None,
        }],
        webhook_url,
        result_title: None,
        tool_id: Some(7),
        tool_name: Some("Idea Analyzer".to_string()),
        messages: None,
    }
}

/// In-memory sink capturing every record for assertions.
#[derive(Default)]
struct MemorySink {
    records: Mutex<Vec<SubmissionRecord>>,
}

#[async_trait::async_trait]
impl SubmissionSink for MemorySink {
    async fn record(&self, record: SubmissionRecord) -> anyhow::Result<()> {
        self.records.lock().unwrap().push(record);
        Ok(())
    }
}

/// Poll the sink until the spawned write lands (it is fire-and-forget).
async fn wait_for_records(sink: &MemorySink) -> Vec<SubmissionRecord> {
    for _ in 0..100 {
        {
            let records = sink.records.lock().unwrap();
            if !records.is_empty() {
                return records.clone();
            }
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("sink never received the submission record");
}

#[tokio::test]
async fn successful_submit_displays_result_and_resets_values() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_json(json!({"idea": "sell snow"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"result": "Analysis: strong idea"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let sink = Arc::new(MemorySink::default());
    let mut session = FormSession::new(idea_config(server.uri()), fast_client())
        .with_sink(Arc::clone(&sink) as Arc<dyn SubmissionSink>);

    session.set_field("idea", &json!("sell snow"));
    let display = session.submit().await.unwrap();

    assert_eq!(session.state(), FormState::Success);
    assert_eq!(
        display.content,
        ResultContent::Scalar("Analysis: strong idea".to_string())
    );
    assert_eq!(session.copy_text().unwrap(), "Analysis: strong idea");

    // Values reset to defaults after success.
    assert_eq!(session.values()["idea"], FieldValue::Text(String::new()));

    // History write is best-effort and spawned, so wait for it.
    let records = wait_for_records(&sink).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].tool_id, 7);
    assert_eq!(records[0].tool_name, "Idea Analyzer");
    assert_eq!(
        records[0].form_data["idea"],
        FieldValue::Text("sell snow".to_string())
    );
    assert_eq!(records[0].result, json!({"result": "Analysis: strong idea"}));
}

#[tokio::test]
async fn failed_submit_keeps_values_for_correction() {
    let server = MockServer::start().await;
    // All three attempts fail with 500.
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let mut session = FormSession::new(idea_config(server.uri()), fast_client());
    session.set_field("idea", &json!("sell snow"));

    let err = session.submit().await.unwrap_err();
    assert!(matches!(err, SubmitError::Webhook(_)));

    assert_eq!(session.state(), FormState::Error);
    assert!(session.response().is_none());
    assert!(session.error_message().unwrap().contains("500"));

    // Values are NOT reset on failure.
    assert_eq!(
        session.values()["idea"],
        FieldValue::Text("sell snow".to_string())
    );
}

#[tokio::test]
async fn regenerate_reuses_last_validated_payload() {
    let server = MockServer::start().await;
    // Both the submit and the regenerate must carry the same payload,
    // even though values were reset in between.
    Mock::given(method("POST"))
        .and(body_json(json!({"idea": "sell snow"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "take two"})))
        .expect(2)
        .mount(&server)
        .await;

    let mut session = FormSession::new(idea_config(server.uri()), fast_client());
    session.set_field("idea", &json!("sell snow"));

    session.submit().await.unwrap();
    assert_eq!(session.values()["idea"], FieldValue::Text(String::new()));

    // Regenerate skips validation (values are empty and "idea" is
    // required, so re-validation would fail here).
    let display = session.regenerate().await.unwrap();
    assert_eq!(session.state(), FormState::Success);
    assert_eq!(display.content, ResultContent::Scalar("take two".to_string()));
}

#[tokio::test]
async fn regenerate_failure_transitions_to_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "first"})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut session = FormSession::new(idea_config(server.uri()), fast_client());
    session.set_field("idea", &json!("sell snow"));
    session.submit().await.unwrap();

    let err = session.regenerate().await.unwrap_err();
    assert!(matches!(err, SubmitError::Webhook(_)));
    assert_eq!(session.state(), FormState::Error);
    assert!(session.response().is_none());
}

#[tokio::test]
async fn persistence_is_skipped_without_tool_identifiers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "ok"})))
        .mount(&server)
        .await;

    let sink = Arc::new(MemorySink::default());
    let mut config = idea_config(server.uri());
    config.tool_id = None;
    config.tool_name = None;

    let mut session = FormSession::new(config, fast_client())
        .with_sink(Arc::clone(&sink) as Arc<dyn SubmissionSink>);
    session.set_field("idea", &json!("sell snow"));
    session.submit().await.unwrap();

    // Give any (incorrect) spawned write a chance to land.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(sink.records.lock().unwrap().is_empty());
}

#[tokio::test]
async fn sink_failure_never_disturbs_the_success_state() {
    struct FailingSink;

    #[async_trait::async_trait]
    impl SubmissionSink for FailingSink {
        async fn record(&self, _record: SubmissionRecord) -> anyhow::Result<()> {
            anyhow::bail!("store unavailable")
        }
    }

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "ok"})))
        .mount(&server)
        .await;

    let mut session =
        FormSession::new(idea_config(server.uri()), fast_client()).with_sink(Arc::new(FailingSink));
    session.set_field("idea", &json!("sell snow"));

    session.submit().await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(session.state(), FormState::Success);
    assert!(session.response().is_some());
}
