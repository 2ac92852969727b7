//! Workflow Integration Tests
//!
//! Drives complete documentation runs against a scripted chat service.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use docpipe::ai::{ChatRole, GatewayError, ScriptedGateway, TimedGateway};
use docpipe::workflow::{
    DocumentationProcess, FilePublisher, Publisher, WorkflowError, WorkflowState,
    VERDICT_SCHEMA_NAME,
};

const APPROVE: &str =
    r#"{"meets_expectations": true, "explanation": "Professional and accurate", "suggestions": []}"#;
const REJECT: &str =
    r#"{"meets_expectations": false, "explanation": "Spelling error", "suggestions": ["Fix typo"]}"#;

/// Publisher that keeps everything it is asked to publish.
#[derive(Default)]
struct RecordingPublisher {
    published: Mutex<Vec<(String, String)>>,
}

impl RecordingPublisher {
    fn documents(&self) -> Vec<String> {
        self.published.lock().iter().map(|(_, doc)| doc.clone()).collect()
    }
}

#[async_trait::async_trait]
impl Publisher for RecordingPublisher {
    async fn publish(&self, product_name: &str, document: &str) -> anyhow::Result<()> {
        self.published.lock().push((product_name.to_string(), document.to_string()));
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

fn process(
    gateway: &Arc<ScriptedGateway>,
    publisher: &Arc<RecordingPublisher>,
) -> DocumentationProcess {
    DocumentationProcess::new("DocumentationNewProduct", gateway.clone(), publisher.clone())
}

/// Script for a run whose proofreader rejects `rejections` times.
fn script(rejections: usize) -> ScriptedGateway {
    let mut gateway = ScriptedGateway::new().reply("Product information").reply("Draft 0");
    for i in 1..=rejections {
        gateway = gateway.reply(REJECT).reply(format!("Draft {i}"));
    }
    gateway.reply(APPROVE)
}

// ============================================================================
// State Sequence Tests
// ============================================================================

mod state_sequence {
    use super::*;
    use WorkflowState::*;

    #[tokio::test]
    async fn test_approved_first_time_single_proofreading_pass() {
        let gateway = Arc::new(script(0));
        let publisher = Arc::new(RecordingPublisher::default());

        let report = process(&gateway, &publisher).run("Lavalamp 2.0").await.unwrap();

        assert_eq!(report.states, vec![Idle, Gathering, Generating, Proofreading, Publishing, Done]);
        assert_eq!(report.revisions, 0);

        let proofreads =
            gateway.calls().iter().filter(|c| c.schema.as_deref() == Some(VERDICT_SCHEMA_NAME)).count();
        assert_eq!(proofreads, 1);
    }

    #[tokio::test]
    async fn test_two_rejections_two_retry_cycles() {
        let gateway = Arc::new(script(2));
        let publisher = Arc::new(RecordingPublisher::default());

        let report = process(&gateway, &publisher).run("Lavalamp 2.0").await.unwrap();

        assert_eq!(
            report.states,
            vec![
                Idle,
                Gathering,
                Generating,
                Proofreading,
                Generating,
                Proofreading,
                Generating,
                Proofreading,
                Publishing,
                Done
            ]
        );
        assert_eq!(report.revisions, 2);
        assert_eq!(report.document, "Draft 2");
        assert_eq!(publisher.documents(), vec!["Draft 2".to_string()]);
        assert_eq!(gateway.remaining(), 0);
    }

    #[tokio::test]
    async fn test_report_identifies_run() {
        let gateway = Arc::new(script(0));
        let publisher = Arc::new(RecordingPublisher::default());

        let report = process(&gateway, &publisher).run("GlowBrew").await.unwrap();

        assert_eq!(report.product_name, "GlowBrew");
        assert_eq!(report.process_name, "DocumentationNewProduct");
        assert_eq!(report.run_id.len(), 36);
        assert!(!report.started_at.is_empty());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["states"][0], "idle");
        assert_eq!(json["states"][5], "done");
    }
}

// ============================================================================
// Generator Conversation Tests
// ============================================================================

mod conversation {
    use super::*;

    #[tokio::test]
    async fn test_conversation_grows_by_two_per_generation() {
        let gateway = Arc::new(script(2));
        let publisher = Arc::new(RecordingPublisher::default());

        process(&gateway, &publisher).run("Lavalamp 2.0").await.unwrap();

        // Generator calls are the unstructured calls after the gather call
        let calls = gateway.calls();
        let generator_calls: Vec<_> =
            calls.iter().skip(1).filter(|c| c.schema.is_none()).collect();
        assert_eq!(generator_calls.len(), 3);

        let lengths: Vec<usize> = generator_calls.iter().map(|c| c.messages.len()).collect();
        assert_eq!(lengths, vec![2, 4, 6]);

        // Never reset: each request starts with the previous one
        for pair in generator_calls.windows(2) {
            assert_eq!(pair[0].messages[..], pair[1].messages[..pair[0].messages.len()]);
        }
        assert_eq!(generator_calls[2].messages[0].role, ChatRole::System);
    }

    #[tokio::test]
    async fn test_feedback_reaches_generator_verbatim() {
        let gateway = Arc::new(script(1));
        let publisher = Arc::new(RecordingPublisher::default());

        process(&gateway, &publisher).run("Lavalamp 2.0").await.unwrap();

        let calls = gateway.calls();
        let rewrite = calls.iter().skip(1).filter(|c| c.schema.is_none()).nth(1).unwrap();
        let feedback = rewrite.messages.last().unwrap();

        assert_eq!(feedback.role, ChatRole::User);
        assert!(feedback.content.contains("Fix typo"));
        assert!(feedback.content.contains("Spelling error"));
    }

    #[tokio::test]
    async fn test_proofreader_sees_latest_draft() {
        let gateway = Arc::new(script(1));
        let publisher = Arc::new(RecordingPublisher::default());

        process(&gateway, &publisher).run("Lavalamp 2.0").await.unwrap();

        let drafts: Vec<String> = gateway
            .calls()
            .iter()
            .filter(|c| c.schema.is_some())
            .map(|c| c.messages[1].content.clone())
            .collect();
        assert_eq!(drafts, vec!["Draft 0".to_string(), "Draft 1".to_string()]);
    }
}

// ============================================================================
// Failure Tests
// ============================================================================

mod failures {
    use super::*;

    #[tokio::test]
    async fn test_malformed_verdict_aborts_without_publishing() {
        let gateway = Arc::new(
            ScriptedGateway::new()
                .reply("Product information")
                .reply("Draft 0")
                .reply(r#"{"meets_expectations": "maybe"}"#),
        );
        let publisher = Arc::new(RecordingPublisher::default());

        let err = process(&gateway, &publisher).run("Lavalamp 2.0").await.unwrap_err();

        assert!(matches!(err, WorkflowError::Parse(_)));
        assert!(publisher.documents().is_empty());
    }

    #[tokio::test]
    async fn test_gateway_failure_during_gathering() {
        let gateway = Arc::new(
            ScriptedGateway::new().fail(GatewayError::Api { status: 401, body: "bad key".into() }),
        );
        let publisher = Arc::new(RecordingPublisher::default());

        let err = process(&gateway, &publisher).run("Lavalamp 2.0").await.unwrap_err();

        assert!(matches!(err, WorkflowError::Gateway(GatewayError::Api { status: 401, .. })));
        assert_eq!(gateway.call_count(), 1);
        assert!(publisher.documents().is_empty());
    }

    #[tokio::test]
    async fn test_gateway_failure_during_rewrite() {
        let gateway = Arc::new(
            ScriptedGateway::new()
                .reply("Product information")
                .reply("Draft 0")
                .reply(REJECT)
                .fail(GatewayError::Transport("connection reset".into())),
        );
        let publisher = Arc::new(RecordingPublisher::default());

        let err = process(&gateway, &publisher).run("Lavalamp 2.0").await.unwrap_err();

        assert_eq!(err.kind(), "gateway");
        assert!(publisher.documents().is_empty());
    }

    #[tokio::test]
    async fn test_timeout_is_distinct_from_parse_failure() {
        let slow = ScriptedGateway::new().reply("Product information").with_delay(Duration::from_millis(200));
        let gateway = Arc::new(TimedGateway::new(slow, Duration::from_millis(20)));
        let publisher = Arc::new(RecordingPublisher::default());

        let err = DocumentationProcess::new("Docs", gateway, publisher.clone())
            .run("Lavalamp 2.0")
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::Gateway(GatewayError::Timeout(_))));
        assert_eq!(err.kind(), "timeout");
        assert!(publisher.documents().is_empty());
    }

    #[tokio::test]
    async fn test_revision_cap_stops_endless_rejections() {
        let gateway = Arc::new(
            ScriptedGateway::new()
                .reply("Product information")
                .reply("Draft 0")
                .reply(REJECT)
                .reply("Draft 1")
                .reply(REJECT)
                .reply("Draft 2")
                .reply(REJECT),
        );
        let publisher = Arc::new(RecordingPublisher::default());

        let err = process(&gateway, &publisher)
            .with_max_revisions(Some(2))
            .run("Lavalamp 2.0")
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::RevisionLimitExceeded(2)));
        assert_eq!(gateway.remaining(), 0);
        assert!(publisher.documents().is_empty());
    }
}

// ============================================================================
// Publishing Tests
// ============================================================================

mod publishing {
    use super::*;

    #[tokio::test]
    async fn test_file_publisher_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = Arc::new(script(0));
        let publisher = Arc::new(FilePublisher::new(dir.path()));

        DocumentationProcess::new("Docs", gateway, publisher).run("Lavalamp 2.0").await.unwrap();

        let written = std::fs::read_to_string(dir.path().join("lavalamp-2-0.md")).unwrap();
        assert_eq!(written, "Draft 0");
    }

    #[tokio::test]
    async fn test_publisher_receives_product_name() {
        let gateway = Arc::new(script(0));
        let publisher = Arc::new(RecordingPublisher::default());

        process(&gateway, &publisher).run("Contoso GlowBrew").await.unwrap();

        let published = publisher.published.lock();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].0, "Contoso GlowBrew");
    }
}
