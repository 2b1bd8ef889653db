use pretty_assertions::assert_eq;
use rackstock_gateway::{
    AiGateway, AnalysisOutcome, ChatReply, GatewayError, ImageInput, NO_ANSWER_TEXT,
    UNAVAILABLE_TEXT, mock_analysis,
};
use rackstock_model::{Analysis, AnalysisMode, LabelExtraction};
use rackstock_test_utils::{FailingBackend, FixedBackend, RecordingBackend};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

fn image() -> ImageInput {
    ImageInput::new(vec![0xff, 0xd8, 0xff], "image/jpeg")
}

#[tokio::test(start_paused = true)]
async fn unconfigured_label_analysis_returns_mock_after_delay() {
    let gateway = AiGateway::new(None, Duration::from_millis(1500));
    let started = Instant::now();
    let outcome = gateway.analyze(&image(), AnalysisMode::Label).await;

    assert!(started.elapsed() >= Duration::from_millis(1500));
    assert!(outcome.is_fallback());
    let Analysis::Label(label) = outcome.analysis() else {
        panic!("expected label analysis");
    };
    assert_eq!(label.sn, "CN-0V4W68-74445-83C-335");
    assert_eq!(label.model, "M393A4K40CB2-CTD");
    assert_eq!(label.all_text.len(), 11);
}

#[tokio::test(start_paused = true)]
async fn failing_backend_falls_back_with_reason() {
    let gateway = AiGateway::new(
        Some(Arc::new(FailingBackend::new("overloaded"))),
        Duration::from_millis(10),
    );
    let outcome = gateway.analyze(&image(), AnalysisMode::General).await;
    match outcome {
        AnalysisOutcome::Fallback { analysis, reason } => {
            assert_eq!(analysis, mock_analysis(AnalysisMode::General));
            assert!(reason.contains("503"), "{reason}");
        }
        other => panic!("expected fallback, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn malformed_json_falls_back() {
    let gateway = AiGateway::new(
        Some(Arc::new(FixedBackend::new("not json"))),
        Duration::ZERO,
    );
    let err = gateway
        .try_analyze(&image(), AnalysisMode::Label)
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Malformed(_)));
    assert!(gateway.analyze(&image(), AnalysisMode::Label).await.is_fallback());
}

#[tokio::test]
async fn empty_text_is_an_error_for_analysis() {
    let gateway = AiGateway::new(Some(Arc::new(FixedBackend::new("  "))), Duration::ZERO);
    let err = gateway
        .try_analyze(&image(), AnalysisMode::General)
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::EmptyResponse));
}

#[tokio::test]
async fn live_label_analysis_decodes_payload_and_sends_schema() {
    let (backend, seen) = RecordingBackend::new(
        r#"{"sn":"SN-1","model":"M-1","manufacturer":"Dell","all_text":["SN-1","M-1"]}"#,
    );
    let gateway = AiGateway::new(Some(Arc::new(backend)), Duration::ZERO);
    let outcome = gateway.analyze(&image(), AnalysisMode::Label).await;

    assert_eq!(
        outcome,
        AnalysisOutcome::Live(Analysis::Label(LabelExtraction {
            sn: "SN-1".to_string(),
            model: "M-1".to_string(),
            manufacturer: "Dell".to_string(),
            all_text: vec!["SN-1".to_string(), "M-1".to_string()],
        }))
    );
    let requests = seen.lock();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].image, Some(image()));
    let schema = requests[0].response_schema.as_ref().expect("schema");
    assert_eq!(schema["properties"]["sn"]["type"], "STRING");
}

#[tokio::test(start_paused = true)]
async fn label_reply_with_null_field_stays_live() {
    let gateway = AiGateway::new(
        Some(Arc::new(FixedBackend::new(
            r#"{"sn":"SN-REAL-1","model":"M-REAL","manufacturer":null,"all_text":["SN-REAL-1"]}"#,
        ))),
        Duration::from_millis(1500),
    );
    let outcome = gateway.analyze(&image(), AnalysisMode::Label).await;

    assert_eq!(
        outcome,
        AnalysisOutcome::Live(Analysis::Label(LabelExtraction {
            sn: "SN-REAL-1".to_string(),
            model: "M-REAL".to_string(),
            manufacturer: String::new(),
            all_text: vec!["SN-REAL-1".to_string()],
        }))
    );
}

#[tokio::test]
async fn chat_sends_context_as_system_instruction() {
    let (backend, seen) = RecordingBackend::new("共有 4 个 CPU。");
    let gateway = AiGateway::new(Some(Arc::new(backend)), Duration::ZERO);
    let reply = gateway
        .ask("有多少 CPU?", "Intel Xeon (SN:CPU-XG-001, Model:6248R): 4个, 位置 A-01")
        .await;

    assert_eq!(reply, ChatReply::Answer("共有 4 个 CPU。".to_string()));
    let requests = seen.lock();
    assert_eq!(requests[0].text, "有多少 CPU?");
    assert!(requests[0].image.is_none());
    let instruction = requests[0].system_instruction.as_deref().unwrap_or_default();
    assert!(instruction.contains("SN:CPU-XG-001"));
}

#[tokio::test]
async fn chat_empty_answer_uses_fixed_text() {
    let gateway = AiGateway::new(Some(Arc::new(FixedBackend::new(""))), Duration::ZERO);
    let reply = gateway.ask("hello", "").await;
    assert_eq!(reply.text(), NO_ANSWER_TEXT);
}

#[tokio::test]
async fn chat_failure_uses_apology() {
    let gateway = AiGateway::new(
        Some(Arc::new(FailingBackend::new("down").with_status(500))),
        Duration::ZERO,
    );
    let reply = gateway.ask("hello", "").await;
    assert!(matches!(reply, ChatReply::Unavailable { .. }));
    assert_eq!(reply.text(), UNAVAILABLE_TEXT);
}
