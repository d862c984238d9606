//! Integration tests for the dialogue controller against a mocked
//! Chat Completions endpoint
//!
//! These tests verify:
//! 1. Live questions and reports flow through with the right token budgets
//! 2. Upstream errors, bad shapes, and empty completions fall back silently

use std::sync::Arc;

use reflect_core::config::GenerationConfig;
use reflect_core::fallback;
use reflect_core::generation::{ChatCompletionClient, TextGenerator};
use reflect_core::{ChatMessage, Program};
use reflect_server::subsystems::dialogue::{DialogueController, DialogueStep, GenerationSource};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-test",
        "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
    })
}

fn create_controller(mock_server: &MockServer) -> DialogueController {
    let config = GenerationConfig {
        model: "test-model".to_string(),
        timeout_seconds: 5,
        ..Default::default()
    };
    let client =
        ChatCompletionClient::with_base_url(&config, "test-api-key".to_string(), mock_server.uri())
            .expect("Failed to create test client");
    let generator: Arc<dyn TextGenerator> = Arc::new(client);
    DialogueController::new(Some(generator), &config)
}

fn early_transcript() -> Vec<ChatMessage> {
    vec![
        ChatMessage::assistant("What did you pay attention to?"),
        ChatMessage::user("Mostly how people would feel"),
    ]
}

#[tokio::test]
async fn test_live_question_roundtrip() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-api-key"))
        .and(body_partial_json(serde_json::json!({
            "model": "test-model",
            "max_tokens": 300,
            "stream": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            "How do you balance their feelings with the decision itself?",
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let controller = create_controller(&mock_server);
    assert!(controller.is_live());

    let out = controller.advance(&early_transcript()).await.unwrap();
    assert_eq!(out.source, GenerationSource::Live);
    assert_eq!(
        out.step,
        DialogueStep::Continue {
            question: "How do you balance their feelings with the decision itself?".to_string()
        }
    );
}

#[tokio::test]
async fn test_live_report_roundtrip() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(serde_json::json!({ "max_tokens": 2000 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            "# Report\n\n## 5. Program Recommendation\nLeadership in Residence fits your experience.",
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let controller = create_controller(&mock_server);
    let mut transcript = early_transcript();
    transcript.push(ChatMessage::user("Could I see a summary?"));

    let out = controller.advance(&transcript).await.unwrap();
    assert_eq!(out.source, GenerationSource::Live);
    match out.step {
        DialogueStep::Complete { report, program } => {
            assert!(report.starts_with("# Report"));
            assert_eq!(program, Program::Lir);
        }
        other => panic!("Expected completion, got {:?}", other),
    }
}

#[tokio::test]
async fn test_upstream_500_falls_back_to_question() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let controller = create_controller(&mock_server);
    let out = controller.advance(&early_transcript()).await.unwrap();
    assert_eq!(out.source, GenerationSource::Fallback);
    assert_eq!(
        out.step,
        DialogueStep::Continue {
            question: fallback::question(1).to_string()
        }
    );
}

#[tokio::test]
async fn test_malformed_shape_falls_back_to_report() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"result": "ok"})))
        .mount(&mock_server)
        .await;

    let controller = create_controller(&mock_server);
    let mut transcript = early_transcript();
    transcript.push(ChatMessage::user("Which program would you recommend?"));

    let out = controller.advance(&transcript).await.unwrap();
    assert_eq!(out.source, GenerationSource::Fallback);
    let expected = fallback::report(&transcript);
    assert_eq!(
        out.step,
        DialogueStep::Complete {
            report: expected.content,
            program: Program::Npl,
        }
    );
}

#[tokio::test]
async fn test_empty_completion_falls_back() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("")))
        .mount(&mock_server)
        .await;

    let controller = create_controller(&mock_server);
    let out = controller.advance(&early_transcript()).await.unwrap();
    assert_eq!(out.source, GenerationSource::Fallback);
    assert!(!out.is_complete());
}

#[tokio::test]
async fn test_connection_refused_falls_back() {
    // Bind then drop a listener so the port is known to be closed
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let config = GenerationConfig {
        timeout_seconds: 2,
        ..Default::default()
    };
    let client = ChatCompletionClient::with_base_url(
        &config,
        "test-api-key".to_string(),
        format!("http://127.0.0.1:{}", port),
    )
    .expect("Failed to create test client");
    let generator: Arc<dyn TextGenerator> = Arc::new(client);
    let controller = DialogueController::new(Some(generator), &config);

    let out = controller.advance(&early_transcript()).await.unwrap();
    assert_eq!(out.source, GenerationSource::Fallback);
    assert_eq!(
        out.step,
        DialogueStep::Continue {
            question: fallback::question(1).to_string()
        }
    );
}

