use super::*;
use forge_message::Message;
use futures::StreamExt;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request() -> ModelRequest {
    ModelRequest { messages: vec![Message::user("hello")], ..Default::default() }
}

fn model(base_url: &str) -> HttpModel {
    HttpModel::new(HttpModelConfig::new(base_url, "gpt-test").with_api_key("test-key"))
}

#[tokio::test]
async fn generate_parses_a_non_streaming_response() {
    let server = MockServer::start().await;
    let body = serde_json::json!({
        "choices": [{
            "message": {"content": "hi there", "tool_calls": null},
            "finish_reason": "stop",
        }],
        "usage": {"prompt_tokens": 12, "completion_tokens": 3},
    });

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let result = model(&server.uri()).generate(request()).await.unwrap();

    assert_eq!(result.finish_reason, StopReason::Stop);
    assert_eq!(result.usage.input_tokens, 12);
    assert_eq!(result.usage.output_tokens, 3);
    let Message::Assistant(assistant) = &result.messages[0] else { panic!("expected assistant message") };
    assert_eq!(assistant.content, vec![forge_message::AssistantPart::Text { text: "hi there".to_string() }]);
}

#[tokio::test]
async fn generate_retries_on_a_server_error_then_succeeds() {
    let server = MockServer::start().await;
    let ok_body = serde_json::json!({
        "choices": [{"message": {"content": "recovered"}, "finish_reason": "stop"}],
        "usage": {"prompt_tokens": 1, "completion_tokens": 1},
    });

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&ok_body))
        .mount(&server)
        .await;

    let mut config = HttpModelConfig::new(server.uri(), "gpt-test");
    config.base_delay = std::time::Duration::from_millis(1);
    let http_model = HttpModel::new(config);

    let result = http_model.generate(request()).await.unwrap();
    let Message::Assistant(assistant) = &result.messages[0] else { panic!("expected assistant message") };
    assert_eq!(assistant.content, vec![forge_message::AssistantPart::Text { text: "recovered".to_string() }]);
}

#[tokio::test]
async fn generate_surfaces_a_non_retryable_client_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
        .mount(&server)
        .await;

    let err = model(&server.uri()).generate(request()).await.unwrap_err();
    assert!(matches!(err, ModelError::Transport(_)));
}

#[tokio::test]
async fn stream_accumulates_sse_chunks_into_a_final_message() {
    let server = MockServer::start().await;
    let sse_body = concat!(
        "data: {\"choices\":[{\"delta\":{\"content\":\"hel\"},\"finish_reason\":null}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"lo\"},\"finish_reason\":null}]}\n\n",
        "data: {\"choices\":[{\"delta\":{},\"finish_reason\":\"stop\"}],\"usage\":{\"prompt_tokens\":5,\"completion_tokens\":2}}\n\n",
        "data: [DONE]\n\n",
    );

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(sse_body),
        )
        .mount(&server)
        .await;

    let handle = model(&server.uri()).stream(request()).await.unwrap();
    let parts: Vec<Part> = handle.full_stream.collect().await;
    assert!(parts.iter().any(|p| matches!(p, Part::TextDelta { text } if text == "hel")));
    assert!(parts.iter().any(|p| matches!(p, Part::Finish { finish_reason: StopReason::Stop })));

    let result = handle.response.await.unwrap();
    assert_eq!(result.finish_reason, StopReason::Stop);
    assert_eq!(result.usage.input_tokens, 5);
    let Message::Assistant(assistant) = &result.messages[0] else { panic!("expected assistant message") };
    assert_eq!(assistant.content, vec![forge_message::AssistantPart::Text { text: "hello".to_string() }]);
}
