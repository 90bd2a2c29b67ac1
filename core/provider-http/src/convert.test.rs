use super::*;
use forge_message::{AssistantPart, ImageData, ToolMessage, ToolResultPart, UserMessage};
use pretty_assertions::assert_eq;

#[test]
fn user_message_with_only_text_serializes_as_a_plain_string() {
    let message = Message::User(UserMessage::text("hello there"));
    let wire = to_wire_message(&message);

    assert_eq!(wire.len(), 1);
    assert_eq!(wire[0].role, "user");
    assert_eq!(wire[0].content, Some(serde_json::Value::String("hello there".to_string())));
}

#[test]
fn user_message_with_an_image_falls_back_to_content_blocks() {
    let message = Message::User(UserMessage {
        content: vec![
            UserPart::Text { text: "what is this".to_string() },
            UserPart::Image { data: ImageData { base64: "Zm9v".to_string() }, mime_type: "image/png".to_string() },
        ],
    });
    let wire = to_wire_message(&message);

    let blocks = wire[0].content.clone().unwrap();
    let array = blocks.as_array().unwrap();
    assert_eq!(array.len(), 2);
    assert_eq!(array[0]["type"], "text");
    assert_eq!(array[1]["type"], "image_url");
    assert!(array[1]["image_url"]["url"].as_str().unwrap().starts_with("data:image/png;base64,"));
}

#[test]
fn assistant_message_splits_text_and_tool_calls() {
    let message = Message::Assistant(forge_message::AssistantMessage {
        content: vec![
            AssistantPart::Text { text: "checking".to_string() },
            AssistantPart::ToolCall {
                id: "call_1".to_string(),
                name: "read".to_string(),
                arguments: serde_json::json!({"path": "a.rs"}),
            },
        ],
        attribution: None,
        usage: Usage::default(),
        stop_reason: StopReason::ToolUse,
        timestamp: chrono::Utc::now(),
        error: None,
    });
    let wire = to_wire_message(&message);

    assert_eq!(wire.len(), 1);
    assert_eq!(wire[0].content, Some(serde_json::Value::String("checking".to_string())));
    let calls = wire[0].tool_calls.as_ref().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].id, "call_1");
    assert_eq!(calls[0].function.name, "read");
}

#[test]
fn tool_message_expands_to_one_wire_message_per_result() {
    let message = Message::Tool(ToolMessage {
        content: vec![
            ToolResultPart::ok("call_1", "read", "file contents"),
            ToolResultPart::error("call_2", "bash", "exit 1"),
        ],
    });
    let wire = to_wire_message(&message);

    assert_eq!(wire.len(), 2);
    assert_eq!(wire[0].tool_call_id, Some("call_1".to_string()));
    assert_eq!(wire[1].tool_call_id, Some("call_2".to_string()));
}

#[test]
fn to_wire_messages_prepends_the_system_prompt() {
    let wire = to_wire_messages(Some("be helpful"), &[Message::user("hi")]);

    assert_eq!(wire.len(), 2);
    assert_eq!(wire[0].role, "system");
    assert_eq!(wire[1].role, "user");
}

#[test]
fn finish_reason_mapping_covers_every_wire_value() {
    assert_eq!(finish_reason_from_wire(Some("stop")), StopReason::Stop);
    assert_eq!(finish_reason_from_wire(Some("length")), StopReason::Length);
    assert_eq!(finish_reason_from_wire(Some("tool_calls")), StopReason::ToolUse);
    assert_eq!(finish_reason_from_wire(Some("function_call")), StopReason::ToolUse);
    assert_eq!(finish_reason_from_wire(Some("content_filter")), StopReason::Error);
    assert_eq!(finish_reason_from_wire(None), StopReason::Stop);
}

#[test]
fn usage_from_wire_reads_cached_tokens_from_the_nested_details() {
    let wire = crate::wire::WireUsage {
        prompt_tokens: 100,
        completion_tokens: 40,
        prompt_tokens_details: Some(crate::wire::PromptTokensDetails { cached_tokens: 30 }),
    };

    let usage = usage_from_wire(Some(wire));

    assert_eq!(usage.input_tokens, 100);
    assert_eq!(usage.output_tokens, 40);
    assert_eq!(usage.cache_read_tokens, 30);
}

#[test]
fn malformed_tool_arguments_are_kept_as_a_json_string_rather_than_dropped() {
    let parsed = parse_tool_arguments("not json");
    assert_eq!(parsed, serde_json::Value::String("not json".to_string()));
}

#[test]
fn well_formed_tool_arguments_parse_into_structured_json() {
    let parsed = parse_tool_arguments(r#"{"path": "a.rs"}"#);
    assert_eq!(parsed, serde_json::json!({"path": "a.rs"}));
}
