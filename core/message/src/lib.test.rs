use super::*;
use pretty_assertions::assert_eq;

#[test]
fn user_text_roundtrips_through_json() {
    let msg = Message::user("hello");
    let json = serde_json::to_string(&msg).unwrap();
    let back: Message = serde_json::from_str(&json).unwrap();
    assert_eq!(msg, back);
}

#[test]
fn assistant_message_defaults_to_stop() {
    let msg = AssistantMessage::empty();
    assert_eq!(msg.stop_reason, StopReason::Stop);
    assert_eq!(msg.usage, Usage::default());
}

#[test]
fn usage_add_accumulates_all_fields() {
    let mut total = Usage::default();
    total.add(&Usage { input_tokens: 10, output_tokens: 5, cache_read_tokens: 1, cache_write_tokens: 2 });
    total.add(&Usage { input_tokens: 3, output_tokens: 1, cache_read_tokens: 0, cache_write_tokens: 0 });
    assert_eq!(total.input_tokens, 13);
    assert_eq!(total.output_tokens, 6);
    assert_eq!(total.cache_read_tokens, 1);
    assert_eq!(total.cache_write_tokens, 2);
}

#[test]
fn tool_message_serializes_with_tagged_role() {
    let msg = Message::Tool(ToolMessage { content: vec![ToolResultPart::ok("call-1", "read", "hi")] });
    let json = serde_json::to_value(&msg).unwrap();
    assert_eq!(json["role"], "tool");
}
