use super::*;
use forge_message::factory::assistant_message;
use forge_message::{AssistantPart, StopReason, Usage};
use pretty_assertions::assert_eq;

#[test]
fn estimate_tokens_is_nonzero_for_empty_message() {
    let msg = Message::user("");
    assert!(estimate_tokens(&msg) >= 4);
}

#[test]
fn estimate_tokens_grows_with_byte_length_not_char_count() {
    let ascii = Message::user("aaaa");
    let multibyte = Message::user("完完完完");
    // Same character count, but multibyte text occupies more bytes and
    // must therefore cost at least as many tokens.
    assert!(estimate_tokens(&multibyte) >= estimate_tokens(&ascii));
}

#[test]
fn estimate_context_tokens_is_monotonic_under_append() {
    let mut messages = vec![Message::user("hello")];
    let before = estimate_context_tokens(&messages);
    messages.push(Message::user("more"));
    let after = estimate_context_tokens(&messages);
    assert!(after >= before);
}

#[test]
fn tool_call_messages_cost_more_than_a_plain_text_message() {
    let text_only = assistant_message(vec![AssistantPart::Text { text: "ok".into() }], None, Usage::default(), StopReason::Stop);
    let with_call = assistant_message(
        vec![
            AssistantPart::Text { text: "ok".into() },
            AssistantPart::ToolCall { id: "1".into(), name: "read".into(), arguments: serde_json::json!({"path": "a.txt"}) },
        ],
        None,
        Usage::default(),
        StopReason::ToolUse,
    );
    assert!(estimate_tokens(&with_call) > estimate_tokens(&text_only));
}

#[test]
fn should_compact_exactness() {
    assert!(should_compact(100_001, 116_384, 16_384, true));
    assert!(!should_compact(100_000, 116_384, 16_384, true));
    assert!(!should_compact(200_000, 116_384, 16_384, false));
}
