use super::*;
use crate::factory::{assistant_message, tool_results_message};
use crate::{AssistantPart, StopReason, Usage};

fn tool_call_message() -> Message {
    assistant_message(
        vec![AssistantPart::ToolCall { id: "1".into(), name: "read".into(), arguments: serde_json::json!({}) }],
        None,
        Usage::default(),
        StopReason::ToolUse,
    )
}

#[test]
fn guards_distinguish_roles() {
    let user = Message::user("hi");
    assert!(is_user_message(&user));
    assert!(!is_assistant_message(&user));
    assert!(!is_tool_message(&user));
}

#[test]
fn has_tool_use_detects_tool_call_parts() {
    let msg = tool_call_message();
    assert!(has_tool_use(&msg));
    assert_eq!(count_tool_uses(&msg), 1);
}

#[test]
fn has_tool_result_detects_non_empty_tool_message() {
    let msg = tool_results_message(vec![crate::ToolResultPart::ok("1", "read", "hi")]);
    assert!(has_tool_result(&msg));
    assert_eq!(count_tool_results(&msg), 1);
}

#[test]
fn get_text_content_concatenates_text_parts_only() {
    let msg = assistant_message(
        vec![
            AssistantPart::Text { text: "a".into() },
            AssistantPart::Thinking { text: "ignored".into(), signature: None },
            AssistantPart::Text { text: "b".into() },
        ],
        None,
        Usage::default(),
        StopReason::Stop,
    );
    assert_eq!(get_text_content(&msg), "ab");
    assert_eq!(get_thinking_content(&msg), "ignored");
}

#[test]
fn is_empty_message_true_for_no_parts() {
    let msg = assistant_message(vec![], None, Usage::default(), StopReason::Stop);
    assert!(is_empty_message(&msg));
}
