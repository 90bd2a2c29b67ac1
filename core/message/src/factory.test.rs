use super::*;
use crate::{AssistantPart, StopReason, ToolResultPart, Usage};

#[test]
fn assistant_error_carries_error_text_and_stop_reason() {
    let msg = assistant_error("boom");
    let Message::Assistant(a) = msg else { panic!("expected assistant message") };
    assert_eq!(a.error.as_deref(), Some("boom"));
    assert_eq!(a.stop_reason, StopReason::Error);
}

#[test]
fn tool_results_message_wraps_all_results_together() {
    let msg = tool_results_message(vec![
        ToolResultPart::ok("1", "read", "a"),
        ToolResultPart::error("2", "bash", "failed"),
    ]);
    let Message::Tool(t) = msg else { panic!("expected tool message") };
    assert_eq!(t.content.len(), 2);
    assert!(t.content[1].is_error);
}

#[test]
fn synthetic_summary_message_embeds_tokens_before() {
    let msg = synthetic_summary_message("compaction", "did stuff", Some(12345));
    assert_eq!(crate::type_guards::get_text_content(&msg), "<summary type=\"compaction\" tokens_before=\"12345\">did stuff</summary>");
}

#[test]
fn assistant_message_preserves_part_order() {
    let msg = assistant_message(
        vec![AssistantPart::Text { text: "a".into() }, AssistantPart::ToolCall { id: "1".into(), name: "read".into(), arguments: serde_json::json!({}) }],
        None,
        Usage::default(),
        StopReason::ToolUse,
    );
    let Message::Assistant(a) = msg else { panic!() };
    assert_eq!(a.content.len(), 2);
}
