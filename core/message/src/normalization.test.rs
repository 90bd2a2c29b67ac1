use super::*;
use crate::factory::assistant_message;
use crate::{AssistantPart, StopReason, Usage};

#[test]
fn merge_adjacent_text_parts_joins_consecutive_text() {
    let msg = assistant_message(
        vec![
            AssistantPart::Text { text: "Hel".into() },
            AssistantPart::Text { text: "lo".into() },
            AssistantPart::ToolCall { id: "1".into(), name: "read".into(), arguments: serde_json::json!({}) },
            AssistantPart::Text { text: " world".into() },
        ],
        None,
        Usage::default(),
        StopReason::ToolUse,
    );
    let merged = merge_adjacent_text_parts(msg);
    let Message::Assistant(a) = merged else { panic!() };
    assert_eq!(a.content.len(), 3);
    assert_eq!(a.content[0], AssistantPart::Text { text: "Hello".into() });
}

#[test]
fn merge_adjacent_text_parts_does_not_merge_across_different_thinking_signatures() {
    let msg = assistant_message(
        vec![
            AssistantPart::Thinking { text: "a".into(), signature: Some("s1".into()) },
            AssistantPart::Thinking { text: "b".into(), signature: Some("s2".into()) },
        ],
        None,
        Usage::default(),
        StopReason::Stop,
    );
    let merged = merge_adjacent_text_parts(msg);
    let Message::Assistant(a) = merged else { panic!() };
    assert_eq!(a.content.len(), 2);
}

#[test]
fn normalize_messages_drops_empty_messages() {
    let empty = assistant_message(vec![], None, Usage::default(), StopReason::Stop);
    let keep = Message::user("hi");
    let result = normalize_messages(vec![empty, keep.clone()]);
    assert_eq!(result, vec![keep]);
}
