use super::*;
use forge_message::factory::{assistant_message, tool_results_message};
use forge_message::{AssistantPart, StopReason, ToolResultPart, Usage};
use pretty_assertions::assert_eq;

#[test]
fn renders_user_assistant_and_tool_messages_with_role_headers() {
    let messages = vec![
        Message::user("hello there"),
        assistant_message(
            vec![
                AssistantPart::Thinking { text: "let me check".into(), signature: None },
                AssistantPart::Text { text: "on it".into() },
                AssistantPart::ToolCall { id: "1".into(), name: "read".into(), arguments: serde_json::json!({"path": "a.rs"}) },
            ],
            None,
            Usage::default(),
            StopReason::ToolUse,
        ),
        tool_results_message(vec![ToolResultPart::ok("1", "read", "fn main() {}")]),
    ];

    let rendered = render_transcript(&messages);

    assert_eq!(
        rendered,
        "[User]: hello there\n\
         [Assistant thinking]: let me check\n\
         [Assistant]: on it\n\
         [Assistant tool calls]: read(path=a.rs)\n\
         [Tool result]: fn main() {}\n"
    );
}

#[test]
fn renders_empty_transcript_as_empty_string() {
    assert_eq!(render_transcript(&[]), "");
}
