//! Type-guard and projection helpers over [`crate::Message`].
//!
//! Consumers that only care about "does this message have text" or "give me
//! the tool calls" should reach for these instead of matching on the enum
//! inline at every call site.

use crate::{AssistantPart, Message, ToolResultPart, UserPart};

pub fn is_user_message(message: &Message) -> bool {
    matches!(message, Message::User(_))
}

pub fn is_assistant_message(message: &Message) -> bool {
    matches!(message, Message::Assistant(_))
}

pub fn is_tool_message(message: &Message) -> bool {
    matches!(message, Message::Tool(_))
}

pub fn has_tool_use(message: &Message) -> bool {
    match message {
        Message::Assistant(a) => a.content.iter().any(|p| matches!(p, AssistantPart::ToolCall { .. })),
        _ => false,
    }
}

pub fn has_tool_result(message: &Message) -> bool {
    matches!(message, Message::Tool(t) if !t.content.is_empty())
}

pub fn has_thinking(message: &Message) -> bool {
    match message {
        Message::Assistant(a) => a.content.iter().any(|p| matches!(p, AssistantPart::Thinking { .. })),
        _ => false,
    }
}

pub fn is_empty_message(message: &Message) -> bool {
    match message {
        Message::User(u) => u.content.is_empty(),
        Message::Assistant(a) => a.content.is_empty(),
        Message::Tool(t) => t.content.is_empty(),
    }
}

/// Concatenates every text-bearing part of a message (user text, assistant
/// text, tool result text). Thinking text is excluded; use
/// [`get_thinking_content`] for that.
pub fn get_text_content(message: &Message) -> String {
    match message {
        Message::User(u) => u
            .content
            .iter()
            .filter_map(|p| match p {
                UserPart::Text { text } => Some(text.as_str()),
                UserPart::Image { .. } => None,
            })
            .collect::<Vec<_>>()
            .join(""),
        Message::Assistant(a) => a
            .content
            .iter()
            .filter_map(|p| match p {
                AssistantPart::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(""),
        Message::Tool(t) => t.content.iter().map(|p| p.text.as_str()).collect::<Vec<_>>().join(""),
    }
}

pub fn get_thinking_content(message: &Message) -> String {
    match message {
        Message::Assistant(a) => a
            .content
            .iter()
            .filter_map(|p| match p {
                AssistantPart::Thinking { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(""),
        _ => String::new(),
    }
}

pub fn get_tool_calls(message: &Message) -> Vec<&AssistantPart> {
    match message {
        Message::Assistant(a) => a.content.iter().filter(|p| matches!(p, AssistantPart::ToolCall { .. })).collect(),
        _ => Vec::new(),
    }
}

pub fn get_tool_results(message: &Message) -> &[ToolResultPart] {
    match message {
        Message::Tool(t) => &t.content,
        _ => &[],
    }
}

pub fn count_tool_uses(message: &Message) -> usize {
    get_tool_calls(message).len()
}

pub fn count_tool_results(message: &Message) -> usize {
    get_tool_results(message).len()
}

#[cfg(test)]
#[path = "type_guards.test.rs"]
mod tests;
