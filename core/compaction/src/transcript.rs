//! Renders a message list into the plain-text transcript the summarization
//! prompt is built from.

use forge_message::{AssistantPart, Message, UserPart};

pub fn render_transcript(messages: &[Message]) -> String {
    let mut out = String::new();
    for message in messages {
        match message {
            Message::User(user) => {
                let text: String = user
                    .content
                    .iter()
                    .filter_map(|p| match p {
                        UserPart::Text { text } => Some(text.as_str()),
                        UserPart::Image { .. } => None,
                    })
                    .collect();
                out.push_str(&format!("[User]: {text}\n"));
            }
            Message::Assistant(assistant) => {
                for part in &assistant.content {
                    match part {
                        AssistantPart::Text { text } => out.push_str(&format!("[Assistant]: {text}\n")),
                        AssistantPart::Thinking { text, .. } => out.push_str(&format!("[Assistant thinking]: {text}\n")),
                        AssistantPart::ToolCall { name, arguments, .. } => {
                            out.push_str(&format!("[Assistant tool calls]: {}({})\n", name, render_args(arguments)));
                        }
                    }
                }
            }
            Message::Tool(tool) => {
                for result in &tool.content {
                    out.push_str(&format!("[Tool result]: {}\n", result.text));
                }
            }
        }
    }
    out
}

fn render_args(arguments: &serde_json::Value) -> String {
    let Some(obj) = arguments.as_object() else { return arguments.to_string() };
    obj.iter()
        .map(|(k, v)| format!("{k}={}", v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string())))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
#[path = "transcript.test.rs"]
mod tests;
