//! Converts between [`forge_message::Message`]/[`forge_model::ModelRequest`]
//! and the wire shapes in [`crate::wire`].

use forge_message::{AssistantPart, ImageData, Message, StopReason, ToolResultPart, Usage, UserPart};
use forge_model::ToolDefinition;

use crate::wire::{
    ChatMessageResp, WireFunctionCall, WireFunctionDef, WireMessage, WireTool, WireToolCall, WireUsage,
};

pub fn to_wire_messages(system_prompt: Option<&str>, messages: &[Message]) -> Vec<WireMessage> {
    let mut out = Vec::with_capacity(messages.len() + 1);
    if let Some(system) = system_prompt {
        out.push(WireMessage {
            role: "system".to_string(),
            content: Some(serde_json::Value::String(system.to_string())),
            ..Default::default()
        });
    }
    for message in messages {
        out.extend(to_wire_message(message));
    }
    out
}

fn to_wire_message(message: &Message) -> Vec<WireMessage> {
    match message {
        Message::User(user) => vec![WireMessage {
            role: "user".to_string(),
            content: Some(user_content(&user.content)),
            ..Default::default()
        }],
        Message::Assistant(assistant) => {
            let text: String = assistant
                .content
                .iter()
                .filter_map(|p| match p {
                    AssistantPart::Text { text } => Some(text.as_str()),
                    _ => None,
                })
                .collect();
            let tool_calls: Vec<WireToolCall> = assistant
                .content
                .iter()
                .filter_map(|p| match p {
                    AssistantPart::ToolCall { id, name, arguments } => Some(WireToolCall {
                        id: id.clone(),
                        kind: "function".to_string(),
                        function: WireFunctionCall { name: name.clone(), arguments: arguments.to_string() },
                    }),
                    _ => None,
                })
                .collect();
            vec![WireMessage {
                role: "assistant".to_string(),
                content: if text.is_empty() { None } else { Some(serde_json::Value::String(text)) },
                tool_calls: if tool_calls.is_empty() { None } else { Some(tool_calls) },
                tool_call_id: None,
            }]
        }
        Message::Tool(tool) => tool
            .content
            .iter()
            .map(|part| WireMessage {
                role: "tool".to_string(),
                content: Some(serde_json::Value::String(part.text.clone())),
                tool_calls: None,
                tool_call_id: Some(part.tool_call_id.clone()),
            })
            .collect(),
    }
}

/// A user message with only text parts serializes as a plain string, the
/// shape every OpenAI-compatible provider accepts unconditionally; a
/// message with an image falls back to the multi-part content array only
/// providers with vision support understand.
fn user_content(parts: &[UserPart]) -> serde_json::Value {
    let has_image = parts.iter().any(|p| matches!(p, UserPart::Image { .. }));
    if !has_image {
        let text: String = parts
            .iter()
            .map(|p| match p {
                UserPart::Text { text } => text.as_str(),
                UserPart::Image { .. } => "",
            })
            .collect();
        return serde_json::Value::String(text);
    }

    let blocks: Vec<serde_json::Value> = parts
        .iter()
        .map(|part| match part {
            UserPart::Text { text } => serde_json::json!({"type": "text", "text": text}),
            UserPart::Image { data, mime_type } => serde_json::json!({
                "type": "image_url",
                "image_url": {"url": format!("data:{mime_type};base64,{}", data.base64)},
            }),
        })
        .collect();
    serde_json::Value::Array(blocks)
}

pub fn to_wire_tools(tools: &[ToolDefinition]) -> Vec<WireTool> {
    tools
        .iter()
        .map(|tool| WireTool {
            kind: "function".to_string(),
            function: WireFunctionDef {
                name: tool.name.clone(),
                description: tool.description.clone(),
                parameters: tool.input_schema.clone(),
            },
        })
        .collect()
}

pub fn finish_reason_from_wire(reason: Option<&str>) -> StopReason {
    match reason {
        Some("stop") => StopReason::Stop,
        Some("length") => StopReason::Length,
        Some("tool_calls") | Some("function_call") => StopReason::ToolUse,
        Some("content_filter") => StopReason::Error,
        _ => StopReason::Stop,
    }
}

pub fn usage_from_wire(usage: Option<WireUsage>) -> Usage {
    let Some(usage) = usage else { return Usage::default() };
    Usage {
        input_tokens: usage.prompt_tokens,
        output_tokens: usage.completion_tokens,
        cache_read_tokens: usage.prompt_tokens_details.map(|d| d.cached_tokens).unwrap_or(0),
        cache_write_tokens: 0,
    }
}

/// Parses tool-call arguments, which the wire protocol carries as a raw
/// JSON string. Malformed arguments are kept as a JSON string rather than
/// dropped, so a parse failure surfaces to the tool (and the model) instead
/// of silently vanishing.
pub fn parse_tool_arguments(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()))
}

pub fn assistant_parts_from_response(message: &ChatMessageResp) -> Vec<AssistantPart> {
    let mut parts = Vec::new();
    if let Some(reasoning) = &message.reasoning_content {
        if !reasoning.is_empty() {
            parts.push(AssistantPart::Thinking { text: reasoning.clone(), signature: None });
        }
    }
    if let Some(content) = &message.content {
        if !content.is_empty() {
            parts.push(AssistantPart::Text { text: content.clone() });
        }
    }
    if let Some(tool_calls) = &message.tool_calls {
        for call in tool_calls {
            parts.push(AssistantPart::ToolCall {
                id: call.id.clone(),
                name: call.function.name.clone(),
                arguments: parse_tool_arguments(&call.function.arguments),
            });
        }
    }
    parts
}

pub fn tool_result_to_wire(part: &ToolResultPart) -> WireMessage {
    WireMessage {
        role: "tool".to_string(),
        content: Some(serde_json::Value::String(part.text.clone())),
        tool_calls: None,
        tool_call_id: Some(part.tool_call_id.clone()),
    }
}

#[cfg(test)]
#[path = "convert.test.rs"]
mod tests;
