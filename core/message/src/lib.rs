//! The conversation [`Message`] model shared by the session log, the agent
//! loop, and the tool substrate.
//!
//! A `Message` is a tagged sum over the three roles a model conversation
//! ever needs: something the user said, something the assistant produced,
//! and the result of a tool the assistant asked for. Each role carries an
//! ordered list of typed parts rather than a single string, so that
//! interleaved text/thinking/tool-call content round-trips losslessly
//! through the session log.

pub mod factory;
pub mod normalization;
pub mod type_guards;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry in a conversation: a user turn, an assistant turn, or the
/// result of tools the assistant invoked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Message {
    User(UserMessage),
    Assistant(AssistantMessage),
    Tool(ToolMessage),
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Message::User(UserMessage::text(text))
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Message::User(_))
    }

    pub fn is_assistant(&self) -> bool {
        matches!(self, Message::Assistant(_))
    }

    pub fn is_tool(&self) -> bool {
        matches!(self, Message::Tool(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserMessage {
    pub content: Vec<UserPart>,
}

impl UserMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self { content: vec![UserPart::Text { text: text.into() }] }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UserPart {
    Text { text: String },
    Image { data: ImageData, mime_type: String },
}

/// Image bytes, stored base64-encoded so the part round-trips through JSON
/// without a custom `serde` visitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageData {
    pub base64: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantMessage {
    pub content: Vec<AssistantPart>,
    pub attribution: Option<Attribution>,
    pub usage: Usage,
    pub stop_reason: StopReason,
    pub timestamp: DateTime<Utc>,
    pub error: Option<String>,
}

impl AssistantMessage {
    pub fn empty() -> Self {
        Self {
            content: Vec::new(),
            attribution: None,
            usage: Usage::default(),
            stop_reason: StopReason::Stop,
            timestamp: Utc::now(),
            error: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssistantPart {
    Text { text: String },
    Thinking { text: String, signature: Option<String> },
    ToolCall { id: String, name: String, arguments: serde_json::Value },
}

/// Which provider, model and API produced an assistant message, plus enough
/// to derive a dollar cost from token counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribution {
    pub provider: String,
    pub model_id: String,
    pub api: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cache_read_tokens: u64,
    pub cache_write_tokens: u64,
}

impl Usage {
    pub fn add(&mut self, other: &Usage) {
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
        self.cache_read_tokens += other.cache_read_tokens;
        self.cache_write_tokens += other.cache_write_tokens;
    }

    /// Derives an approximate dollar cost from per-million-token prices.
    /// Pricing is an external concern (it varies by provider and changes
    /// over time); callers supply it rather than the crate hardcoding it.
    pub fn calculate_cost(&self, input_per_million: f64, output_per_million: f64) -> f64 {
        (self.input_tokens as f64 / 1_000_000.0) * input_per_million
            + (self.output_tokens as f64 / 1_000_000.0) * output_per_million
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    #[default]
    Stop,
    Length,
    ToolUse,
    Error,
    Aborted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolMessage {
    pub content: Vec<ToolResultPart>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResultPart {
    pub tool_call_id: String,
    pub tool_name: String,
    pub text: String,
    pub image: Option<ImageData>,
    pub is_error: bool,
}

impl ToolResultPart {
    pub fn ok(tool_call_id: impl Into<String>, tool_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            tool_name: tool_name.into(),
            text: text.into(),
            image: None,
            is_error: false,
        }
    }

    pub fn error(tool_call_id: impl Into<String>, tool_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            tool_name: tool_name.into(),
            text: text.into(),
            image: None,
            is_error: true,
        }
    }
}

#[cfg(test)]
#[path = "lib.test.rs"]
mod tests;
