//! Convenience constructors for assembling messages out of streamed parts.
//!
//! The agent loop accumulates an assistant message piece by piece as parts
//! arrive off the model stream; these helpers keep that accumulation logic
//! in one place instead of scattering `Vec::push` calls through the loop.

use chrono::Utc;

use crate::{AssistantMessage, AssistantPart, Attribution, Message, StopReason, ToolMessage, ToolResultPart, Usage};

/// Builds an [`AssistantMessage`] from already-finished parts, useful in
/// tests and for non-streaming `generate` calls.
pub fn assistant_message(
    content: Vec<AssistantPart>,
    attribution: Option<Attribution>,
    usage: Usage,
    stop_reason: StopReason,
) -> Message {
    Message::Assistant(AssistantMessage {
        content,
        attribution,
        usage,
        stop_reason,
        timestamp: Utc::now(),
        error: None,
    })
}

pub fn assistant_error(text: impl Into<String>) -> Message {
    Message::Assistant(AssistantMessage {
        content: Vec::new(),
        attribution: None,
        usage: Usage::default(),
        stop_reason: StopReason::Error,
        timestamp: Utc::now(),
        error: Some(text.into()),
    })
}

/// Collects one or more tool results produced within a single model step
/// into the single [`ToolMessage`] the provider contract expects.
pub fn tool_results_message(results: Vec<ToolResultPart>) -> Message {
    Message::Tool(ToolMessage { content: results })
}

/// Wraps a synthetic summary (from compaction or a branch summary) as a
/// user message, per the session replay contract.
pub fn synthetic_summary_message(kind: &str, summary: &str, tokens_before: Option<u64>) -> Message {
    let text = match tokens_before {
        Some(tokens) => format!(
            "<summary type=\"{kind}\" tokens_before=\"{tokens}\">{summary}</summary>"
        ),
        None => format!("<summary type=\"{kind}\">{summary}</summary>"),
    };
    Message::user(text)
}

#[cfg(test)]
#[path = "factory.test.rs"]
mod tests;
