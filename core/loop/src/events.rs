//! The observer protocol: every event a running [`crate::Agent`] emits
//! while it works, in the order described by the loop's own doc comment.
//!
//! `Agent` never requires a subscriber — `event_tx` on the builder is
//! optional — so a caller that only wants `generate`'s return value pays
//! nothing for events it never asked for.

use forge_message::Message;
use serde::{Deserialize, Serialize};

/// Why an auto-compaction run was triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompactionReason {
    /// Estimated tokens crossed the configured threshold after a turn.
    Threshold,
    /// The model itself reported a context-length error.
    Overflow,
}

/// An incremental change folded into an in-progress assistant message.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageDelta {
    Text(String),
    Thinking(String),
}

/// The outcome of one `auto_compact` attempt, mirrored into an event so a
/// subscriber can show the user what got summarized without reaching into
/// the session log itself.
#[derive(Debug, Clone, PartialEq)]
pub struct CompactionOutcome {
    pub summary: String,
    pub tokens_before: u64,
    pub is_split_turn: bool,
}

/// One step in the lifecycle of a running [`crate::Agent`] call.
///
/// Ordering within a single assistant step: `MessageStart` → zero or more
/// `MessageUpdate`s → `MessageEnd`, with tool events interleaved as tool
/// calls are seen.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentEvent {
    AgentStart,
    AgentEnd { messages: Vec<Message> },
    TurnStart,
    TurnEnd { message: Message, tool_results: Vec<Message> },
    MessageStart { message: Message },
    MessageUpdate { message: Message, delta: MessageDelta },
    MessageEnd { message: Message },
    ToolExecutionStart { tool_call_id: String, tool_name: String, args: serde_json::Value },
    ToolExecutionUpdate { tool_call_id: String, tool_name: String, args: serde_json::Value, partial_result: String },
    ToolExecutionEnd { tool_call_id: String, tool_name: String, result: String, is_error: bool },
    AutoCompactionStart { reason: CompactionReason },
    AutoCompactionEnd { result: Option<CompactionOutcome>, aborted: bool, will_retry: bool, error_message: Option<String> },
}

#[cfg(test)]
#[path = "events.test.rs"]
mod tests;
