//! Accumulates `chat.completion.chunk` deltas into [`forge_model::Part`]s.
//!
//! Text and reasoning deltas are forwarded immediately, one
//! [`forge_model::Part::TextDelta`]/`ReasoningDelta` per chunk. Tool-call
//! deltas arrive split across many chunks (an id/name chunk, then a run of
//! argument-fragment chunks, keyed by `index` rather than id) — those are
//! buffered here and only turned into a `Part::ToolCall` once the choice's
//! `finish_reason` closes the step, mirroring how every OpenAI-compatible
//! provider actually frames a tool call.

use std::collections::BTreeMap;

use forge_message::{AssistantPart, StopReason, Usage};
use forge_model::Part;

use crate::convert::{finish_reason_from_wire, parse_tool_arguments, usage_from_wire};
use crate::wire::ChatChunk;

#[derive(Debug, Clone, Default)]
struct PendingToolCall {
    id: String,
    name: String,
    arguments: String,
}

#[derive(Debug, Default)]
pub struct StreamAccumulator {
    text: String,
    thinking: String,
    tool_calls: BTreeMap<usize, PendingToolCall>,
    completed_tool_calls: Vec<PendingToolCall>,
    usage: Usage,
    finished: bool,
    finish_reason: StopReason,
}

impl StreamAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turns one SSE chunk into zero or more parts. A `finish_reason` on
    /// the chunk closes the step: any buffered tool calls are flushed as
    /// `Part::ToolCall`s, followed by `Part::StepFinish` (if usage was
    /// reported) and `Part::Finish`.
    pub fn apply_chunk(&mut self, chunk: ChatChunk) -> Vec<Part> {
        let mut parts = Vec::new();
        if let Some(usage) = chunk.usage {
            self.usage.add(&usage_from_wire(Some(usage)));
        }

        let Some(choice) = chunk.choices.into_iter().next() else {
            return parts;
        };

        if let Some(text) = choice.delta.content {
            if !text.is_empty() {
                self.text.push_str(&text);
                parts.push(Part::TextDelta { text });
            }
        }
        if let Some(reasoning) = choice.delta.reasoning_content {
            if !reasoning.is_empty() {
                self.thinking.push_str(&reasoning);
                parts.push(Part::ReasoningDelta { text: reasoning, signature: None });
            }
        }
        if let Some(tool_calls) = choice.delta.tool_calls {
            for call in tool_calls {
                let entry = self.tool_calls.entry(call.index).or_default();
                if let Some(id) = call.id {
                    if !id.is_empty() {
                        entry.id = id;
                    }
                }
                if let Some(function) = call.function {
                    if let Some(name) = function.name {
                        entry.name.push_str(&name);
                    }
                    if let Some(arguments) = function.arguments {
                        entry.arguments.push_str(&arguments);
                    }
                }
            }
        }

        if let Some(reason) = choice.finish_reason {
            self.finished = true;
            self.finish_reason = finish_reason_from_wire(Some(&reason));
            for (_, call) in std::mem::take(&mut self.tool_calls) {
                parts.push(Part::ToolCall {
                    id: call.id.clone(),
                    name: call.name.clone(),
                    arguments: parse_tool_arguments(&call.arguments),
                });
                self.completed_tool_calls.push(call);
            }
            parts.push(Part::StepFinish { usage: self.usage });
            parts.push(Part::Finish { finish_reason: self.finish_reason });
        }

        parts
    }

    pub fn usage(&self) -> Usage {
        self.usage
    }

    pub fn finish_reason(&self) -> StopReason {
        self.finish_reason
    }

    /// Materializes the full content accumulated over the stream into the
    /// ordered `AssistantPart`s of a final message: thinking, then text,
    /// then tool calls in the order their `finish_reason` flushed them.
    pub fn assistant_parts(&self) -> Vec<AssistantPart> {
        let mut parts = Vec::new();
        if !self.thinking.is_empty() {
            parts.push(AssistantPart::Thinking { text: self.thinking.clone(), signature: None });
        }
        if !self.text.is_empty() {
            parts.push(AssistantPart::Text { text: self.text.clone() });
        }
        for call in &self.completed_tool_calls {
            parts.push(AssistantPart::ToolCall {
                id: call.id.clone(),
                name: call.name.clone(),
                arguments: parse_tool_arguments(&call.arguments),
            });
        }
        parts
    }

    /// Whether a `finish_reason` has been observed. A stream that ends
    /// without one (connection dropped mid-response) never calls
    /// [`Self::apply_chunk`] with a terminal chunk, so the caller treats
    /// that as an error rather than a normal stop.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Synthesizes a terminal `Finish` part for a stream that ended
    /// without ever reporting `finish_reason` — e.g. the connection closed
    /// after the last content delta.
    pub fn finish_abnormally(&mut self, reason: StopReason) -> Vec<Part> {
        self.finished = true;
        self.finish_reason = reason;
        let mut parts = Vec::new();
        for (_, call) in std::mem::take(&mut self.tool_calls) {
            parts.push(Part::ToolCall {
                id: call.id.clone(),
                name: call.name.clone(),
                arguments: parse_tool_arguments(&call.arguments),
            });
            self.completed_tool_calls.push(call);
        }
        parts.push(Part::StepFinish { usage: self.usage });
        parts.push(Part::Finish { finish_reason: reason });
        parts
    }
}

#[cfg(test)]
#[path = "stream.test.rs"]
mod tests;
