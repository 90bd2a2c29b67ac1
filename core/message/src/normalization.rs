//! Sequence-level cleanup applied to a list of messages before it is handed
//! to a model or rendered for compaction.
//!
//! Streamed assistant output can arrive as many small text/thinking deltas;
//! nothing downstream wants to look at twenty one-word `AssistantPart::Text`
//! entries when one would do.

use crate::{AssistantPart, Message};

/// Merges adjacent `Text` parts (and adjacent `Thinking` parts sharing the
/// same signature) within a single assistant message. Tool calls are never
/// merged and never reordered.
pub fn merge_adjacent_text_parts(message: Message) -> Message {
    let Message::Assistant(mut assistant) = message else {
        return message;
    };
    let mut merged: Vec<AssistantPart> = Vec::with_capacity(assistant.content.len());
    for part in assistant.content.drain(..) {
        match (merged.last_mut(), &part) {
            (Some(AssistantPart::Text { text: prev }), AssistantPart::Text { text: next }) => {
                prev.push_str(next);
            }
            (
                Some(AssistantPart::Thinking { text: prev, signature: prev_sig }),
                AssistantPart::Thinking { text: next, signature: next_sig },
            ) if prev_sig == next_sig => {
                prev.push_str(next);
            }
            _ => merged.push(part),
        }
    }
    assistant.content = merged;
    Message::Assistant(assistant)
}

/// Drops messages with no content at all (an assistant step that produced
/// neither text nor a tool call, or a tool message with zero results).
/// Returns `true` when the message should be kept.
pub fn is_non_empty(message: &Message) -> bool {
    !crate::type_guards::is_empty_message(message)
}

pub fn normalize_messages(messages: Vec<Message>) -> Vec<Message> {
    messages
        .into_iter()
        .map(merge_adjacent_text_parts)
        .filter(is_non_empty)
        .collect()
}

#[cfg(test)]
#[path = "normalization.test.rs"]
mod tests;
