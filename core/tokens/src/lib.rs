//! A conservative, deterministic token-count heuristic.
//!
//! This is not a real tokenizer: it never loads a model-specific vocabulary
//! and never makes a network call. It trades precision for two properties
//! that matter more to the agent loop than exactness — it is cheap to call
//! on every message, and it never *under*-counts by enough to blow a real
//! context window. Byte length (not character count) is the basis for the
//! estimate, which keeps counts well-behaved on multibyte UTF-8 text;
//! a char-length ratio systematically undercounts non-ASCII content.

use forge_message::type_guards::{get_text_content, get_thinking_content};
use forge_message::{AssistantPart, Message};

/// Bytes assumed to correspond to one token.
const BYTES_PER_TOKEN: usize = 4;

/// Fixed overhead charged to every message, approximating the role/wrapper
/// framing a provider adds around the content.
const MESSAGE_OVERHEAD_TOKENS: u64 = 4;

/// Additional overhead charged per tool-call or tool-result part, for the
/// structural framing (ids, names, argument braces) a plain byte count of
/// the text misses.
const TOOL_OVERHEAD_TOKENS: u64 = 4;

fn bytes_to_tokens(len: usize) -> u64 {
    len.div_ceil(BYTES_PER_TOKEN) as u64
}

/// Estimates the token cost of a single message.
pub fn estimate_tokens(message: &Message) -> u64 {
    let mut tokens = MESSAGE_OVERHEAD_TOKENS;
    tokens += bytes_to_tokens(get_text_content(message).len());
    tokens += bytes_to_tokens(get_thinking_content(message).len());

    match message {
        Message::Assistant(assistant) => {
            for part in &assistant.content {
                if let AssistantPart::ToolCall { arguments, .. } = part {
                    tokens += TOOL_OVERHEAD_TOKENS;
                    tokens += bytes_to_tokens(arguments.to_string().len());
                }
            }
        }
        Message::Tool(tool) => {
            tokens += TOOL_OVERHEAD_TOKENS * tool.content.len().max(1) as u64;
        }
        Message::User(_) => {}
    }
    tokens
}

/// Sums [`estimate_tokens`] across a whole conversation.
pub fn estimate_context_tokens(messages: &[Message]) -> u64 {
    messages.iter().map(estimate_tokens).sum()
}

/// Whether the context should be compacted: enabled, and usage has crossed
/// into the reserved headroom.
pub fn should_compact(tokens: u64, context_window: u64, reserve_tokens: u64, enabled: bool) -> bool {
    enabled && tokens > context_window.saturating_sub(reserve_tokens)
}

#[cfg(test)]
#[path = "lib.test.rs"]
mod tests;
