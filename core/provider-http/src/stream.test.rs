use super::*;
use crate::wire::{ChunkChoice, ChunkDelta, ChunkFunctionCall, ChunkToolCall, WireUsage};
use pretty_assertions::assert_eq;

fn text_chunk(text: &str) -> ChatChunk {
    ChatChunk {
        choices: vec![ChunkChoice {
            delta: ChunkDelta { content: Some(text.to_string()), reasoning_content: None, tool_calls: None },
            finish_reason: None,
        }],
        usage: None,
    }
}

fn finish_chunk(reason: &str) -> ChatChunk {
    ChatChunk {
        choices: vec![ChunkChoice {
            delta: ChunkDelta::default(),
            finish_reason: Some(reason.to_string()),
        }],
        usage: Some(WireUsage { prompt_tokens: 10, completion_tokens: 5, prompt_tokens_details: None }),
    }
}

#[test]
fn text_deltas_are_forwarded_immediately_and_accumulated() {
    let mut acc = StreamAccumulator::new();

    let parts = acc.apply_chunk(text_chunk("hello "));
    assert_eq!(parts, vec![Part::TextDelta { text: "hello ".to_string() }]);

    let parts = acc.apply_chunk(text_chunk("world"));
    assert_eq!(parts, vec![Part::TextDelta { text: "world".to_string() }]);

    assert!(!acc.is_finished());
    let message = acc.assistant_parts();
    assert_eq!(message, vec![AssistantPart::Text { text: "hello world".to_string() }]);
}

#[test]
fn tool_call_deltas_are_buffered_until_finish_reason_closes_the_step() {
    let mut acc = StreamAccumulator::new();

    let chunk = ChatChunk {
        choices: vec![ChunkChoice {
            delta: ChunkDelta {
                content: None,
                reasoning_content: None,
                tool_calls: Some(vec![ChunkToolCall {
                    index: 0,
                    id: Some("call_1".to_string()),
                    function: Some(ChunkFunctionCall { name: Some("read".to_string()), arguments: Some("{\"pa".to_string()) }),
                }]),
            },
            finish_reason: None,
        }],
        usage: None,
    };
    assert!(acc.apply_chunk(chunk).is_empty());

    let chunk = ChatChunk {
        choices: vec![ChunkChoice {
            delta: ChunkDelta {
                content: None,
                reasoning_content: None,
                tool_calls: Some(vec![ChunkToolCall {
                    index: 0,
                    id: None,
                    function: Some(ChunkFunctionCall { name: None, arguments: Some("th\": \"a.rs\"}".to_string()) }),
                }]),
            },
            finish_reason: None,
        }],
        usage: None,
    };
    assert!(acc.apply_chunk(chunk).is_empty());

    let parts = acc.apply_chunk(finish_chunk("tool_calls"));

    assert!(matches!(&parts[0], Part::ToolCall { id, name, .. } if id == "call_1" && name == "read"));
    assert!(matches!(&parts[1], Part::StepFinish { .. }));
    assert!(matches!(&parts[2], Part::Finish { finish_reason: StopReason::ToolUse }));
    assert!(acc.is_finished());

    let message = acc.assistant_parts();
    assert_eq!(message.len(), 1);
    assert!(matches!(&message[0], AssistantPart::ToolCall { arguments, .. } if arguments == &serde_json::json!({"path": "a.rs"})));
}

#[test]
fn usage_accumulates_across_chunks() {
    let mut acc = StreamAccumulator::new();
    acc.apply_chunk(finish_chunk("stop"));

    let usage = acc.usage();
    assert_eq!(usage.input_tokens, 10);
    assert_eq!(usage.output_tokens, 5);
}

#[test]
fn finish_abnormally_synthesizes_a_terminal_part_once() {
    let mut acc = StreamAccumulator::new();
    acc.apply_chunk(text_chunk("partial"));
    assert!(!acc.is_finished());

    let parts = acc.finish_abnormally(StopReason::Error);

    assert!(matches!(parts.last(), Some(Part::Finish { finish_reason: StopReason::Error })));
    assert!(acc.is_finished());
    assert_eq!(acc.assistant_parts(), vec![AssistantPart::Text { text: "partial".to_string() }]);
}
