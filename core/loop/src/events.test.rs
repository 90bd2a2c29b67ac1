use super::*;
use pretty_assertions::assert_eq;

#[test]
fn compaction_reason_serializes_snake_case() {
    assert_eq!(serde_json::to_string(&CompactionReason::Threshold).unwrap(), "\"threshold\"");
    assert_eq!(serde_json::to_string(&CompactionReason::Overflow).unwrap(), "\"overflow\"");
}

#[test]
fn turn_end_carries_at_most_one_tool_result_message() {
    let event = AgentEvent::TurnEnd { message: forge_message::Message::user("hi"), tool_results: Vec::new() };
    match event {
        AgentEvent::TurnEnd { tool_results, .. } => assert!(tool_results.is_empty()),
        _ => panic!("expected TurnEnd"),
    }
}
