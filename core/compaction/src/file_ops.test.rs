use super::*;
use forge_message::factory::assistant_message;
use forge_message::{AssistantPart, StopReason, Usage};
use pretty_assertions::assert_eq;

fn tool_call_message(name: &str, path: &str) -> Message {
    assistant_message(
        vec![AssistantPart::ToolCall { id: "1".into(), name: name.into(), arguments: serde_json::json!({"path": path}) }],
        None,
        Usage::default(),
        StopReason::ToolUse,
    )
}

#[test]
fn observe_tracks_reads_writes_and_edits_separately() {
    let mut ops = FileOperations::default();
    ops.observe(&tool_call_message("read", "a.rs"));
    ops.observe(&tool_call_message("write", "b.rs"));
    ops.observe(&tool_call_message("edit", "c.rs"));

    assert!(ops.read.contains("a.rs"));
    assert!(ops.written.contains("b.rs"));
    assert!(ops.edited.contains("c.rs"));
}

#[test]
fn read_only_files_excludes_anything_also_modified() {
    let mut ops = FileOperations::default();
    ops.observe(&tool_call_message("read", "a.rs"));
    ops.observe(&tool_call_message("edit", "a.rs"));
    ops.observe(&tool_call_message("read", "b.rs"));

    assert_eq!(ops.read_only_files(), vec!["b.rs".to_string()]);
    assert_eq!(ops.modified_files(), vec!["a.rs".to_string()]);
}

#[test]
fn seed_from_previous_details_carries_forward() {
    let previous = forge_session::FileOperationDetails { read_files: vec!["x.rs".into()], modified_files: vec!["y.rs".into()] };
    let ops = FileOperations::seed_from(Some(&previous));
    assert!(ops.read.contains("x.rs"));
    assert!(ops.written.contains("y.rs"));
}
