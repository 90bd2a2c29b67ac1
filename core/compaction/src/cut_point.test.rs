use super::*;
use forge_message::factory::{assistant_message, tool_results_message};
use forge_message::type_guards::get_text_content;
use forge_message::{AssistantPart, StopReason, ToolResultPart, Usage};
use forge_session::SessionManager;
use pretty_assertions::assert_eq;

fn long_user_message(tag: &str) -> Message {
    Message::user(format!("{tag}: {}", "x".repeat(4000)))
}

#[test]
fn prepare_compaction_returns_none_when_tail_is_already_a_compaction() {
    let mut manager = SessionManager::new("/workspace");
    let keep_from = manager.append_message(long_user_message("a")).id.clone();
    manager.append_compaction("summary", keep_from, 100, None);
    let branch = manager.get_branch(None).unwrap();
    assert!(prepare_compaction(&branch, &CompactionSettings::default()).is_none());
}

#[test]
fn prepare_compaction_returns_none_for_empty_branch() {
    let manager = SessionManager::new("/workspace");
    let branch = manager.get_branch(None).unwrap();
    assert!(prepare_compaction(&branch, &CompactionSettings::default()).is_none());
}

#[test]
fn cut_point_keeps_recent_messages_and_summarizes_the_rest() {
    let mut manager = SessionManager::new("/workspace");
    for i in 0..30 {
        manager.append_message(long_user_message(&format!("m{i}")));
    }
    let branch = manager.get_branch(None).unwrap();
    let settings = CompactionSettings { enabled: true, reserve_tokens: 16_384, keep_recent_tokens: 10_000 };

    let prep = prepare_compaction(&branch, &settings).expect("expected a cut point");

    assert_eq!(prep.first_kept_entry_id, branch[20].id);
    assert_eq!(prep.messages_to_summarize.len(), 20);
    assert!(!prep.is_split_turn);
    assert_eq!(get_text_content(&prep.messages_to_summarize[0]), get_text_content(branch[0].as_message().unwrap()));
}

#[test]
fn split_turn_compaction_produces_a_turn_prefix() {
    let mut manager = SessionManager::new("/workspace");
    manager.append_message(long_user_message("u0"));
    manager.append_message(assistant_message(vec![AssistantPart::Text { text: "a0".into() }], None, Usage::default(), StopReason::Stop));
    manager.append_message(Message::user("u1 turn start"));
    manager.append_message(assistant_message(
        vec![AssistantPart::ToolCall { id: "1".into(), name: "read".into(), arguments: serde_json::json!({"path": "a.rs"}) }],
        None,
        Usage::default(),
        StopReason::ToolUse,
    ));
    manager.append_message(tool_results_message(vec![ToolResultPart::ok("1", "read", "contents")]));
    // A long final assistant message dominates the backward-accumulation
    // walk, so it alone satisfies even a tiny `keep_recent_tokens`.
    manager.append_message(assistant_message(
        vec![AssistantPart::Text { text: "x".repeat(4000) }],
        None,
        Usage::default(),
        StopReason::Stop,
    ));

    let branch = manager.get_branch(None).unwrap();
    let settings = CompactionSettings { enabled: true, reserve_tokens: 16_384, keep_recent_tokens: 1 };

    let prep = prepare_compaction(&branch, &settings).expect("expected a cut point");

    assert!(prep.is_split_turn);
    assert!(!prep.turn_prefix_messages.is_empty());
    assert_eq!(get_text_content(&prep.turn_prefix_messages[0]), "u1 turn start");
}
