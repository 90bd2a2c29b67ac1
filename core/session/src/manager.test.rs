use super::*;
use forge_message::type_guards::get_text_content;
use pretty_assertions::assert_eq;

#[test]
fn append_advances_leaf_and_links_parent() {
    let mut manager = SessionManager::new("/workspace");
    assert!(manager.leaf().is_none());

    let first_id = manager.append_message(Message::user("one")).id.clone();
    assert_eq!(manager.leaf(), Some(first_id.as_str()));

    let second = manager.append_message(Message::user("two"));
    assert_eq!(second.parent_id.as_deref(), Some(first_id.as_str()));
    assert_eq!(manager.leaf(), Some(second.id.as_str()));
}

#[test]
fn get_branch_returns_root_to_leaf_order() {
    let mut manager = SessionManager::new("/workspace");
    manager.append_message(Message::user("one"));
    manager.append_message(Message::user("two"));
    manager.append_message(Message::user("three"));

    let branch = manager.get_branch(None).unwrap();
    assert_eq!(branch.len(), 3);
    assert_eq!(get_text_content(branch[0].as_message().unwrap()), "one");
    assert_eq!(get_text_content(branch[2].as_message().unwrap()), "three");
}

#[test]
fn get_branch_on_unknown_leaf_errors() {
    let manager = SessionManager::new("/workspace");
    assert!(manager.get_branch(Some("missing")).is_err());
}

#[test]
fn linear_session_replay_equals_raw_message_entries() {
    let mut manager = SessionManager::new("/workspace");
    manager.append_message(Message::user("one"));
    manager.append_message(Message::user("two"));

    let ctx = manager.build_session_context(None).unwrap();
    assert_eq!(ctx.messages.len(), 2);
    assert_eq!(get_text_content(&ctx.messages[0]), "one");
    assert_eq!(get_text_content(&ctx.messages[1]), "two");
}

#[test]
fn compaction_replay_prepends_summary_and_keeps_suffix() {
    let mut manager = SessionManager::new("/workspace");
    manager.append_message(Message::user("one"));
    manager.append_message(Message::user("two"));
    let keep_from = manager.append_message(Message::user("three")).id.clone();
    manager.append_message(Message::user("four"));

    manager.append_compaction("summary text", keep_from.clone(), 500, None);

    let ctx = manager.build_session_context(None).unwrap();
    assert_eq!(get_text_content(&ctx.messages[0]), "<summary type=\"compaction\" tokens_before=\"500\">summary text</summary>");
    assert_eq!(get_text_content(&ctx.messages[1]), "three");
    assert_eq!(get_text_content(&ctx.messages[2]), "four");
    assert_eq!(ctx.messages.len(), 3);
}

#[test]
fn branch_moves_leaf_without_appending_an_entry() {
    let mut manager = SessionManager::new("/workspace");
    let first_id = manager.append_message(Message::user("one")).id.clone();
    manager.append_message(Message::user("two"));
    let entry_count_before = manager.entries().len();

    manager.branch(&first_id).unwrap();
    assert_eq!(manager.leaf(), Some(first_id.as_str()));
    assert_eq!(manager.entries().len(), entry_count_before);
}

#[test]
fn branch_with_summary_appends_and_replays_as_synthetic_message() {
    let mut manager = SessionManager::new("/workspace");
    let first_id = manager.append_message(Message::user("one")).id.clone();
    manager.append_message(Message::user("two"));

    manager.branch_with_summary(&first_id, "branched summary", None).unwrap();
    let ctx = manager.build_session_context(None).unwrap();
    assert_eq!(ctx.messages.len(), 2);
    assert_eq!(get_text_content(&ctx.messages[1]), "<summary type=\"branch\">branched summary</summary>");
}

#[test]
fn model_change_sets_model_and_is_dropped_from_messages() {
    let mut manager = SessionManager::new("/workspace");
    manager.append_message(Message::user("one"));
    manager.append_model_change("openai", "gpt-5");
    manager.append_message(Message::user("two"));

    let ctx = manager.build_session_context(None).unwrap();
    assert_eq!(ctx.messages.len(), 2);
    assert_eq!(ctx.model, Some(("openai".to_string(), "gpt-5".to_string())));
}

#[test]
fn branch_with_summary_on_unknown_id_errors() {
    let mut manager = SessionManager::new("/workspace");
    assert!(manager.branch_with_summary("missing", "x", None).is_err());
}
