use super::*;
use forge_model::testing::{ScriptedTurn, StubModel};
use forge_model::Part;
use forge_session::SessionManager;
use pretty_assertions::assert_eq;

fn long_message(tag: &str) -> forge_message::Message {
    forge_message::Message::user(format!("{tag}: {}", "x".repeat(4000)))
}

#[tokio::test]
async fn run_compaction_returns_none_when_there_is_no_cut_point() {
    let mut manager = SessionManager::new("/workspace");
    manager.append_message(long_message("only"));
    let branch = manager.get_branch(None).unwrap();
    let settings = CompactionSettings { enabled: true, reserve_tokens: 16_384, keep_recent_tokens: 20_000 };
    let model = StubModel::new(vec![ScriptedTurn::default()]);

    let result = run_compaction(&branch, &settings, &model).await.unwrap();

    assert!(result.is_none());
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn run_compaction_summarizes_when_a_cut_point_exists() {
    let mut manager = SessionManager::new("/workspace");
    for i in 0..30 {
        manager.append_message(long_message(&format!("m{i}")));
    }
    let branch = manager.get_branch(None).unwrap();
    let settings = CompactionSettings { enabled: true, reserve_tokens: 16_384, keep_recent_tokens: 10_000 };
    let model = StubModel::new(vec![ScriptedTurn { parts: vec![Part::TextDelta { text: "## Goal\nsummarized".into() }] }]);

    let result = run_compaction(&branch, &settings, &model).await.unwrap().expect("expected a compaction result");

    assert!(result.summary.contains("summarized"));
    assert_eq!(result.first_kept_entry_id, branch[20].id);
    assert!(!result.telemetry.is_split_turn);
}
