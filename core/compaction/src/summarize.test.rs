use super::*;
use crate::file_ops::FileOperations;
use forge_message::factory::assistant_message;
use forge_message::{AssistantPart, StopReason, Usage};
use forge_model::testing::{ScriptedTurn, StubModel};
use forge_model::Part;
use pretty_assertions::assert_eq;

fn preparation(previous_summary: Option<String>, is_split_turn: bool, turn_prefix_messages: Vec<Message>) -> CompactionPreparation {
    let mut file_ops = FileOperations::default();
    file_ops.read.insert("a.rs".into());
    file_ops.edited.insert("b.rs".into());
    let done = assistant_message(vec![AssistantPart::Text { text: "done".into() }], None, Usage::default(), StopReason::Stop);
    CompactionPreparation {
        messages_to_summarize: vec![Message::user("do the thing"), done],
        turn_prefix_messages,
        is_split_turn,
        first_kept_entry_id: "entry-5".into(),
        tokens_before: 1234,
        previous_summary,
        file_ops,
        reserve_tokens: 16_384,
    }
}

#[tokio::test]
async fn compact_produces_a_summary_with_file_blocks() {
    let model = StubModel::new(vec![ScriptedTurn {
        parts: vec![Part::TextDelta { text: "## Goal\ndid the thing".into() }],
    }]);

    let result = compact(preparation(None, false, Vec::new()), &model).await.unwrap();

    assert!(result.summary.contains("did the thing"));
    assert!(result.summary.contains("<read-files>\na.rs\n</read-files>"));
    assert!(result.summary.contains("<modified-files>\nb.rs\n</modified-files>"));
    assert_eq!(result.first_kept_entry_id, "entry-5");
    assert_eq!(result.tokens_before, 1234);
    assert!(!result.telemetry.is_split_turn);
    assert_eq!(model.calls(), 1);
}

#[tokio::test]
async fn compact_wraps_the_previous_summary_when_updating() {
    let model = StubModel::new(vec![ScriptedTurn { parts: vec![Part::TextDelta { text: "updated".into() }] }]);

    let result = compact(preparation(Some("earlier summary".into()), false, Vec::new()), &model).await.unwrap();

    assert!(result.summary.starts_with("updated"));
    assert_eq!(model.calls(), 1);
}

#[tokio::test]
async fn split_turn_compaction_appends_a_second_summary_for_the_turn_prefix() {
    let model = StubModel::new(vec![
        ScriptedTurn { parts: vec![Part::TextDelta { text: "main summary".into() }] },
        ScriptedTurn { parts: vec![Part::TextDelta { text: "partial turn so far".into() }] },
    ]);

    let result = compact(preparation(None, true, vec![Message::user("still working")]), &model).await.unwrap();

    assert!(result.summary.contains("main summary"));
    assert!(result.summary.contains("## Turn Context (split turn)"));
    assert!(result.summary.contains("partial turn so far"));
    assert!(result.telemetry.is_split_turn);
    assert_eq!(model.calls(), 2);
}

#[tokio::test]
async fn split_turn_with_no_prefix_messages_skips_the_second_call() {
    let model = StubModel::new(vec![ScriptedTurn { parts: vec![Part::TextDelta { text: "main summary".into() }] }]);

    let result = compact(preparation(None, true, Vec::new()), &model).await.unwrap();

    assert!(!result.summary.contains("Turn Context"));
    assert_eq!(model.calls(), 1);
}
