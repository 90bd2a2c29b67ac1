use super::*;
use crate::testing::{ScriptedTurn, StubModel};
use futures::StreamExt;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn stub_model_replays_scripted_text_delta() {
    let model = StubModel::new(vec![ScriptedTurn { parts: vec![Part::TextDelta { text: "hi".into() }] }]);
    let handle = model.stream(ModelRequest::default()).await.unwrap();
    let parts: Vec<Part> = handle.full_stream.collect().await;
    assert_eq!(parts, vec![Part::TextDelta { text: "hi".into() }]);
    let result = handle.response.await.unwrap();
    assert_eq!(result.finish_reason, StopReason::Stop);
}

#[tokio::test]
async fn stub_model_marks_tool_use_finish_reason() {
    let model = StubModel::new(vec![ScriptedTurn {
        parts: vec![Part::ToolCall { id: "1".into(), name: "read".into(), arguments: serde_json::json!({}) }],
    }]);
    let result = model.generate(ModelRequest::default()).await.unwrap();
    assert_eq!(result.finish_reason, StopReason::ToolUse);
}

#[tokio::test]
async fn stub_model_repeats_last_script_past_the_end() {
    let model = StubModel::new(vec![ScriptedTurn { parts: vec![Part::TextDelta { text: "only".into() }] }]);
    let _ = model.generate(ModelRequest::default()).await.unwrap();
    let second = model.generate(ModelRequest::default()).await.unwrap();
    assert_eq!(forge_message::type_guards::get_text_content(&second.messages[0]), "only");
    assert_eq!(model.calls(), 2);
}
