use super::*;
use crate::ToolContext;
use forge_runtime::LocalRuntime;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

fn ctx(cwd: &std::path::Path) -> ToolContext {
    ToolContext {
        runtime: Arc::new(LocalRuntime::new()),
        cwd: cwd.to_path_buf(),
        tool_call_id: "1".into(),
        cancel: CancellationToken::new(),
        on_partial: None,
    }
}

#[tokio::test]
async fn find_matches_glob_pattern() {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(dir.path().join("a.rs"), "").await.unwrap();
    tokio::fs::write(dir.path().join("b.txt"), "").await.unwrap();
    let tool = FindTool;
    let result = tool.execute(serde_json::json!({"pattern": "*.rs"}), ctx(dir.path())).await.unwrap();
    assert!(result.text_content().ends_with("a.rs"));
}

#[tokio::test]
async fn find_reports_no_matches() {
    let dir = tempfile::tempdir().unwrap();
    let tool = FindTool;
    let result = tool.execute(serde_json::json!({"pattern": "*.rs"}), ctx(dir.path())).await.unwrap();
    assert_eq!(result.text_content(), "No files matched.");
}
