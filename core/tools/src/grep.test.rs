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
async fn grep_finds_matching_lines() {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(dir.path().join("a.txt"), "hello\nworld\n").await.unwrap();
    let tool = GrepTool;
    let result = tool.execute(serde_json::json!({"pattern": "wor.d"}), ctx(dir.path())).await.unwrap();
    assert!(result.text_content().contains("world"));
}

#[tokio::test]
async fn grep_reports_no_matches() {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(dir.path().join("a.txt"), "hello\n").await.unwrap();
    let tool = GrepTool;
    let result = tool.execute(serde_json::json!({"pattern": "zzz"}), ctx(dir.path())).await.unwrap();
    assert_eq!(result.text_content(), "No matches found.");
}

#[tokio::test]
async fn grep_respects_glob_restriction() {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(dir.path().join("a.rs"), "needle\n").await.unwrap();
    tokio::fs::write(dir.path().join("b.txt"), "needle\n").await.unwrap();
    let tool = GrepTool;
    let result = tool.execute(serde_json::json!({"pattern": "needle", "glob": "*.rs"}), ctx(dir.path())).await.unwrap();
    assert!(result.text_content().contains("a.rs"));
    assert!(!result.text_content().contains("b.txt"));
}
