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
async fn ls_lists_entries_with_directory_marker() {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(dir.path().join("a.txt"), "").await.unwrap();
    tokio::fs::create_dir(dir.path().join("sub")).await.unwrap();
    let tool = LsTool;
    let result = tool.execute(serde_json::json!({"path": "."}), ctx(dir.path())).await.unwrap();
    assert!(result.text_content().contains("a.txt"));
    assert!(result.text_content().contains("sub/"));
}

#[tokio::test]
async fn ls_reports_empty_directory() {
    let dir = tempfile::tempdir().unwrap();
    let tool = LsTool;
    let result = tool.execute(serde_json::json!({"path": "."}), ctx(dir.path())).await.unwrap();
    assert_eq!(result.text_content(), "(empty directory)");
}
