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
async fn write_creates_file_and_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let tool = WriteTool;
    tool.execute(serde_json::json!({"path": "nested/dir/a.txt", "content": "hi"}), ctx(dir.path())).await.unwrap();
    let content = tokio::fs::read_to_string(dir.path().join("nested/dir/a.txt")).await.unwrap();
    assert_eq!(content, "hi");
}

#[tokio::test]
async fn write_overwrites_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(dir.path().join("a.txt"), "old").await.unwrap();
    let tool = WriteTool;
    tool.execute(serde_json::json!({"path": "a.txt", "content": "new"}), ctx(dir.path())).await.unwrap();
    let content = tokio::fs::read_to_string(dir.path().join("a.txt")).await.unwrap();
    assert_eq!(content, "new");
}
