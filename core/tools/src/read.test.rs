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
async fn read_returns_full_small_file() {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(dir.path().join("a.txt"), "line1\nline2\n").await.unwrap();
    let tool = ReadTool;
    let result = tool.execute(serde_json::json!({"path": "a.txt"}), ctx(dir.path())).await.unwrap();
    assert_eq!(result.text_content(), "line1\nline2");
}

#[tokio::test]
async fn read_paginates_with_offset_and_limit() {
    let dir = tempfile::tempdir().unwrap();
    let content: String = (1..=10).map(|i| format!("line{i}\n")).collect();
    tokio::fs::write(dir.path().join("a.txt"), content).await.unwrap();
    let tool = ReadTool;
    let result = tool.execute(serde_json::json!({"path": "a.txt", "offset": 3, "limit": 2}), ctx(dir.path())).await.unwrap();
    assert!(result.text_content().starts_with("line3\nline4"));
    assert!(result.text_content().contains("offset=5"));
}

#[tokio::test]
async fn read_returns_image_part_for_image_extension() {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(dir.path().join("a.png"), [0x89, 0x50, 0x4E, 0x47]).await.unwrap();
    let tool = ReadTool;
    let result = tool.execute(serde_json::json!({"path": "a.png"}), ctx(dir.path())).await.unwrap();
    assert!(matches!(result.content[0], ToolContentPart::Image { .. }));
}
