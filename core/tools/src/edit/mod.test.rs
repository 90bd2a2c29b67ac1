use super::*;
use crate::ToolContext;
use forge_runtime::LocalRuntime;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

fn ctx(cwd: &std::path::Path) -> ToolContext {
    ToolContext {
        runtime: Arc::new(LocalRuntime::new()),
        cwd: cwd.to_path_buf(),
        tool_call_id: "call-1".into(),
        cancel: CancellationToken::new(),
        on_partial: None,
    }
}

#[tokio::test]
async fn edit_replaces_a_single_exact_match() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.txt");
    tokio::fs::write(&path, "hello world\n").await.unwrap();

    let tool = EditTool;
    let result = tool
        .execute(
            serde_json::json!({"path": "a.txt", "old_text": "world", "new_text": "rust"}),
            ctx(dir.path()),
        )
        .await
        .unwrap();

    let content = tokio::fs::read_to_string(&path).await.unwrap();
    assert_eq!(content, "hello rust\n");
    assert!(result.text_content().contains("-hello world"));
    assert!(result.text_content().contains("+hello rust"));
}

#[tokio::test]
async fn edit_fails_on_multiple_matches() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.txt");
    tokio::fs::write(&path, "foo\nfoo\n").await.unwrap();

    let tool = EditTool;
    let err = tool
        .execute(
            serde_json::json!({"path": "a.txt", "old_text": "foo", "new_text": "bar"}),
            ctx(dir.path()),
        )
        .await
        .unwrap_err();

    assert!(err.message.contains("matches 2 times"));
}

#[tokio::test]
async fn edit_fails_when_old_text_absent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.txt");
    tokio::fs::write(&path, "foo\n").await.unwrap();

    let tool = EditTool;
    let err = tool
        .execute(
            serde_json::json!({"path": "a.txt", "old_text": "absent", "new_text": "bar"}),
            ctx(dir.path()),
        )
        .await
        .unwrap_err();

    assert!(err.message.contains("not found"));
}

#[tokio::test]
async fn edit_preserves_crlf_line_endings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.txt");
    tokio::fs::write(&path, "line1\r\nline2\r\n").await.unwrap();

    let tool = EditTool;
    tool.execute(
        serde_json::json!({"path": "a.txt", "old_text": "line2", "new_text": "line-two"}),
        ctx(dir.path()),
    )
    .await
    .unwrap();

    let raw = tokio::fs::read(&path).await.unwrap();
    let content = String::from_utf8(raw).unwrap();
    assert_eq!(content, "line1\r\nline-two\r\n");
}

#[tokio::test]
async fn edit_applies_fuzzy_match_on_trailing_whitespace_drift() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.txt");
    tokio::fs::write(&path, "fn main() {   \n    body();\n}\n").await.unwrap();

    let tool = EditTool;
    tool.execute(
        serde_json::json!({"path": "a.txt", "old_text": "fn main() {\n    body();\n}", "new_text": "fn main() {\n    other();\n}"}),
        ctx(dir.path()),
    )
    .await
    .unwrap();

    let content = tokio::fs::read_to_string(&path).await.unwrap();
    assert!(content.contains("other();"));
}
