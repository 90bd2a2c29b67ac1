use super::*;
use crate::ToolContext;
use forge_runtime::LocalRuntime;
use std::sync::{Arc, Mutex};
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
async fn bash_returns_command_output() {
    let dir = tempfile::tempdir().unwrap();
    let tool = BashTool;
    let result = tool.execute(serde_json::json!({"command": "echo hi"}), ctx(dir.path())).await.unwrap();
    assert_eq!(result.text_content().trim(), "hi");
}

#[tokio::test]
async fn bash_surfaces_nonzero_exit_as_error() {
    let dir = tempfile::tempdir().unwrap();
    let tool = BashTool;
    let err = tool.execute(serde_json::json!({"command": "exit 2"}), ctx(dir.path())).await.unwrap_err();
    assert!(err.message.contains("status"));
}

#[tokio::test]
async fn bash_forwards_output_through_on_partial() {
    let dir = tempfile::tempdir().unwrap();
    let tool = BashTool;
    let seen = Arc::new(Mutex::new(String::new()));
    let seen_clone = seen.clone();
    let mut context = ctx(dir.path());
    context.on_partial = Some(Arc::new(move |chunk: String| {
        seen_clone.lock().unwrap().push_str(&chunk);
    }));

    let result = tool.execute(serde_json::json!({"command": "echo hi"}), context).await.unwrap();

    assert_eq!(result.text_content().trim(), "hi");
    assert_eq!(seen.lock().unwrap().trim(), "hi");
}

#[tokio::test]
async fn bash_reports_aborted_when_cancelled_before_run() {
    let dir = tempfile::tempdir().unwrap();
    let cancel = CancellationToken::new();
    cancel.cancel();
    let tool = BashTool;
    let err = tool
        .execute(
            serde_json::json!({"command": "sleep 3"}),
            ToolContext {
                runtime: Arc::new(LocalRuntime::new()),
                cwd: dir.path().to_path_buf(),
                tool_call_id: "1".into(),
                cancel,
                on_partial: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.message, "Operation aborted");
}
