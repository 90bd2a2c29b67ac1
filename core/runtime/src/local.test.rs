use super::*;
use crate::ExecOptions;
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};

#[tokio::test]
async fn exec_runs_a_simple_command() {
    let runtime = LocalRuntime::new();
    let result = runtime.exec("echo hi", ExecOptions::default()).await.unwrap();
    assert_eq!(result.output.trim(), "hi");
    assert_eq!(result.exit_code, Some(0));
    assert!(result.success());
}

#[tokio::test]
async fn exec_surfaces_nonzero_exit_code() {
    let runtime = LocalRuntime::new();
    let result = runtime.exec("exit 3", ExecOptions::default()).await.unwrap();
    assert_eq!(result.exit_code, Some(3));
    assert!(!result.success());
}

#[tokio::test]
async fn exec_forwards_output_chunks_through_on_chunk() {
    let runtime = LocalRuntime::new();
    let seen = Arc::new(Mutex::new(String::new()));
    let seen_clone = seen.clone();
    let result = runtime
        .exec("echo hi", ExecOptions { on_chunk: Some(Arc::new(move |chunk| seen_clone.lock().unwrap().push_str(&chunk))), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(result.output.trim(), "hi");
    assert_eq!(seen.lock().unwrap().trim(), "hi");
}

#[tokio::test]
async fn exec_respects_cancellation() {
    let runtime = LocalRuntime::new();
    let token = tokio_util::sync::CancellationToken::new();
    token.cancel();
    let result = runtime
        .exec("sleep 5", ExecOptions { cancel: Some(token), ..Default::default() })
        .await
        .unwrap();
    assert!(result.aborted);
}

#[tokio::test]
async fn write_then_read_file_roundtrips() {
    let dir = tempfile::tempdir().unwrap();
    let runtime = LocalRuntime::new();
    let path = dir.path().join("a.txt");
    runtime.write_file(&path, b"hello").await.unwrap();
    let content = runtime.read_file(&path).await.unwrap();
    assert_eq!(content, b"hello");
}

#[test]
fn resolve_workspace_path_expands_home() {
    let runtime = LocalRuntime::new();
    std::env::set_var("HOME", "/home/tester");
    let resolved = runtime.resolve_workspace_path("~/project", Path::new("/tmp")).unwrap();
    assert_eq!(resolved, PathBuf::from("/home/tester/project"));
}

#[test]
fn resolve_workspace_path_makes_relative_paths_absolute_against_cwd() {
    let runtime = LocalRuntime::new();
    let resolved = runtime.resolve_workspace_path("a/b.txt", Path::new("/workspace")).unwrap();
    assert_eq!(resolved, PathBuf::from("/workspace/a/b.txt"));
}

#[test]
fn resolve_workspace_path_rejects_escape_from_sandbox_root() {
    let runtime = LocalRuntime::sandboxed("/workspace");
    let err = runtime.resolve_workspace_path("../../etc/passwd", Path::new("/workspace/sub"));
    assert!(err.is_err());
}

#[test]
fn resolve_workspace_path_allows_paths_within_sandbox_root() {
    let runtime = LocalRuntime::sandboxed("/workspace");
    let resolved = runtime.resolve_workspace_path("sub/file.txt", Path::new("/workspace")).unwrap();
    assert_eq!(resolved, PathBuf::from("/workspace/sub/file.txt"));
}
