use super::*;

#[test]
fn ulid_like_id_is_unique_across_calls() {
    let a = ulid_like_id();
    let b = ulid_like_id();
    assert_ne!(a, b);
    assert!(!a.is_empty());
}

#[tokio::test]
async fn run_creates_the_session_file_at_the_default_path() {
    let dir = tempfile::tempdir().unwrap();
    let options = RunOptions {
        cwd: dir.path().to_path_buf(),
        base_url: "http://127.0.0.1:0".to_string(),
        model: "gpt-test".to_string(),
        api_key: None,
    };

    // `Agent::stream` will fail against an unreachable base_url, but the
    // session file must already exist on disk by the time that happens.
    let _ = run(options, None, "hello".to_string()).await;

    let forge_dir = dir.path().join(".forge");
    let entries: Vec<_> = std::fs::read_dir(&forge_dir).unwrap().collect();
    assert_eq!(entries.len(), 1);
}
