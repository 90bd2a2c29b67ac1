use super::*;

#[tokio::test]
async fn load_session_errors_when_the_file_does_not_exist() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.jsonl");

    let err = load_session(&missing).await.unwrap_err();
    assert!(err.to_string().contains("session not found"));
}

#[tokio::test]
async fn load_session_reopens_an_existing_log() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.jsonl");
    let session = PersistedSession::create(path.clone(), dir.path().to_string_lossy()).await.unwrap();
    drop(session);

    let reopened = load_session(&path).await.unwrap();
    assert!(reopened.build_session_context(None).unwrap().messages.is_empty());
}
