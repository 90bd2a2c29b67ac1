use super::*;
use crate::manager::SessionManager;
use forge_message::Message;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn create_then_load_roundtrips_entries() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.jsonl");

    let mut manager = SessionManager::new("/workspace");
    manager.append_message(Message::user("hi"));
    create(&path, &manager).await.unwrap();

    let loaded = load(&path).await.unwrap();
    assert_eq!(loaded.recovered_entries, 1);
    assert_eq!(loaded.skipped_lines, 0);
    assert_eq!(loaded.manager.entries().len(), 1);
}

#[tokio::test]
async fn append_entry_is_visible_after_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.jsonl");

    let mut manager = SessionManager::new("/workspace");
    create(&path, &manager).await.unwrap();
    let entry = manager.append_message(Message::user("hi")).clone();
    append_entry(&path, &entry).await.unwrap();

    let loaded = load(&path).await.unwrap();
    assert_eq!(loaded.recovered_entries, 1);
}

#[tokio::test]
async fn load_recovers_from_a_corrupt_trailing_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.jsonl");

    let manager = SessionManager::new("/workspace");
    create(&path, &manager).await.unwrap();

    let mut file = tokio::fs::OpenOptions::new().append(true).open(&path).await.unwrap();
    use tokio::io::AsyncWriteExt;
    file.write_all(b"{\"id\":\"1\",\"parentId\":null\n").await.unwrap();
    file.flush().await.unwrap();

    let loaded = load(&path).await.unwrap();
    assert_eq!(loaded.recovered_entries, 0);
    assert_eq!(loaded.skipped_lines, 1);
}
