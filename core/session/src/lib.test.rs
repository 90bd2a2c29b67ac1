use super::*;
use forge_message::type_guards::get_text_content;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn persisted_session_appends_write_through_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("s.jsonl");

    let mut session = PersistedSession::create(&path, "/workspace").await.unwrap();
    session.append_message(Message::user("hi")).await.unwrap();

    let (reloaded, recovered, skipped) = PersistedSession::load(&path).await.unwrap();
    assert_eq!(recovered, 1);
    assert_eq!(skipped, 0);
    let ctx = reloaded.build_session_context(None).unwrap();
    assert_eq!(get_text_content(&ctx.messages[0]), "hi");
}
