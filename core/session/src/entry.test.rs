use super::*;
use pretty_assertions::assert_eq;

#[test]
fn message_entry_roundtrips_through_json() {
    let entry = SessionEntry {
        id: "01H0".into(),
        parent_id: None,
        timestamp: Utc::now(),
        kind: SessionEntryKind::Message { message: Message::user("hi") },
    };
    let json = serde_json::to_string(&entry).unwrap();
    assert!(json.contains("\"type\":\"message\""));
    let back: SessionEntry = serde_json::from_str(&json).unwrap();
    assert_eq!(back, entry);
}

#[test]
fn compaction_entry_serializes_expected_field_names() {
    let entry = SessionEntry {
        id: "1".into(),
        parent_id: Some("0".into()),
        timestamp: Utc::now(),
        kind: SessionEntryKind::Compaction {
            summary: "did things".into(),
            first_kept_entry_id: "5".into(),
            tokens_before: 12345,
            details: None,
        },
    };
    let json = serde_json::to_value(&entry).unwrap();
    assert_eq!(json["firstKeptEntryId"], "5");
    assert_eq!(json["tokensBefore"], 12345);
}

#[test]
fn header_new_sets_current_format_version() {
    let header = SessionHeader::new("abc".into(), "/workspace".into());
    assert_eq!(header.version, SESSION_FORMAT_VERSION);
    assert_eq!(header.kind, "session");
}

#[test]
fn kind_predicates_match_their_variant() {
    let msg_entry = SessionEntry { id: "1".into(), parent_id: None, timestamp: Utc::now(), kind: SessionEntryKind::Message { message: Message::user("x") } };
    assert!(msg_entry.is_message());
    assert!(!msg_entry.is_compaction());
    assert!(msg_entry.as_message().is_some());
}
