use super::*;
use pretty_assertions::assert_eq;

#[test]
fn hash_content_is_deterministic_and_sensitive_to_changes() {
    let a = hash_content("hello world");
    let b = hash_content("hello world");
    let c = hash_content("hello worldx");
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a.len(), 64);
}

#[test]
fn detect_line_ending_prefers_crlf_when_present() {
    assert_eq!(detect_line_ending("a\nb\n"), "\n");
    assert_eq!(detect_line_ending("a\r\nb\r\n"), "\r\n");
    assert_eq!(detect_line_ending("no newline"), "\n");
    assert_eq!(detect_line_ending("mixed\nand\r\nlines"), "\r\n");
}

#[test]
fn restore_trailing_newline_matches_source_state() {
    assert_eq!(restore_trailing_newline("a\n", "b"), "b\n");
    assert_eq!(restore_trailing_newline("a", "b\n"), "b");
    assert_eq!(restore_trailing_newline("a\n", "b\n"), "b\n");
    assert_eq!(restore_trailing_newline("a", "b"), "b");
}

#[test]
fn apply_line_ending_converts_lf_to_crlf_when_requested() {
    assert_eq!(apply_line_ending("a\nb\n", "\r\n"), "a\r\nb\r\n");
    assert_eq!(apply_line_ending("a\nb\n", "\n"), "a\nb\n");
}
