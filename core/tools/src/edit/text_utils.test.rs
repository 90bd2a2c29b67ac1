use super::*;
use pretty_assertions::assert_eq;

#[test]
fn exact_match_count_counts_non_overlapping_occurrences() {
    assert_eq!(exact_match_count("ababab", "ab"), 3);
    assert_eq!(exact_match_count("abc", "xyz"), 0);
    assert_eq!(exact_match_count("abc", ""), 0);
}

#[test]
fn normalize_for_fuzzy_match_straightens_smart_quotes_and_dashes() {
    let input = "\u{201C}hello\u{201D}\u{2014}world";
    assert_eq!(normalize_for_fuzzy_match(input), "\"hello\"-world");
}

#[test]
fn normalize_for_fuzzy_match_trims_trailing_whitespace_per_line() {
    let input = "line one   \nline two\t\n";
    assert_eq!(normalize_for_fuzzy_match(input), "line one\nline two");
}

#[test]
fn fuzzy_find_unique_matches_despite_trailing_whitespace_drift() {
    let haystack = "fn main() {   \n    println!(\"hi\");\n}\n";
    let needle = "fn main() {\n    println!(\"hi\");\n}";
    let range = fuzzy_find_unique(haystack, needle).expect("expected a fuzzy match");
    assert_eq!(&haystack[range], "fn main() {   \n    println!(\"hi\");\n}\n");
}

#[test]
fn fuzzy_find_unique_returns_none_for_ambiguous_match() {
    let haystack = "a\nb\na\nb\n";
    let needle = "a\nb";
    assert!(fuzzy_find_unique(haystack, needle).is_none());
}

#[test]
fn fuzzy_find_unique_returns_none_when_absent() {
    assert!(fuzzy_find_unique("one\ntwo\n", "three").is_none());
}
