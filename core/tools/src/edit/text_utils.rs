//! Fuzzy-matching helpers for the `edit` tool.
//!
//! Models frequently reproduce a file's text with small, mechanical
//! deviations — trailing whitespace trimmed, curly quotes turned straight,
//! an em dash turned into a hyphen. Rather than fail on the first
//! near-miss, `edit` tries an exact match first and only normalizes these
//! specific categories of drift on retry, so a genuine ambiguity (two
//! distinct places the text could apply) still fails loudly.

/// Counts how many times `needle` occurs verbatim in `haystack`. Returns 0
/// for an empty needle so callers can treat "not found" and "empty
/// pattern" alike.
pub fn exact_match_count(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}

/// Normalizes whitespace/quote/dash/line-ending drift that models commonly
/// introduce when echoing back a file's text.
pub fn normalize_for_fuzzy_match(text: &str) -> String {
    let mut out = text.replace("\r\n", "\n");
    out = out.replace(['\u{2018}', '\u{2019}'], "'");
    out = out.replace(['\u{201C}', '\u{201D}'], "\"");
    out = out.replace(['\u{2013}', '\u{2014}'], "-");
    out = out.replace('\u{00A0}', " ");
    out.lines().map(|line| line.trim_end()).collect::<Vec<_>>().join("\n")
}

/// Attempts a fuzzy match of `needle` inside `haystack` by normalizing both
/// sides. Returns the byte range of the match in the *original* haystack
/// when exactly one normalized match exists, `None` otherwise (either zero
/// or more than one).
pub fn fuzzy_find_unique(haystack: &str, needle: &str) -> Option<std::ops::Range<usize>> {
    let normalized_needle = normalize_for_fuzzy_match(needle);
    if normalized_needle.is_empty() {
        return None;
    }

    // Normalizing per-line keeps byte offsets into the *original* haystack
    // recoverable: walk original lines in lockstep with normalized lines.
    let original_lines: Vec<&str> = haystack.split_inclusive('\n').collect();
    let mut line_starts = Vec::with_capacity(original_lines.len());
    let mut pos = 0usize;
    for line in &original_lines {
        line_starts.push(pos);
        pos += line.len();
    }

    let normalized_haystack = normalize_for_fuzzy_match(haystack);
    let needle_line_count = normalized_needle.lines().count().max(1);
    let normalized_hay_lines: Vec<&str> = normalized_haystack.lines().collect();

    if normalized_hay_lines.len() < needle_line_count {
        return None;
    }

    let mut matches = Vec::new();
    for start_line in 0..=(normalized_hay_lines.len() - needle_line_count) {
        let window = normalized_hay_lines[start_line..start_line + needle_line_count].join("\n");
        if window == normalized_needle {
            matches.push(start_line);
        }
    }

    if matches.len() != 1 {
        return None;
    }

    let start_line = matches[0];
    let end_line = (start_line + needle_line_count).min(original_lines.len());
    let byte_start = *line_starts.get(start_line)?;
    let byte_end = if end_line < original_lines.len() {
        line_starts[end_line]
    } else {
        haystack.len()
    };
    Some(byte_start..byte_end)
}

#[cfg(test)]
#[path = "text_utils.test.rs"]
mod tests;
