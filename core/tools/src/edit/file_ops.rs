//! File-state helpers shared by `edit`: content hashing for concurrent
//! modification detection, and line-ending preservation.

use sha2::{Digest, Sha256};

/// SHA-256 hex digest of `content`. Used to notice when a file changed on
/// disk between the model reading it and the model's `edit` call landing.
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// `"\r\n"` if `content` uses CRLF line endings anywhere, `"\n"` otherwise.
pub fn detect_line_ending(content: &str) -> &'static str {
    if content.contains("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}

/// Restores `modified`'s trailing-newline state to match `original`'s,
/// regardless of how many trailing newlines `original` had.
pub fn restore_trailing_newline(original: &str, modified: &str) -> String {
    let had_trailing = original.ends_with('\n');
    let has_trailing = modified.ends_with('\n');
    match (had_trailing, has_trailing) {
        (true, false) => format!("{modified}\n"),
        (false, true) => modified.trim_end_matches('\n').to_string(),
        _ => modified.to_string(),
    }
}

/// Re-applies CRLF line endings to `content` (which is assumed to use `\n`
/// internally) when `line_ending` is `"\r\n"`.
pub fn apply_line_ending(content: &str, line_ending: &str) -> String {
    if line_ending == "\r\n" {
        content.replace('\n', "\r\n")
    } else {
        content.to_string()
    }
}

#[cfg(test)]
#[path = "file_ops.test.rs"]
mod tests;
