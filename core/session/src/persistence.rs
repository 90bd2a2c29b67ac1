//! Line-delimited JSON persistence for a session: one header line followed
//! by one entry per line, append-only.

use std::path::{Path, PathBuf};

use forge_error::SessionError;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt};
use tracing::warn;

use crate::entry::{SessionEntry, SessionHeader};
use crate::manager::SessionManager;

/// What loading a session file found: the manager rehydrated from whatever
/// entries parsed cleanly, plus how many trailing lines had to be dropped
/// because they were corrupt (a crash mid-append truncates the last
/// line, never an earlier one, since each append is a single atomic
/// `write`+`flush`).
pub struct LoadResult {
    pub manager: SessionManager,
    pub recovered_entries: usize,
    pub skipped_lines: usize,
}

pub async fn load(path: &Path) -> Result<LoadResult, SessionError> {
    let file = tokio::fs::File::open(path).await?;
    let mut lines = tokio::io::BufReader::new(file).lines();

    let header_line = lines
        .next_line()
        .await?
        .ok_or_else(|| SessionError::Corrupt { line: 0, message: "empty session file".to_string() })?;
    let header: SessionHeader = serde_json::from_str(&header_line)?;

    let mut entries = Vec::new();
    let mut skipped = 0usize;
    let mut line_no = 1usize;
    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<SessionEntry>(&line) {
            Ok(entry) => entries.push(entry),
            Err(err) => {
                warn!(line = line_no, error = %err, "skipping corrupt session line");
                skipped += 1;
            }
        }
    }

    let recovered_entries = entries.len();
    let manager = SessionManager::from_entries(header, entries);
    Ok(LoadResult { manager, recovered_entries, skipped_lines: skipped })
}

/// Writes a brand-new session file: header line followed by every entry
/// currently in `manager`.
pub async fn create(path: &Path, manager: &SessionManager) -> Result<(), SessionError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let mut file = tokio::fs::File::create(path).await?;
    write_line(&mut file, &manager.header).await?;
    for entry in manager.entries() {
        write_line(&mut file, entry).await?;
    }
    file.flush().await?;
    Ok(())
}

/// Appends one entry to an already-created session file.
pub async fn append_entry(path: &Path, entry: &SessionEntry) -> Result<(), SessionError> {
    let mut file = tokio::fs::OpenOptions::new().append(true).open(path).await?;
    write_line(&mut file, entry).await?;
    file.flush().await?;
    Ok(())
}

async fn write_line<T: serde::Serialize>(file: &mut tokio::fs::File, value: &T) -> Result<(), SessionError> {
    let mut line = serde_json::to_string(value)?;
    line.push('\n');
    file.write_all(line.as_bytes()).await?;
    Ok(())
}

pub fn default_session_path(session_dir: &Path, session_id: &str) -> PathBuf {
    session_dir.join(format!("{session_id}.jsonl"))
}

#[cfg(test)]
#[path = "persistence.test.rs"]
mod tests;
