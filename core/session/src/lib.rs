//! The session log: a content-addressed, append-only DAG of conversation
//! entries, persisted as line-delimited JSON.
//!
//! [`manager::SessionManager`] is the pure, in-memory half (DAG + replay);
//! [`persistence`] is the disk half (JSONL read/write/recovery).
//! [`PersistedSession`] wires the two together so that every append is
//! durably written before the in-memory view advances.

pub mod entry;
pub mod manager;
pub mod persistence;

use std::path::{Path, PathBuf};

use forge_error::SessionError;
use forge_message::Message;

pub use entry::{FileOperationDetails, SessionEntry, SessionEntryKind, SessionHeader};
pub use manager::{SessionContext, SessionManager};

/// A [`SessionManager`] bound to a file on disk: every `append_*` call
/// writes the new entry to the file before returning.
pub struct PersistedSession {
    manager: SessionManager,
    path: PathBuf,
}

impl PersistedSession {
    pub async fn create(path: impl Into<PathBuf>, cwd: impl Into<String>) -> Result<Self, SessionError> {
        let path = path.into();
        let manager = SessionManager::new(cwd);
        persistence::create(&path, &manager).await?;
        Ok(Self { manager, path })
    }

    pub async fn load(path: impl Into<PathBuf>) -> Result<(Self, usize, usize), SessionError> {
        let path = path.into();
        let result = persistence::load(&path).await?;
        Ok((Self { manager: result.manager, path }, result.recovered_entries, result.skipped_lines))
    }

    pub fn manager(&self) -> &SessionManager {
        &self.manager
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn append_message(&mut self, message: Message) -> Result<(), SessionError> {
        let entry = self.manager.append_message(message).clone();
        persistence::append_entry(&self.path, &entry).await
    }

    pub async fn append_model_change(&mut self, provider: impl Into<String>, model_id: impl Into<String>) -> Result<(), SessionError> {
        let entry = self.manager.append_model_change(provider, model_id).clone();
        persistence::append_entry(&self.path, &entry).await
    }

    pub async fn append_compaction(
        &mut self,
        summary: impl Into<String>,
        first_kept_entry_id: impl Into<String>,
        tokens_before: u64,
        details: Option<FileOperationDetails>,
    ) -> Result<(), SessionError> {
        let entry = self.manager.append_compaction(summary, first_kept_entry_id, tokens_before, details).clone();
        persistence::append_entry(&self.path, &entry).await
    }

    pub fn build_session_context(&self, leaf_id: Option<&str>) -> Result<SessionContext, SessionError> {
        self.manager.build_session_context(leaf_id)
    }

    /// Moves the leaf pointer without appending a new entry; nothing to
    /// persist since no new line is written.
    pub fn branch(&mut self, id: &str) -> Result<(), SessionError> {
        self.manager.branch(id)
    }

    pub async fn branch_with_summary(
        &mut self,
        from_id: &str,
        summary: impl Into<String>,
        details: Option<FileOperationDetails>,
    ) -> Result<(), SessionError> {
        let entry = self.manager.branch_with_summary(from_id, summary, details)?.clone();
        persistence::append_entry(&self.path, &entry).await
    }

    pub fn get_branch(&self, leaf_id: Option<&str>) -> Result<Vec<&SessionEntry>, SessionError> {
        self.manager.get_branch(leaf_id)
    }
}

#[cfg(test)]
#[path = "lib.test.rs"]
mod tests;
