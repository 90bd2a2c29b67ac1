//! [`SessionManager`]: an in-memory arena over the session DAG, with a
//! current-leaf pointer, append/branch operations, and replay into a
//! linear message view.

use std::collections::HashMap;

use forge_error::SessionError;
use forge_message::{factory::synthetic_summary_message, Message};
use ulid::Ulid;

use crate::entry::{FileOperationDetails, SessionEntry, SessionEntryKind, SessionHeader};

fn new_id() -> String {
    Ulid::new().to_string()
}

/// The replayed view of a branch: the linear message list a model call
/// sees, plus whichever model the branch's latest `model_change` selected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionContext {
    pub messages: Vec<Message>,
    pub model: Option<(String, String)>,
}

/// Arena-backed session DAG. `entries` is append-only; `id_index` gives
/// O(1) id-to-index lookup; `leaf` is the id of the most recently appended
/// entry or branch target.
pub struct SessionManager {
    pub header: SessionHeader,
    entries: Vec<SessionEntry>,
    id_index: HashMap<String, usize>,
    leaf: Option<String>,
}

impl SessionManager {
    pub fn new(cwd: impl Into<String>) -> Self {
        Self::with_header(SessionHeader::new(new_id(), cwd.into()))
    }

    pub fn with_header(header: SessionHeader) -> Self {
        Self { header, entries: Vec::new(), id_index: HashMap::new(), leaf: None }
    }

    /// Rehydrates a manager from entries already loaded from disk (used by
    /// [`crate::persistence::load`]).
    pub fn from_entries(header: SessionHeader, entries: Vec<SessionEntry>) -> Self {
        let mut manager = Self::with_header(header);
        for entry in entries {
            manager.insert(entry);
        }
        manager
    }

    fn insert(&mut self, entry: SessionEntry) {
        let id = entry.id.clone();
        self.id_index.insert(id.clone(), self.entries.len());
        self.entries.push(entry);
        self.leaf = Some(id);
    }

    pub fn leaf(&self) -> Option<&str> {
        self.leaf.as_deref()
    }

    pub fn entries(&self) -> &[SessionEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&SessionEntry> {
        self.id_index.get(id).map(|&i| &self.entries[i])
    }

    fn append(&mut self, kind: SessionEntryKind) -> &SessionEntry {
        let entry = SessionEntry { id: new_id(), parent_id: self.leaf.clone(), timestamp: chrono::Utc::now(), kind };
        self.insert(entry);
        self.entries.last().expect("just inserted")
    }

    pub fn append_message(&mut self, message: Message) -> &SessionEntry {
        self.append(SessionEntryKind::Message { message })
    }

    pub fn append_model_change(&mut self, provider: impl Into<String>, model_id: impl Into<String>) -> &SessionEntry {
        self.append(SessionEntryKind::ModelChange { provider: provider.into(), model_id: model_id.into() })
    }

    pub fn append_compaction(
        &mut self,
        summary: impl Into<String>,
        first_kept_entry_id: impl Into<String>,
        tokens_before: u64,
        details: Option<FileOperationDetails>,
    ) -> &SessionEntry {
        self.append(SessionEntryKind::Compaction {
            summary: summary.into(),
            first_kept_entry_id: first_kept_entry_id.into(),
            tokens_before,
            details,
        })
    }

    /// Moves the leaf pointer to `id` without appending a new entry.
    pub fn branch(&mut self, id: &str) -> Result<(), SessionError> {
        if !self.id_index.contains_key(id) {
            return Err(SessionError::UnknownEntry(id.to_string()));
        }
        self.leaf = Some(id.to_string());
        Ok(())
    }

    /// Appends a `branch_summary` entry pointing at `from_id` and advances
    /// the leaf to it — used when resuming from an older point in the
    /// branch while preserving what happened since, summarized.
    pub fn branch_with_summary(
        &mut self,
        from_id: &str,
        summary: impl Into<String>,
        details: Option<FileOperationDetails>,
    ) -> Result<&SessionEntry, SessionError> {
        if !self.id_index.contains_key(from_id) {
            return Err(SessionError::UnknownEntry(from_id.to_string()));
        }
        Ok(self.append(SessionEntryKind::BranchSummary { from_id: from_id.to_string(), summary: summary.into(), details }))
    }

    /// Walks `parent_id` from `leaf_id` (or the current leaf) back to the
    /// root, returning entries in root-to-leaf order.
    pub fn get_branch(&self, leaf_id: Option<&str>) -> Result<Vec<&SessionEntry>, SessionError> {
        let start = match leaf_id.or(self.leaf.as_deref()) {
            Some(id) => id,
            None => return Ok(Vec::new()),
        };
        let mut chain = Vec::new();
        let mut current = Some(start.to_string());
        while let Some(id) = current {
            let entry = self.get(&id).ok_or_else(|| SessionError::UnknownEntry(id.clone()))?;
            chain.push(entry);
            current = entry.parent_id.clone();
        }
        chain.reverse();
        Ok(chain)
    }

    /// Builds the linear message view a model call sees for the branch
    /// ending at `leaf_id`: the latest compaction (if any) collapses every
    /// earlier entry into a synthetic summary message; every
    /// `branch_summary` becomes a synthetic message in place; `model_change`
    /// entries are dropped from the message list but the latest one sets
    /// `model`.
    pub fn build_session_context(&self, leaf_id: Option<&str>) -> Result<SessionContext, SessionError> {
        let branch = self.get_branch(leaf_id)?;

        let last_compaction_index = branch.iter().rposition(|e| e.is_compaction());

        let mut model: Option<(String, String)> = None;
        let mut messages = Vec::new();

        if let Some(idx) = last_compaction_index {
            let SessionEntryKind::Compaction { summary, first_kept_entry_id, tokens_before, .. } = &branch[idx].kind else {
                unreachable!()
            };
            messages.push(synthetic_summary_message("compaction", summary, Some(*tokens_before)));

            let first_kept_index = branch
                .iter()
                .position(|e| &e.id == first_kept_entry_id)
                .unwrap_or(branch.len());

            for entry in &branch[first_kept_index..] {
                self.push_entry(entry, &mut messages, &mut model);
            }
        } else {
            for entry in &branch {
                self.push_entry(entry, &mut messages, &mut model);
            }
        }

        Ok(SessionContext { messages, model })
    }

    fn push_entry(&self, entry: &SessionEntry, messages: &mut Vec<Message>, model: &mut Option<(String, String)>) {
        match &entry.kind {
            SessionEntryKind::Message { message } => messages.push(message.clone()),
            SessionEntryKind::BranchSummary { summary, .. } => {
                messages.push(synthetic_summary_message("branch", summary, None));
            }
            SessionEntryKind::ModelChange { provider, model_id } => {
                *model = Some((provider.clone(), model_id.clone()));
            }
            SessionEntryKind::Compaction { .. } => {}
        }
    }
}

#[cfg(test)]
#[path = "manager.test.rs"]
mod tests;
