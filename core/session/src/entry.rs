//! The session log's entry types: the nodes of the append-only DAG.

use chrono::{DateTime, Utc};
use forge_message::Message;
use serde::{Deserialize, Serialize};

/// Files a compaction or branch summary observed being read/written across
/// the region it summarized. Seeded from the previous summary's details
/// when a later compaction extends an earlier one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileOperationDetails {
    #[serde(default)]
    pub read_files: Vec<String>,
    #[serde(default)]
    pub modified_files: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEntryKind {
    Message {
        message: Message,
    },
    ModelChange {
        provider: String,
        #[serde(rename = "modelId")]
        model_id: String,
    },
    Compaction {
        summary: String,
        #[serde(rename = "firstKeptEntryId")]
        first_kept_entry_id: String,
        #[serde(rename = "tokensBefore")]
        tokens_before: u64,
        #[serde(default)]
        details: Option<FileOperationDetails>,
    },
    BranchSummary {
        #[serde(rename = "fromId")]
        from_id: String,
        summary: String,
        #[serde(default)]
        details: Option<FileOperationDetails>,
    },
}

/// One immutable node in the session DAG.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionEntry {
    pub id: String,
    #[serde(rename = "parentId")]
    pub parent_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: SessionEntryKind,
}

impl SessionEntry {
    pub fn is_message(&self) -> bool {
        matches!(self.kind, SessionEntryKind::Message { .. })
    }

    pub fn is_compaction(&self) -> bool {
        matches!(self.kind, SessionEntryKind::Compaction { .. })
    }

    pub fn is_branch_summary(&self) -> bool {
        matches!(self.kind, SessionEntryKind::BranchSummary { .. })
    }

    pub fn is_model_change(&self) -> bool {
        matches!(self.kind, SessionEntryKind::ModelChange { .. })
    }

    pub fn as_message(&self) -> Option<&Message> {
        match &self.kind {
            SessionEntryKind::Message { message } => Some(message),
            _ => None,
        }
    }
}

/// The one header line written at the start of every session file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionHeader {
    #[serde(rename = "type")]
    pub kind: String,
    pub version: u32,
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub cwd: String,
}

pub const SESSION_FORMAT_VERSION: u32 = 3;

impl SessionHeader {
    pub fn new(id: String, cwd: String) -> Self {
        Self { kind: "session".to_string(), version: SESSION_FORMAT_VERSION, id, timestamp: Utc::now(), cwd }
    }
}

#[cfg(test)]
#[path = "entry.test.rs"]
mod tests;
