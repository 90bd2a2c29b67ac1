//! The compaction engine: when the conversation crosses a token threshold,
//! finds a safe cut point, asks the model to summarize everything before
//! it, and returns a result the session log can record as a new
//! `compaction` entry.
//!
//! Splitting the work into [`cut_point::prepare_compaction`] (pure,
//! synchronous, branch-structure-only) and [`summarize::compact`] (the one
//! part that makes a model call) keeps the cut-point logic unit-testable
//! without a model double.

pub mod cut_point;
pub mod file_ops;
pub mod settings;
pub mod summarize;
pub mod transcript;

use forge_error::CompactionError;
use forge_model::Model;
use forge_session::{FileOperationDetails, SessionEntry};

pub use cut_point::{prepare_compaction, CompactionPreparation};
pub use file_ops::FileOperations;
pub use settings::{CompactionConfig, CompactionMode, CompactionSettings};

#[derive(Debug, Clone, PartialEq)]
pub struct CompactionTelemetry {
    pub is_split_turn: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompactionResult {
    pub summary: String,
    pub first_kept_entry_id: String,
    pub tokens_before: u64,
    pub details: FileOperationDetails,
    pub telemetry: CompactionTelemetry,
}

/// Runs the full engine over a branch: finds a cut point and, if one
/// exists, asks `model` to summarize. Returns `Ok(None)` — never an error —
/// when there is nothing to do, matching the "no-op, not a failure" rule
/// for a missing cut point.
pub async fn run_compaction(
    branch: &[&SessionEntry],
    settings: &CompactionSettings,
    model: &dyn Model,
) -> Result<Option<CompactionResult>, CompactionError> {
    let Some(preparation) = prepare_compaction(branch, settings) else {
        return Ok(None);
    };
    let result = summarize::compact(preparation, model).await?;
    Ok(Some(result))
}

#[cfg(test)]
#[path = "lib.test.rs"]
mod tests;
