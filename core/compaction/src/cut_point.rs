//! Cut-point selection: where on a branch a compaction may safely split
//! "summarize this" from "keep this verbatim".

use forge_message::Message;
use forge_session::{SessionEntry, SessionEntryKind};

use crate::file_ops::FileOperations;
use crate::settings::CompactionSettings;

/// Everything [`crate::compact`] needs to produce a [`crate::CompactionResult`].
pub struct CompactionPreparation {
    pub messages_to_summarize: Vec<Message>,
    pub turn_prefix_messages: Vec<Message>,
    pub is_split_turn: bool,
    pub first_kept_entry_id: String,
    pub tokens_before: u64,
    pub previous_summary: Option<String>,
    pub file_ops: FileOperations,
    pub reserve_tokens: u64,
}

fn entry_tokens(entry: &SessionEntry) -> u64 {
    match &entry.kind {
        SessionEntryKind::Message { message } => forge_tokens::estimate_tokens(message),
        SessionEntryKind::BranchSummary { summary, .. } => forge_tokens::estimate_tokens(&Message::user(summary.clone())),
        SessionEntryKind::Compaction { .. } | SessionEntryKind::ModelChange { .. } => 0,
    }
}

fn is_valid_cut_point(entry: &SessionEntry) -> bool {
    match &entry.kind {
        SessionEntryKind::Message { message } => message.is_user() || message.is_assistant(),
        SessionEntryKind::BranchSummary { .. } => true,
        _ => false,
    }
}

fn is_user_message_entry(entry: &SessionEntry) -> bool {
    matches!(&entry.kind, SessionEntryKind::Message { message } if message.is_user())
}

/// Runs the cut-point algorithm over a whole branch (root-to-leaf order, as
/// returned by [`forge_session::SessionManager::get_branch`]). Returns
/// `None` when the tail is already a compaction, there is nothing to
/// summarize, or no valid cut point exists.
pub fn prepare_compaction(branch: &[&SessionEntry], settings: &CompactionSettings) -> Option<CompactionPreparation> {
    if branch.last().is_some_and(|e| e.is_compaction()) {
        return None;
    }

    let prev_comp_index = branch.iter().rposition(|e| e.is_compaction());
    let region_start = prev_comp_index.map(|i| i + 1).unwrap_or(0);
    if region_start >= branch.len() {
        return None;
    }

    let previous_summary = prev_comp_index.and_then(|i| match &branch[i].kind {
        SessionEntryKind::Compaction { summary, .. } => Some(summary.clone()),
        _ => None,
    });
    let previous_details = prev_comp_index.and_then(|i| match &branch[i].kind {
        SessionEntryKind::Compaction { details, .. } => details.as_ref(),
        _ => None,
    });

    let tokens_before: u64 = branch[region_start..].iter().map(|e| entry_tokens(e)).sum();

    // Walk backward from the newest entry accumulating tokens; once the
    // accumulation reaches `keep_recent_tokens`, the first valid cut point
    // at or after that position is the candidate.
    let mut accumulated = 0u64;
    let mut candidate = None;
    for i in (region_start..branch.len()).rev() {
        accumulated += entry_tokens(branch[i]);
        if accumulated >= settings.keep_recent_tokens {
            candidate = Some(i);
            break;
        }
    }
    let search_start = candidate.unwrap_or(region_start);

    let mut cut_index = None;
    for i in search_start..branch.len() {
        if is_valid_cut_point(branch[i]) {
            cut_index = Some(i);
            break;
        }
    }
    let mut cut_index = cut_index?;
    if cut_index <= region_start {
        return None;
    }

    // Back off: glue a preceding branch_summary/model_change entry to the
    // kept side rather than leaving it dangling at the tail of the
    // summarized region.
    while cut_index > region_start {
        let preceding = branch[cut_index - 1];
        let preceding_is_message_or_compaction =
            matches!(&preceding.kind, SessionEntryKind::Message { .. } | SessionEntryKind::Compaction { .. });
        if preceding_is_message_or_compaction {
            break;
        }
        cut_index -= 1;
    }
    if cut_index <= region_start {
        return None;
    }

    let is_split_turn = !is_user_message_entry(branch[cut_index]);
    let turn_start_index = if is_split_turn {
        (region_start..cut_index).rev().find(|&i| is_user_message_entry(branch[i])).unwrap_or(region_start)
    } else {
        cut_index
    };

    let mut file_ops = FileOperations::seed_from(previous_details);
    let mut messages_to_summarize = Vec::new();
    let mut turn_prefix_messages = Vec::new();

    for (i, entry) in branch[region_start..cut_index].iter().enumerate() {
        let absolute_index = region_start + i;
        if let SessionEntryKind::Message { message } = &entry.kind {
            file_ops.observe(message);
            if is_split_turn && absolute_index >= turn_start_index {
                turn_prefix_messages.push(message.clone());
            } else {
                messages_to_summarize.push(message.clone());
            }
        }
    }

    Some(CompactionPreparation {
        messages_to_summarize,
        turn_prefix_messages,
        is_split_turn,
        first_kept_entry_id: branch[cut_index].id.clone(),
        tokens_before,
        previous_summary,
        file_ops,
        reserve_tokens: settings.reserve_tokens,
    })
}

#[cfg(test)]
#[path = "cut_point.test.rs"]
mod tests;
