//! Drives the model call(s) that turn a [`crate::CompactionPreparation`]
//! into a [`crate::CompactionResult`].

use forge_error::CompactionError;
use forge_message::Message;
use forge_model::{Model, ModelRequest};

use crate::cut_point::CompactionPreparation;
use crate::transcript::render_transcript;
use crate::{CompactionResult, CompactionTelemetry};

const SUMMARY_TEMPLATE: &str = "Summarize the preceding conversation for future reference. Follow this structure exactly:\n\
## Goal\n## Constraints & Preferences\n## Progress\n### Done\n### In Progress\n### Blocked\n## Key Decisions\n## Next Steps\n## Critical Context";

const SUMMARY_UPDATE_TEMPLATE: &str = "A prior summary of this conversation is given in <previous-summary>. Update it with the newer messages that follow, producing a single summary with this structure:\n\
## Goal\n## Constraints & Preferences\n## Progress\n### Done\n### In Progress\n### Blocked\n## Key Decisions\n## Next Steps\n## Critical Context";

const TURN_PREFIX_PROMPT: &str = "Summarize in one short paragraph what this partial, still-open turn was doing so far.";

pub async fn compact(
    preparation: CompactionPreparation,
    model: &dyn Model,
) -> Result<CompactionResult, CompactionError> {
    let transcript = render_transcript(&preparation.messages_to_summarize);

    let (system_prompt, user_text) = match &preparation.previous_summary {
        Some(previous) => (
            SUMMARY_UPDATE_TEMPLATE.to_string(),
            format!("<previous-summary>\n{previous}\n</previous-summary>\n\n{transcript}"),
        ),
        None => (SUMMARY_TEMPLATE.to_string(), transcript),
    };

    let max_output_tokens = (0.8 * preparation.reserve_tokens as f64) as u64;
    let request = ModelRequest {
        messages: vec![Message::user(user_text)],
        system_prompt: Some(system_prompt),
        tools: Vec::new(),
        max_output_tokens: Some(max_output_tokens),
        cancel: None,
    };

    let result = model.generate(request).await.map_err(|e| CompactionError::Model(e.to_string()))?;
    let mut summary = forge_message::type_guards::get_text_content(&result.messages[0]);

    if preparation.is_split_turn && !preparation.turn_prefix_messages.is_empty() {
        let prefix_transcript = render_transcript(&preparation.turn_prefix_messages);
        let prefix_request = ModelRequest {
            messages: vec![Message::user(prefix_transcript)],
            system_prompt: Some(TURN_PREFIX_PROMPT.to_string()),
            tools: Vec::new(),
            max_output_tokens: Some((0.5 * preparation.reserve_tokens as f64) as u64),
            cancel: None,
        };
        let prefix_result = model.generate(prefix_request).await.map_err(|e| CompactionError::Model(e.to_string()))?;
        let prefix_summary = forge_message::type_guards::get_text_content(&prefix_result.messages[0]);
        summary.push_str(&format!("\n\n---\n## Turn Context (split turn)\n{prefix_summary}"));
    }

    let details = preparation.file_ops.to_details();
    summary.push_str(&format!(
        "\n\n<read-files>\n{}\n</read-files>\n<modified-files>\n{}\n</modified-files>",
        details.read_files.join("\n"),
        details.modified_files.join("\n")
    ));

    Ok(CompactionResult {
        summary,
        first_kept_entry_id: preparation.first_kept_entry_id,
        tokens_before: preparation.tokens_before,
        details,
        telemetry: CompactionTelemetry { is_split_turn: preparation.is_split_turn },
    })
}

#[cfg(test)]
#[path = "summarize.test.rs"]
mod tests;
