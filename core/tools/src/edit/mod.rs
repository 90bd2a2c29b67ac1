//! The `edit` tool: find-exactly-one-occurrence-and-replace, with fuzzy
//! fallback and line-ending/BOM preservation.

pub mod file_ops;
pub mod text_utils;

use async_trait::async_trait;
use forge_error::ToolError;
use serde::Deserialize;
use similar::TextDiff;

use crate::{ToolContext, ToolHandler, ToolOutput};
use file_ops::{apply_line_ending, detect_line_ending, restore_trailing_newline};
use text_utils::{exact_match_count, fuzzy_find_unique};

const BOM_BYTES: [u8; 3] = [0xEF, 0xBB, 0xBF];

#[derive(Debug, Deserialize)]
pub struct EditArgs {
    pub path: String,
    pub old_text: String,
    pub new_text: String,
}

pub struct EditTool;

#[async_trait]
impl ToolHandler for EditTool {
    fn name(&self) -> &'static str {
        "edit"
    }

    fn description(&self) -> &'static str {
        "Replaces one exact occurrence of oldText with newText in an existing file. oldText must match exactly once; read the file first."
    }

    fn input_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {"type": "string"},
                "old_text": {"type": "string"},
                "new_text": {"type": "string"}
            },
            "required": ["path", "old_text", "new_text"]
        })
    }

    async fn execute(&self, input: serde_json::Value, ctx: ToolContext) -> Result<ToolOutput, ToolError> {
        let args: EditArgs = serde_json::from_value(input).map_err(|e| ToolError::new(format!("invalid arguments: {e}")))?;
        let path = ctx.resolve(&args.path)?;

        let raw_bytes = ctx.runtime.read_file(&path).await?;
        let had_bom = raw_bytes.starts_with(&BOM_BYTES);
        let body = if had_bom { &raw_bytes[3..] } else { &raw_bytes[..] };
        let original = String::from_utf8_lossy(body).into_owned();

        let line_ending = detect_line_ending(&original);
        let working = original.replace("\r\n", "\n");
        let old = args.old_text.replace("\r\n", "\n");
        let new = args.new_text.replace("\r\n", "\n");

        let replaced = match exact_match_count(&working, &old) {
            0 => match fuzzy_find_unique(&working, &old) {
                Some(range) => format!("{}{}{}", &working[..range.start], new, &working[range.end..]),
                None => {
                    return Err(ToolError::new(format!(
                        "oldText was not found in {}",
                        path.display()
                    )))
                }
            },
            1 => working.replacen(&old, &new, 1),
            n => {
                return Err(ToolError::new(format!(
                    "oldText matches {n} times in {}; it must match exactly once",
                    path.display()
                )))
            }
        };

        let restored = restore_trailing_newline(&working, &replaced);
        let mut final_body = apply_line_ending(&restored, line_ending);
        if had_bom {
            let mut with_bom = String::from('\u{feff}');
            with_bom.push_str(&final_body);
            final_body = with_bom;
        }

        ctx.runtime.write_file(&path, final_body.as_bytes()).await?;

        let final_body_trimmed = final_body.trim_start_matches('\u{feff}');
        let diff = TextDiff::from_lines(original.as_str(), final_body_trimmed)
            .unified_diff()
            .context_radius(3)
            .header(&args.path, &args.path)
            .to_string();

        Ok(ToolOutput::text(diff))
    }
}

#[cfg(test)]
#[path = "mod.test.rs"]
mod tests;
