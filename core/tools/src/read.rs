//! The `read` tool: text or image file contents, paginated.

use async_trait::async_trait;
use base64::Engine;
use forge_error::ToolError;
use serde::Deserialize;

use crate::{ToolContentPart, ToolContext, ToolHandler, ToolOutput};

const MAX_LINES: usize = 2000;
const MAX_BYTES: usize = 128 * 1024;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

#[derive(Debug, Deserialize)]
pub struct ReadArgs {
    pub path: String,
    #[serde(default)]
    pub offset: Option<usize>,
    #[serde(default)]
    pub limit: Option<usize>,
}

pub struct ReadTool;

#[async_trait]
impl ToolHandler for ReadTool {
    fn name(&self) -> &'static str {
        "read"
    }

    fn description(&self) -> &'static str {
        "Reads a text or image file. Supports pagination via offset/limit for large text files."
    }

    fn input_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {"type": "string"},
                "offset": {"type": "integer", "minimum": 1},
                "limit": {"type": "integer", "minimum": 1}
            },
            "required": ["path"]
        })
    }

    async fn execute(&self, input: serde_json::Value, ctx: ToolContext) -> Result<ToolOutput, ToolError> {
        let args: ReadArgs = serde_json::from_value(input).map_err(|e| ToolError::new(format!("invalid arguments: {e}")))?;
        let path = ctx.resolve(&args.path)?;

        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            if IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()) {
                let bytes = ctx.runtime.read_file(&path).await?;
                let mime_type = format!("image/{}", if ext.eq_ignore_ascii_case("jpg") { "jpeg" } else { &ext.to_lowercase() });
                let base64 = base64::engine::general_purpose::STANDARD.encode(&bytes);
                return Ok(ToolOutput { content: vec![ToolContentPart::Image { base64, mime_type }], details: None });
            }
        }

        let bytes = ctx.runtime.read_file(&path).await?;
        let text = String::from_utf8_lossy(&bytes);
        let lines: Vec<&str> = text.lines().collect();

        let start = args.offset.unwrap_or(1).max(1) - 1;
        let requested_limit = args.limit.unwrap_or(MAX_LINES).min(MAX_LINES);

        let mut selected = Vec::new();
        let mut byte_count = 0usize;
        let mut next_offset = None;
        for (i, line) in lines.iter().enumerate().skip(start) {
            if selected.len() >= requested_limit || byte_count >= MAX_BYTES {
                next_offset = Some(i + 1);
                break;
            }
            byte_count += line.len() + 1;
            selected.push(*line);
        }
        if next_offset.is_none() && start + selected.len() < lines.len() {
            next_offset = Some(start + selected.len() + 1);
        }

        let mut rendered = selected.join("\n");
        if let Some(next) = next_offset {
            rendered.push_str(&format!(
                "\n\n[truncated: {} more lines. Continue with offset={}.]",
                lines.len().saturating_sub(next - 1),
                next
            ));
        }

        Ok(ToolOutput::text(rendered))
    }
}

#[cfg(test)]
#[path = "read.test.rs"]
mod tests;
