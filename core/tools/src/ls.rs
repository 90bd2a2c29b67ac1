//! The `ls` tool: a single directory's immediate entries, file/dir marked.

use async_trait::async_trait;
use forge_error::ToolError;
use serde::Deserialize;

use crate::{ToolContext, ToolHandler, ToolOutput};

#[derive(Debug, Deserialize)]
pub struct LsArgs {
    pub path: String,
}

pub struct LsTool;

#[async_trait]
impl ToolHandler for LsTool {
    fn name(&self) -> &'static str {
        "ls"
    }

    fn description(&self) -> &'static str {
        "Lists the immediate entries of a directory."
    }

    fn input_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {"type": "string"}
            },
            "required": ["path"]
        })
    }

    async fn execute(&self, input: serde_json::Value, ctx: ToolContext) -> Result<ToolOutput, ToolError> {
        let args: LsArgs = serde_json::from_value(input).map_err(|e| ToolError::new(format!("invalid arguments: {e}")))?;
        let path = ctx.resolve(&args.path)?;
        let mut entries = ctx.runtime.readdir(&path).await?;
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        let rendered = entries
            .iter()
            .map(|e| if e.is_dir { format!("{}/", e.name) } else { e.name.clone() })
            .collect::<Vec<_>>()
            .join("\n");

        if rendered.is_empty() {
            return Ok(ToolOutput::text("(empty directory)"));
        }
        Ok(ToolOutput::text(rendered))
    }
}

#[cfg(test)]
#[path = "ls.test.rs"]
mod tests;
