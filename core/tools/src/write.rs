//! The `write` tool: creates or overwrites a file, making parent
//! directories as needed.

use async_trait::async_trait;
use forge_error::ToolError;
use serde::Deserialize;

use crate::{ToolContext, ToolHandler, ToolOutput};

#[derive(Debug, Deserialize)]
pub struct WriteArgs {
    pub path: String,
    pub content: String,
}

pub struct WriteTool;

#[async_trait]
impl ToolHandler for WriteTool {
    fn name(&self) -> &'static str {
        "write"
    }

    fn description(&self) -> &'static str {
        "Creates a new file or overwrites an existing one with the given content. Prefer `edit` for modifying existing files."
    }

    fn input_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {"type": "string"},
                "content": {"type": "string"}
            },
            "required": ["path", "content"]
        })
    }

    async fn execute(&self, input: serde_json::Value, ctx: ToolContext) -> Result<ToolOutput, ToolError> {
        let args: WriteArgs = serde_json::from_value(input).map_err(|e| ToolError::new(format!("invalid arguments: {e}")))?;
        let path = ctx.resolve(&args.path)?;
        ctx.runtime.write_file(&path, args.content.as_bytes()).await?;
        Ok(ToolOutput::text(format!("Wrote {} bytes to {}", args.content.len(), path.display())))
    }
}

#[cfg(test)]
#[path = "write.test.rs"]
mod tests;
