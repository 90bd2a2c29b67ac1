//! The `find` tool: glob-based path enumeration under the workspace.

use async_trait::async_trait;
use forge_error::ToolError;
use serde::Deserialize;

use crate::{ToolContext, ToolHandler, ToolOutput};

const MAX_RESULTS: usize = 1000;

#[derive(Debug, Deserialize)]
pub struct FindArgs {
    pub pattern: String,
    #[serde(default)]
    pub path: Option<String>,
}

pub struct FindTool;

#[async_trait]
impl ToolHandler for FindTool {
    fn name(&self) -> &'static str {
        "find"
    }

    fn description(&self) -> &'static str {
        "Lists file paths under a directory matching a glob pattern, e.g. `**/*.rs`."
    }

    fn input_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "pattern": {"type": "string"},
                "path": {"type": "string"}
            },
            "required": ["pattern"]
        })
    }

    async fn execute(&self, input: serde_json::Value, ctx: ToolContext) -> Result<ToolOutput, ToolError> {
        let args: FindArgs = serde_json::from_value(input).map_err(|e| ToolError::new(format!("invalid arguments: {e}")))?;
        let root = match &args.path {
            Some(p) => ctx.resolve(p)?,
            None => ctx.cwd.clone(),
        };
        let glob = globset::Glob::new(&args.pattern)
            .map_err(|e| ToolError::new(format!("invalid pattern: {e}")))?
            .compile_matcher();

        let mut found = Vec::new();
        for entry in ignore::WalkBuilder::new(&root).hidden(false).build() {
            if found.len() >= MAX_RESULTS {
                break;
            }
            let Ok(entry) = entry else { continue };
            let rel = entry.path().strip_prefix(&root).unwrap_or(entry.path());
            if glob.is_match(rel) {
                found.push(entry.path().display().to_string());
            }
        }

        if found.is_empty() {
            return Ok(ToolOutput::text("No files matched."));
        }
        Ok(ToolOutput::text(found.join("\n")))
    }
}

#[cfg(test)]
#[path = "find.test.rs"]
mod tests;
