//! The `bash` tool: runs a shell command through the runtime, with a
//! caller-selectable timeout, the runtime's own output-capping, and
//! incremental output forwarded through the tool context's partial sink
//! as the command produces it.

use async_trait::async_trait;
use forge_error::ToolError;
use forge_runtime::ExecOptions;
use serde::Deserialize;

use crate::{ToolContext, ToolHandler, ToolOutput};

#[derive(Debug, Deserialize)]
pub struct BashArgs {
    pub command: String,
    #[serde(default)]
    pub timeout: Option<u64>,
}

pub struct BashTool;

#[async_trait]
impl ToolHandler for BashTool {
    fn name(&self) -> &'static str {
        "bash"
    }

    fn description(&self) -> &'static str {
        "Runs a shell command and returns its combined stdout/stderr. Prefer grep/find/ls for search and listing."
    }

    fn input_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "command": {"type": "string"},
                "timeout": {"type": "integer", "minimum": 1}
            },
            "required": ["command"]
        })
    }

    async fn execute(&self, input: serde_json::Value, ctx: ToolContext) -> Result<ToolOutput, ToolError> {
        let args: BashArgs = serde_json::from_value(input).map_err(|e| ToolError::new(format!("invalid arguments: {e}")))?;

        let result = ctx
            .runtime
            .exec(
                &args.command,
                ExecOptions {
                    cwd: Some(ctx.cwd.clone()),
                    timeout_seconds: args.timeout,
                    cancel: Some(ctx.cancel.clone()),
                    on_chunk: ctx.on_partial.clone(),
                },
            )
            .await?;

        if result.aborted {
            return Err(ToolError::aborted());
        }
        if result.timed_out {
            return Err(ToolError::new(format!("command timed out after {:?}", args.timeout)));
        }

        let mut text = result.output;
        if result.truncated {
            if let Some(path) = &result.full_output_ref {
                text.push_str(&format!("\n\n[output truncated; full output at {}]", path.display()));
            }
        }
        if result.exit_code != Some(0) {
            return Err(ToolError::new(format!(
                "command exited with status {:?}\n{}",
                result.exit_code, text
            )));
        }

        Ok(ToolOutput::text(text))
    }
}

#[cfg(test)]
#[path = "bash.test.rs"]
mod tests;
