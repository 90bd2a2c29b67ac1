//! The `grep` tool: regex content search over the workspace, honoring
//! `.gitignore`-style exclusions the way the rest of the toolchain does.

use async_trait::async_trait;
use forge_error::ToolError;
use grep_regex::RegexMatcher;
use grep_searcher::sinks::UTF8;
use grep_searcher::Searcher;
use serde::Deserialize;

use crate::{ToolContext, ToolHandler, ToolOutput};

const MAX_MATCHES: usize = 500;

#[derive(Debug, Deserialize)]
pub struct GrepArgs {
    pub pattern: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub glob: Option<String>,
}

pub struct GrepTool;

#[async_trait]
impl ToolHandler for GrepTool {
    fn name(&self) -> &'static str {
        "grep"
    }

    fn description(&self) -> &'static str {
        "Searches file contents for a regular expression under a directory, optionally restricted to files matching a glob."
    }

    fn input_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "pattern": {"type": "string"},
                "path": {"type": "string"},
                "glob": {"type": "string"}
            },
            "required": ["pattern"]
        })
    }

    async fn execute(&self, input: serde_json::Value, ctx: ToolContext) -> Result<ToolOutput, ToolError> {
        let args: GrepArgs = serde_json::from_value(input).map_err(|e| ToolError::new(format!("invalid arguments: {e}")))?;
        let root = match &args.path {
            Some(p) => ctx.resolve(p)?,
            None => ctx.cwd.clone(),
        };

        let matcher = RegexMatcher::new(&args.pattern).map_err(|e| ToolError::new(format!("invalid pattern: {e}")))?;
        let glob = args
            .glob
            .as_deref()
            .map(|g| globset::Glob::new(g).map(|g| g.compile_matcher()))
            .transpose()
            .map_err(|e| ToolError::new(format!("invalid glob: {e}")))?;

        let mut matches: Vec<String> = Vec::new();
        for entry in ignore::WalkBuilder::new(&root).hidden(false).build() {
            if matches.len() >= MAX_MATCHES {
                break;
            }
            let Ok(entry) = entry else { continue };
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            if let Some(glob) = &glob {
                if !glob.is_match(entry.path()) {
                    continue;
                }
            }
            let path = entry.path().to_path_buf();
            let mut searcher = Searcher::new();
            let _ = searcher.search_path(
                &matcher,
                &path,
                UTF8(|line_num, line| {
                    if matches.len() < MAX_MATCHES {
                        matches.push(format!("{}:{}:{}", path.display(), line_num, line.trim_end()));
                    }
                    Ok(matches.len() < MAX_MATCHES)
                }),
            );
        }

        if matches.is_empty() {
            return Ok(ToolOutput::text("No matches found."));
        }
        Ok(ToolOutput::text(matches.join("\n")))
    }
}

#[cfg(test)]
#[path = "grep.test.rs"]
mod tests;
