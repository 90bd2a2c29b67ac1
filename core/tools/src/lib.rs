//! The canonical tool set: typed, uniform wrappers around a [`Runtime`]
//! that the agent loop can dispatch model tool-calls to.
//!
//! Every tool shares one contract — a name, a description, a JSON-Schema
//! input shape, and an `execute` that either produces content parts or a
//! [`ToolError`] whose message is exactly what gets shown back to the
//! model. None of the tools talk to the filesystem or a shell directly;
//! they all go through the injected [`Runtime`], which is what lets the
//! same tool set run against a local host or a sandbox unmodified.

pub mod bash;
pub mod edit;
pub mod find;
pub mod grep;
pub mod ls;
pub mod read;
pub mod registry;
pub mod write;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use forge_error::ToolError;
use forge_runtime::{PartialSink, Runtime};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

pub use registry::ToolRegistry;

/// One piece of output a tool execution produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ToolContentPart {
    Text { text: String },
    Image { base64: String, mime_type: String },
}

/// The successful result of a tool call.
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    pub content: Vec<ToolContentPart>,
    pub details: Option<serde_json::Value>,
}

impl ToolOutput {
    pub fn text(text: impl Into<String>) -> Self {
        Self { content: vec![ToolContentPart::Text { text: text.into() }], details: None }
    }

    /// Concatenates all text parts; used by callers (and tests) that only
    /// care about the textual result.
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .filter_map(|p| match p {
                ToolContentPart::Text { text } => Some(text.as_str()),
                ToolContentPart::Image { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }
}

/// Everything a tool needs beyond its parsed input: the runtime it runs
/// against, the working directory to resolve relative paths against, the
/// id of the tool call it is servicing, a sink for reporting incremental
/// output before the call finishes (`on_partial` — unset when nothing is
/// subscribed to partial results), and the cancellation signal shared
/// with the rest of the turn.
#[derive(Clone)]
pub struct ToolContext {
    pub runtime: Arc<dyn Runtime>,
    pub cwd: PathBuf,
    pub tool_call_id: String,
    pub cancel: CancellationToken,
    pub on_partial: Option<PartialSink>,
}

impl ToolContext {
    pub fn resolve(&self, raw_path: &str) -> Result<PathBuf, ToolError> {
        self.runtime.resolve_workspace_path(raw_path, &self.cwd)
    }

    /// Reports incremental output for a long-running tool call. A no-op
    /// when no subscriber asked for partial results.
    pub fn emit_partial(&self, text: impl Into<String>) {
        if let Some(sink) = &self.on_partial {
            sink(text.into());
        }
    }
}

/// A tool the agent loop can offer to the model and dispatch calls to.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn input_schema(&self) -> serde_json::Value;
    async fn execute(&self, input: serde_json::Value, ctx: ToolContext) -> Result<ToolOutput, ToolError>;
}

#[cfg(test)]
#[path = "lib.test.rs"]
mod tests;
