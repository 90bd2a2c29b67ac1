//! The abstract [`Model`] interface the agent loop is built against.
//!
//! This crate intentionally says nothing about any concrete provider's wire
//! protocol (HTTP framing, SSE parsing, auth headers) — that lives in a
//! provider-specific crate outside this core. What the agent loop needs is
//! a uniform way to send a conversation and tool definitions to *some*
//! model and get back either a finished message or a stream of parts.

pub mod testing;

use async_trait::async_trait;
use forge_message::{Message, StopReason, Usage};
use futures::future::BoxFuture;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// A tool made visible to the model for this request, rendered from a
/// [`forge_tools`]-style definition into the minimal shape a model needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

#[derive(Debug, Clone, Default)]
pub struct ModelRequest {
    pub messages: Vec<Message>,
    pub system_prompt: Option<String>,
    pub tools: Vec<ToolDefinition>,
    pub max_output_tokens: Option<u64>,
    pub cancel: Option<CancellationToken>,
}

/// One unit of a streamed model response. The agent loop consumes only
/// these five variants plus `Error`; `Finish` closes out the stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    TextDelta { text: String },
    ReasoningDelta { text: String, signature: Option<String> },
    ToolCall { id: String, name: String, arguments: serde_json::Value },
    ToolResult { tool_call_id: String, text: String },
    StepFinish { usage: Usage },
    Error { message: String },
    Finish { finish_reason: StopReason },
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerateResult {
    pub messages: Vec<Message>,
    pub finish_reason: StopReason,
    pub usage: Usage,
}

pub type PartStream = BoxStream<'static, Part>;

/// What `Model::stream` hands back: a live part stream plus a future that
/// resolves once the whole response (including any buffering the provider
/// does internally) is final. The agent loop's auto-persist and
/// auto-compact steps are attached to `response`, not to stream exhaustion,
/// so that a caller who drops the stream early still gets correct
/// persistence if they await `response`.
pub struct StreamHandle {
    pub full_stream: PartStream,
    pub response: BoxFuture<'static, Result<GenerateResult, ModelError>>,
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model transport error: {0}")]
    Transport(String),
    #[error("model request cancelled")]
    Cancelled,
}

#[async_trait]
pub trait Model: Send + Sync {
    async fn generate(&self, request: ModelRequest) -> Result<GenerateResult, ModelError>;
    async fn stream(&self, request: ModelRequest) -> Result<StreamHandle, ModelError>;

    fn provider(&self) -> &str;
    fn model_id(&self) -> &str;
}

#[cfg(test)]
#[path = "lib.test.rs"]
mod tests;
