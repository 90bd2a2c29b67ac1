//! Error taxonomy shared across the runtime crates.
//!
//! Each crate is free to define its own narrower error type at its own
//! boundary; [`AgentError`] is the top-level sum that the agent loop and the
//! CLI ultimately surface to callers.

use thiserror::Error;

/// Errors that can terminate or interrupt an agent run.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("model transport error: {0}")]
    Transport(String),

    #[error("tool execution failed: {0}")]
    Tool(#[from] ToolError),

    #[error("operation cancelled")]
    Cancelled,

    #[error("session error: {0}")]
    Session(#[from] SessionError),

    #[error("compaction error: {0}")]
    Compaction(#[from] CompactionError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

/// Error raised by a tool's `execute`. Its `Display` text is exactly what is
/// surfaced to the model as the tool result, so it must never leak internal
/// detail the model can't act on.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ToolError {
    pub message: String,
    #[source]
    pub cause: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ToolError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), cause: None }
    }

    pub fn with_cause(
        message: impl Into<String>,
        cause: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self { message: message.into(), cause: Some(Box::new(cause)) }
    }

    pub fn aborted() -> Self {
        Self::new("Operation aborted")
    }
}

impl From<std::io::Error> for ToolError {
    fn from(err: std::io::Error) -> Self {
        ToolError::with_cause(err.to_string(), err)
    }
}

/// Errors from the session log: malformed persisted state, or an append
/// that couldn't be durably written.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session file corrupt at line {line}: {message}")]
    Corrupt { line: usize, message: String },

    #[error("failed to write session entry: {0}")]
    Write(#[source] std::io::Error),

    #[error("entry {0} not found on this branch")]
    UnknownEntry(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

/// Errors from the compaction engine. A `null` preparation result (nothing
/// to summarize) is not an error — only failures that prevented a requested
/// compaction from completing are represented here.
#[derive(Debug, Error)]
pub enum CompactionError {
    #[error("no valid cut point on this branch")]
    NoCutPoint,

    #[error("compaction model call failed: {0}")]
    Model(String),

    #[error("compaction aborted")]
    Aborted,
}

pub type Result<T> = std::result::Result<T, AgentError>;
