//! The [`Runtime`] abstraction: a uniform shell-exec and filesystem surface
//! that the tool set is built on. The agent loop and tools never talk to
//! `std::fs` or `tokio::process` directly — they go through a `Runtime` so
//! that a local host, a managed sandbox, or an in-browser virtual
//! filesystem can all sit behind the same contract.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use forge_error::ToolError;
use tokio::io::AsyncReadExt;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub mod local;

pub use local::LocalRuntime;

/// A sink a long-running `exec` call reports incremental output chunks
/// through as they arrive, rather than only once at completion. Plain
/// `Fn`, not `async fn`, so it can be invoked from inside the byte-reading
/// loop without an executor handle; callers that need to forward a chunk
/// onward across an async boundary do so with a non-blocking send.
pub type PartialSink = Arc<dyn Fn(String) + Send + Sync>;

/// Options governing a single `exec` call.
#[derive(Clone, Default)]
pub struct ExecOptions {
    pub cwd: Option<PathBuf>,
    pub timeout_seconds: Option<u64>,
    pub cancel: Option<CancellationToken>,
    pub on_chunk: Option<PartialSink>,
}

impl std::fmt::Debug for ExecOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecOptions")
            .field("cwd", &self.cwd)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("cancel", &self.cancel)
            .field("on_chunk", &self.on_chunk.is_some())
            .finish()
    }
}

/// Result of running a shell command to completion, abortion, or timeout.
#[derive(Debug, Clone)]
pub struct ExecResult {
    pub output: String,
    pub exit_code: Option<i32>,
    pub truncated: bool,
    pub full_output_ref: Option<PathBuf>,
    pub aborted: bool,
    pub timed_out: bool,
}

impl ExecResult {
    pub fn success(&self) -> bool {
        !self.aborted && !self.timed_out && self.exit_code == Some(0)
    }
}

#[derive(Debug, Clone)]
pub struct DirEntryInfo {
    pub name: String,
    pub is_dir: bool,
}

#[derive(Debug, Clone)]
pub struct FileStat {
    pub is_dir: bool,
    pub is_file: bool,
    pub len: u64,
}

/// Uniform exec + filesystem surface. Implementations: [`LocalRuntime`]
/// (native process + filesystem). A sandboxed or in-browser runtime can
/// implement the same trait without the agent loop or tool set changing.
#[async_trait]
pub trait Runtime: Send + Sync {
    async fn exec(&self, command: &str, opts: ExecOptions) -> Result<ExecResult, ToolError>;

    async fn read_file(&self, path: &Path) -> Result<Vec<u8>, ToolError>;
    async fn write_file(&self, path: &Path, content: &[u8]) -> Result<(), ToolError>;
    async fn mkdir(&self, path: &Path, recursive: bool) -> Result<(), ToolError>;
    async fn readdir(&self, path: &Path) -> Result<Vec<DirEntryInfo>, ToolError>;
    async fn stat(&self, path: &Path) -> Result<FileStat, ToolError>;
    async fn exists(&self, path: &Path) -> bool;
    async fn remove_file(&self, path: &Path) -> Result<(), ToolError>;
    async fn rename(&self, from: &Path, to: &Path) -> Result<(), ToolError>;
    async fn remove_dir(&self, path: &Path, recursive: bool) -> Result<(), ToolError>;

    fn home_dir(&self) -> PathBuf;
    fn root_dir(&self) -> PathBuf;

    /// Expands `~`, resolves relative paths against `cwd`, and rejects
    /// paths that would escape a sandboxed root (when the runtime enforces
    /// one). Local/unsandboxed runtimes never reject on escape.
    fn resolve_workspace_path(&self, raw: &str, cwd: &Path) -> Result<PathBuf, ToolError>;
}

/// Drains at most `limit` bytes of a child process stream, reporting
/// whether the stream had more to give. Each chunk read is also forwarded
/// to `on_chunk`, if given, before it counts against `limit` — a caller
/// watching for progress sees everything the process wrote, even the
/// tail that gets truncated out of the final captured output.
pub(crate) async fn read_capped<R: tokio::io::AsyncRead + Unpin>(
    reader: &mut R,
    limit: usize,
    on_chunk: Option<&PartialSink>,
) -> std::io::Result<(Vec<u8>, bool)> {
    let mut buf = Vec::with_capacity(limit.min(64 * 1024));
    let mut chunk = [0u8; 8192];
    loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            return Ok((buf, false));
        }
        if let Some(sink) = on_chunk {
            sink(String::from_utf8_lossy(&chunk[..n]).into_owned());
        }
        if buf.len() + n > limit {
            let remaining = limit - buf.len();
            buf.extend_from_slice(&chunk[..remaining]);
            debug!(limit, "exec output truncated");
            return Ok((buf, true));
        }
        buf.extend_from_slice(&chunk[..n]);
    }
}

pub(crate) fn stdio_piped() -> Stdio {
    Stdio::piped()
}

pub(crate) const DEFAULT_EXEC_TIMEOUT: Duration = Duration::from_secs(120);

#[cfg(test)]
#[path = "lib.test.rs"]
mod tests;
