//! [`LocalRuntime`]: the host's native process table and filesystem.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use forge_error::ToolError;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::{
    read_capped, stdio_piped, DirEntryInfo, ExecOptions, ExecResult, FileStat, Runtime,
    DEFAULT_EXEC_TIMEOUT,
};

/// Output captured from an `exec` call beyond this many bytes is spilled to
/// a sidecar temp file instead of being held in memory or sent to the model.
const MAX_CAPTURED_OUTPUT_BYTES: usize = 64 * 1024;

/// Runs commands as real child processes and touches the real filesystem,
/// optionally rooted at a sandbox directory that `resolve_workspace_path`
/// refuses to let callers escape.
pub struct LocalRuntime {
    sandbox_root: Option<PathBuf>,
}

impl LocalRuntime {
    pub fn new() -> Self {
        Self { sandbox_root: None }
    }

    /// Confines `resolve_workspace_path` to `root`: any path that would
    /// normalize outside of it is rejected.
    pub fn sandboxed(root: impl Into<PathBuf>) -> Self {
        Self { sandbox_root: Some(root.into()) }
    }
}

impl Default for LocalRuntime {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Runtime for LocalRuntime {
    async fn exec(&self, command: &str, opts: ExecOptions) -> Result<ExecResult, ToolError> {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        if let Some(cwd) = &opts.cwd {
            cmd.current_dir(cwd);
        }
        cmd.stdout(stdio_piped());
        cmd.stderr(stdio_piped());
        cmd.stdin(std::process::Stdio::null());

        let mut child = cmd.spawn().map_err(ToolError::from)?;
        let mut stdout = child.stdout.take().expect("piped stdout");
        let mut stderr = child.stderr.take().expect("piped stderr");

        let timeout = opts
            .timeout_seconds
            .map(std::time::Duration::from_secs)
            .unwrap_or(DEFAULT_EXEC_TIMEOUT);

        let on_chunk = opts.on_chunk.clone();
        let run = async {
            let (out_bytes, out_truncated) = read_capped(&mut stdout, MAX_CAPTURED_OUTPUT_BYTES, on_chunk.as_ref()).await?;
            let (err_bytes, err_truncated) = read_capped(&mut stderr, MAX_CAPTURED_OUTPUT_BYTES, on_chunk.as_ref()).await?;
            let status = child.wait().await?;
            Ok::<_, std::io::Error>((out_bytes, out_truncated, err_bytes, err_truncated, status))
        };

        let cancel = opts.cancel.clone();
        tokio::select! {
            result = run => {
                let (out_bytes, out_truncated, err_bytes, err_truncated, status) = result.map_err(ToolError::from)?;
                let truncated = out_truncated || err_truncated;
                let mut output = String::from_utf8_lossy(&out_bytes).into_owned();
                if !err_bytes.is_empty() {
                    output.push_str(&String::from_utf8_lossy(&err_bytes));
                }
                let full_output_ref = if truncated {
                    Some(spill_to_tempfile(&output)?)
                } else {
                    None
                };
                Ok(ExecResult {
                    output,
                    exit_code: status.code(),
                    truncated,
                    full_output_ref,
                    aborted: false,
                    timed_out: false,
                })
            }
            _ = tokio::time::sleep(timeout) => {
                warn!(command, timeout_seconds = timeout.as_secs(), "exec timed out, killing child");
                let _ = child.start_kill();
                Ok(ExecResult { output: String::new(), exit_code: None, truncated: false, full_output_ref: None, aborted: false, timed_out: true })
            }
            _ = cancelled(&cancel) => {
                debug!(command, "exec cancelled");
                let _ = child.start_kill();
                Ok(ExecResult { output: String::new(), exit_code: None, truncated: false, full_output_ref: None, aborted: true, timed_out: false })
            }
        }
    }

    async fn read_file(&self, path: &Path) -> Result<Vec<u8>, ToolError> {
        tokio::fs::read(path).await.map_err(ToolError::from)
    }

    async fn write_file(&self, path: &Path, content: &[u8]) -> Result<(), ToolError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(ToolError::from)?;
        }
        tokio::fs::write(path, content).await.map_err(ToolError::from)
    }

    async fn mkdir(&self, path: &Path, recursive: bool) -> Result<(), ToolError> {
        if recursive {
            tokio::fs::create_dir_all(path).await.map_err(ToolError::from)
        } else {
            tokio::fs::create_dir(path).await.map_err(ToolError::from)
        }
    }

    async fn readdir(&self, path: &Path) -> Result<Vec<DirEntryInfo>, ToolError> {
        let mut entries = tokio::fs::read_dir(path).await.map_err(ToolError::from)?;
        let mut out = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(ToolError::from)? {
            let file_type = entry.file_type().await.map_err(ToolError::from)?;
            out.push(DirEntryInfo {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: file_type.is_dir(),
            });
        }
        Ok(out)
    }

    async fn stat(&self, path: &Path) -> Result<FileStat, ToolError> {
        let meta = tokio::fs::metadata(path).await.map_err(ToolError::from)?;
        Ok(FileStat { is_dir: meta.is_dir(), is_file: meta.is_file(), len: meta.len() })
    }

    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path).await.is_ok()
    }

    async fn remove_file(&self, path: &Path) -> Result<(), ToolError> {
        tokio::fs::remove_file(path).await.map_err(ToolError::from)
    }

    async fn rename(&self, from: &Path, to: &Path) -> Result<(), ToolError> {
        tokio::fs::rename(from, to).await.map_err(ToolError::from)
    }

    async fn remove_dir(&self, path: &Path, recursive: bool) -> Result<(), ToolError> {
        if recursive {
            tokio::fs::remove_dir_all(path).await.map_err(ToolError::from)
        } else {
            tokio::fs::remove_dir(path).await.map_err(ToolError::from)
        }
    }

    fn home_dir(&self) -> PathBuf {
        std::env::var_os("HOME").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("/"))
    }

    fn root_dir(&self) -> PathBuf {
        self.sandbox_root.clone().unwrap_or_else(|| PathBuf::from("/"))
    }

    fn resolve_workspace_path(&self, raw: &str, cwd: &Path) -> Result<PathBuf, ToolError> {
        let expanded = if let Some(rest) = raw.strip_prefix("~/") {
            self.home_dir().join(rest)
        } else if raw == "~" {
            self.home_dir()
        } else {
            PathBuf::from(raw)
        };
        let absolute = if expanded.is_absolute() { expanded } else { cwd.join(expanded) };
        let normalized = normalize_lexically(&absolute);

        if let Some(root) = &self.sandbox_root {
            let root = normalize_lexically(root);
            if !normalized.starts_with(&root) {
                return Err(ToolError::new(format!(
                    "path '{}' escapes the sandbox root '{}'",
                    normalized.display(),
                    root.display()
                )));
            }
        }
        Ok(normalized)
    }
}

async fn cancelled(token: &Option<tokio_util::sync::CancellationToken>) {
    match token {
        Some(t) => t.cancelled().await,
        None => std::future::pending().await,
    }
}

fn spill_to_tempfile(content: &str) -> Result<PathBuf, ToolError> {
    let mut file = tempfile::Builder::new()
        .prefix("exec-output-")
        .suffix(".log")
        .tempfile()
        .map_err(ToolError::from)?;
    file.write_all(content.as_bytes()).map_err(ToolError::from)?;
    let (_, path) = file.keep().map_err(|e| ToolError::new(e.to_string()))?;
    Ok(path)
}

/// Resolves `.` and `..` components without touching the filesystem (no
/// symlink resolution). Escapes above the root collapse to the root.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        use std::path::Component::*;
        match component {
            ParentDir => {
                out.pop();
            }
            CurDir => {}
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
#[path = "local.test.rs"]
mod tests;
