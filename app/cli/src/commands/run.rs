//! `forge run <prompt>`: creates a fresh session log and sends one prompt.

use std::path::PathBuf;

use forge_session::PersistedSession;
use tokio::sync::mpsc;

use crate::commands::{build_agent, default_session_path, print_events, RunOptions};

pub async fn run(options: RunOptions, session_path: Option<PathBuf>, prompt: String) -> anyhow::Result<()> {
    let session_path = session_path.unwrap_or_else(|| default_session_path(&options.cwd, &ulid_like_id()));
    if let Some(parent) = session_path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let session = PersistedSession::create(session_path.clone(), options.cwd.to_string_lossy()).await?;
    eprintln!("[session] {}", session_path.display());

    let (tx, rx) = mpsc::channel(64);
    let mut agent = build_agent(&options, tx);
    agent.attach_session(session)?;

    let printer = tokio::spawn(print_events(rx));
    let outcome = agent.stream(prompt).await?;
    drop(agent);
    printer.await?;

    eprintln!(
        "[usage] input={} output={} stop={:?}",
        outcome.usage.input_tokens, outcome.usage.output_tokens, outcome.stop_reason
    );
    Ok(())
}

/// A short, sortable-enough id for a session file name. Real ULID
/// generation lives in [`forge_session`]'s entry ids; the CLI only needs a
/// unique file name, not a monotonic one.
fn ulid_like_id() -> String {
    let now = std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH).unwrap_or_default();
    format!("{:x}{:x}", now.as_secs(), now.subsec_nanos())
}

#[cfg(test)]
#[path = "run.test.rs"]
mod tests;
