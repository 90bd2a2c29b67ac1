//! `forge resume <session> <prompt>`: reopens an existing session log and
//! sends one more prompt through the non-streaming [`forge_loop::Agent::generate`]
//! path, printing the whole reply at once rather than as it streams.

use std::path::{Path, PathBuf};

use forge_session::PersistedSession;
use tokio::sync::mpsc;

use crate::commands::{build_agent, final_text, print_events, RunOptions};

pub async fn run(options: RunOptions, session_path: PathBuf, prompt: String) -> anyhow::Result<()> {
    let session = load_session(&session_path).await?;

    let (tx, rx) = mpsc::channel(64);
    let mut agent = build_agent(&options, tx);
    agent.attach_session(session)?;

    let printer = tokio::spawn(print_events(rx));
    let outcome = agent.generate(prompt).await?;
    drop(agent);
    printer.await?;

    println!("{}", final_text(&outcome.message));
    eprintln!(
        "[usage] input={} output={} stop={:?}",
        outcome.usage.input_tokens, outcome.usage.output_tokens, outcome.stop_reason
    );
    Ok(())
}

async fn load_session(path: &Path) -> anyhow::Result<PersistedSession> {
    if !path.exists() {
        anyhow::bail!("session not found: {}", path.display());
    }
    let (session, recovered, skipped) = PersistedSession::load(path).await?;
    if skipped > 0 {
        eprintln!("[session] recovered {recovered} entries, skipped {skipped} corrupt lines");
    }
    Ok(session)
}

#[cfg(test)]
#[path = "resume.test.rs"]
mod tests;
