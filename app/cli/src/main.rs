//! Minimal command-line driver for the agent loop: parses arguments, wires
//! an [`forge_loop::Agent`] against a real [`forge_provider_http::HttpModel`]
//! and [`forge_runtime::local::LocalRuntime`], and prints the events it
//! emits. Argument parsing, session-file layout, and output formatting live
//! here; the loop, the wire protocol, and the tool substrate do not.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "forge", about = "Drive the forge agent loop from a terminal")]
struct Cli {
    /// Directory the agent treats as its working directory and tool sandbox.
    #[arg(long, global = true, default_value = ".")]
    cwd: PathBuf,

    /// Base URL of the OpenAI-compatible chat completions endpoint.
    #[arg(long, global = true, env = "FORGE_BASE_URL", default_value = "https://api.openai.com/v1")]
    base_url: String,

    /// Model id to request.
    #[arg(long, global = true, env = "FORGE_MODEL", default_value = "gpt-4o-mini")]
    model: String,

    /// Environment variable holding the provider API key.
    #[arg(long, global = true, default_value = "OPENAI_API_KEY")]
    api_key_env: String,

    /// Emit debug-level logging to stderr.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start a new session log and send one prompt.
    Run {
        prompt: String,
        /// Where to write the session log (default: ./.forge/<random>.jsonl).
        #[arg(long)]
        session: Option<PathBuf>,
    },
    /// Reopen an existing session log and send one more prompt.
    Resume {
        session: PathBuf,
        prompt: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let api_key = std::env::var(&cli.api_key_env).ok();
    let options = commands::RunOptions {
        cwd: cli.cwd,
        base_url: cli.base_url,
        model: cli.model,
        api_key,
    };

    match cli.command {
        Command::Run { prompt, session } => commands::run::run(options, session, prompt).await,
        Command::Resume { session, prompt } => commands::resume::run(options, session, prompt).await,
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "forge_cli=debug,forge_loop=debug,forge_provider_http=debug" } else { "forge_cli=info" };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_writer(std::io::stderr)
        .init();
}
