pub mod resume;
pub mod run;

use std::path::PathBuf;
use std::sync::Arc;

use forge_compaction::{CompactionConfig, CompactionMode, CompactionSettings};
use forge_loop::{Agent, AgentBuilder, AgentConfig, AgentEvent};
use forge_message::Message;
use forge_provider_http::{HttpModel, HttpModelConfig};
use forge_runtime::LocalRuntime;
use forge_tools::ToolRegistry;
use tokio::sync::mpsc;

/// Everything the two subcommands need to build an [`Agent`], gathered up
/// front in `main` so `run`/`resume` only differ in how the session is
/// opened.
pub struct RunOptions {
    pub cwd: PathBuf,
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
}

/// Context window assumed for a model the caller hasn't described further.
/// Conservative enough that auto-compaction kicks in well before most
/// providers' real limits, never so small that ordinary turns thrash it.
const DEFAULT_CONTEXT_WINDOW: u64 = 128_000;

pub fn build_agent(options: &RunOptions, event_tx: mpsc::Sender<AgentEvent>) -> Agent {
    let model_config = match &options.api_key {
        Some(key) => HttpModelConfig::new(&options.base_url, &options.model).with_api_key(key.clone()),
        None => HttpModelConfig::new(&options.base_url, &options.model),
    };
    let model = Arc::new(HttpModel::new(model_config));

    let tools = Arc::new(ToolRegistry::standard());
    let selected_tools: Vec<String> = tools.names().iter().map(|name| name.to_string()).collect();

    let config = AgentConfig {
        selected_tools,
        compaction: Some(CompactionConfig {
            context_window: DEFAULT_CONTEXT_WINDOW,
            mode: CompactionMode::Auto,
            settings: CompactionSettings::default(),
        }),
        ..AgentConfig::default()
    };

    AgentBuilder::new()
        .model(model)
        .tools(tools)
        .runtime(Arc::new(LocalRuntime::sandboxed(options.cwd.clone())))
        .cwd(options.cwd.clone())
        .config(config)
        .event_tx(event_tx)
        .build()
}

/// Default location for a freshly started session: `<cwd>/.forge/<id>.jsonl`.
pub fn default_session_path(cwd: &std::path::Path, id: &str) -> PathBuf {
    cwd.join(".forge").join(format!("{id}.jsonl"))
}

/// Prints an [`AgentEvent`] stream to stdout/stderr in a form readable in a
/// terminal: assistant text as it streams, tool calls as one-line status
/// updates, compaction as a dimmed note on stderr.
pub async fn print_events(mut rx: mpsc::Receiver<AgentEvent>) {
    use forge_loop::events::MessageDelta;
    use std::io::Write;

    while let Some(event) = rx.recv().await {
        match event {
            AgentEvent::MessageUpdate { delta: MessageDelta::Text(text), .. } => {
                print!("{text}");
                let _ = std::io::stdout().flush();
            }
            AgentEvent::ToolExecutionStart { tool_name, .. } => {
                eprintln!("[tool] {tool_name}...");
            }
            AgentEvent::ToolExecutionEnd { tool_name, is_error, .. } => {
                eprintln!("[tool] {tool_name} {}", if is_error { "failed" } else { "done" });
            }
            AgentEvent::AutoCompactionStart { .. } => {
                eprintln!("[compacting session]");
            }
            AgentEvent::AgentEnd { .. } => {
                println!();
            }
            _ => {}
        }
    }
}

pub(crate) fn final_text(message: &Message) -> String {
    match message {
        Message::Assistant(assistant) => assistant
            .content
            .iter()
            .filter_map(|part| match part {
                forge_message::AssistantPart::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(""),
        _ => String::new(),
    }
}
