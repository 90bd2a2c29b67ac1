//! [`Agent`]: the outer/inner loop that drives a [`Model`] through
//! repeated rounds of reasoning and tool use.
//!
//! A builder panics on missing required fields, a struct holds the
//! sticky conversation state across calls, and events are sent through an
//! `mpsc::Sender` the caller supplies up front rather than a stream handle
//! returned from `stream()` itself (that would require `Agent` to own its
//! state behind `Arc<Mutex<_>>` just to satisfy a `'static` spawn, for no
//! behavioral gain over the simpler "send events as you go" shape).

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use forge_compaction::{prepare_compaction, CompactionConfig, CompactionMode};
use forge_error::AgentError;
use forge_message::factory::tool_results_message;
use forge_message::{
    AssistantMessage, AssistantPart, Attribution, Message, StopReason, ToolResultPart, Usage,
};
use forge_model::{Model, ModelRequest, Part, ToolDefinition};
use forge_prompt::{PromptCall, PromptOptions};
use forge_runtime::Runtime;
use forge_session::PersistedSession;
use forge_tools::{ToolContext, ToolRegistry};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::events::{AgentEvent, CompactionOutcome, CompactionReason, MessageDelta};

/// What the caller hands the loop to start (or continue) a conversation.
pub enum AgentInput {
    Prompt(String),
    Messages(Vec<Message>),
}

impl AgentInput {
    fn into_messages(self) -> Vec<Message> {
        match self {
            AgentInput::Prompt(text) => vec![Message::user(text)],
            AgentInput::Messages(messages) => messages,
        }
    }
}

impl From<&str> for AgentInput {
    fn from(value: &str) -> Self {
        AgentInput::Prompt(value.to_string())
    }
}

impl From<String> for AgentInput {
    fn from(value: String) -> Self {
        AgentInput::Prompt(value)
    }
}

impl From<Vec<Message>> for AgentInput {
    fn from(value: Vec<Message>) -> Self {
        AgentInput::Messages(value)
    }
}

/// A follow-up provider: inspects the messages produced so far and returns
/// zero or more messages to re-enter the outer loop with. An empty return
/// ends the run.
pub type FollowUpProvider = Box<dyn FnMut(&[Message]) -> Vec<Message> + Send>;

/// What one `generate`/`stream` call returns: the final assistant message
/// plus the usage accumulated across every step of the run.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateOutcome {
    pub message: Message,
    pub usage: Usage,
    pub stop_reason: StopReason,
}

/// Static-for-the-run configuration: which tools are offered, how the
/// system prompt is built, and whether/how compaction runs.
#[derive(Clone)]
pub struct AgentConfig {
    pub selected_tools: Vec<String>,
    pub prompt_options: PromptOptions,
    pub compaction: Option<CompactionConfig>,
    pub max_output_tokens: Option<u64>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            selected_tools: Vec::new(),
            prompt_options: PromptOptions::default(),
            compaction: None,
            max_output_tokens: None,
        }
    }
}

struct PendingToolCall {
    id: String,
    name: String,
    arguments: serde_json::Value,
}

/// The outer/inner loop driver. One `Agent` is used sequentially — two
/// concurrent `generate`/`stream` calls on the same instance are undefined
/// behavior, matching the single-writer model the session log assumes.
pub struct Agent {
    model: Arc<dyn Model>,
    compaction_model: Option<Arc<dyn Model>>,
    tools: Arc<ToolRegistry>,
    runtime: Arc<dyn Runtime>,
    cwd: PathBuf,
    config: AgentConfig,
    session: Option<PersistedSession>,
    messages: Vec<Message>,
    steering_queue: VecDeque<Message>,
    follow_up: Option<FollowUpProvider>,
    event_tx: Option<mpsc::Sender<AgentEvent>>,
    cancel: CancellationToken,
}

/// Builds an [`Agent`]: optional setters, required fields `.expect()`-checked
/// in `build()`.
pub struct AgentBuilder {
    model: Option<Arc<dyn Model>>,
    compaction_model: Option<Arc<dyn Model>>,
    tools: Option<Arc<ToolRegistry>>,
    runtime: Option<Arc<dyn Runtime>>,
    cwd: Option<PathBuf>,
    config: AgentConfig,
    session: Option<PersistedSession>,
    event_tx: Option<mpsc::Sender<AgentEvent>>,
    cancel: CancellationToken,
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            model: None,
            compaction_model: None,
            tools: None,
            runtime: None,
            cwd: None,
            config: AgentConfig::default(),
            session: None,
            event_tx: None,
            cancel: CancellationToken::new(),
        }
    }

    pub fn model(mut self, model: Arc<dyn Model>) -> Self {
        self.model = Some(model);
        self
    }

    /// The model used for compaction summarization calls. Falls back to
    /// the main model when unset.
    pub fn compaction_model(mut self, model: Arc<dyn Model>) -> Self {
        self.compaction_model = Some(model);
        self
    }

    pub fn tools(mut self, tools: Arc<ToolRegistry>) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn runtime(mut self, runtime: Arc<dyn Runtime>) -> Self {
        self.runtime = Some(runtime);
        self
    }

    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    pub fn session(mut self, session: PersistedSession) -> Self {
        self.session = Some(session);
        self
    }

    pub fn event_tx(mut self, tx: mpsc::Sender<AgentEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    pub fn cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// # Panics
    /// Panics if `model`, `tools`, `runtime`, or `cwd` have not been set.
    pub fn build(self) -> Agent {
        let messages = self
            .session
            .as_ref()
            .and_then(|s| s.build_session_context(None).ok())
            .map(|ctx| ctx.messages)
            .unwrap_or_default();

        Agent {
            model: self.model.expect("model is required"),
            compaction_model: self.compaction_model,
            tools: self.tools.expect("tools is required"),
            runtime: self.runtime.expect("runtime is required"),
            cwd: self.cwd.expect("cwd is required"),
            config: self.config,
            session: self.session,
            messages,
            steering_queue: VecDeque::new(),
            follow_up: None,
            event_tx: self.event_tx,
            cancel: self.cancel,
        }
    }
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent {
    pub fn builder() -> AgentBuilder {
        AgentBuilder::new()
    }

    /// The current linear message view, as a model call would see it.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Cancels the current call, every in-flight tool execution, and any
    /// in-flight compaction — they all share one token.
    pub fn abort(&self) {
        self.cancel.cancel();
    }

    /// Enqueues a user message to be delivered at the next step boundary,
    /// never in the middle of a streamed assistant message.
    pub fn steer(&mut self, text: impl Into<String>) {
        self.steering_queue.push_back(Message::user(text));
    }

    pub fn set_follow_up_provider(&mut self, provider: FollowUpProvider) {
        self.follow_up = Some(provider);
    }

    /// Attaches (or replaces) the session log this agent persists to,
    /// rebuilding the in-memory message view from it.
    pub fn attach_session(&mut self, session: PersistedSession) -> Result<(), AgentError> {
        let ctx = session.build_session_context(None)?;
        self.messages = ctx.messages;
        self.session = Some(session);
        Ok(())
    }

    /// Runs to completion using the model's non-streaming `generate`. No
    /// text/thinking deltas are emitted — only whole messages and tool
    /// events — since there is nothing incremental to report.
    pub async fn generate(&mut self, input: impl Into<AgentInput>) -> Result<GenerateOutcome, AgentError> {
        self.run(input.into(), false).await
    }

    /// Runs to completion using the model's streaming interface, emitting
    /// `message_update` events as text/thinking deltas arrive.
    pub async fn stream(&mut self, input: impl Into<AgentInput>) -> Result<GenerateOutcome, AgentError> {
        self.run(input.into(), true).await
    }

    /// Manual compaction: bypasses the threshold check `shouldCompact`
    /// gates auto-compact on, but still requires a valid cut point.
    pub async fn compact(&mut self) -> Result<bool, AgentError> {
        self.run_compaction(CompactionReason::Threshold).await
    }

    async fn run(&mut self, input: AgentInput, streaming: bool) -> Result<GenerateOutcome, AgentError> {
        self.emit(AgentEvent::AgentStart).await;

        let mut pending = input.into_messages();
        let mut outcome: Option<GenerateOutcome> = None;

        loop {
            for message in pending.drain(..) {
                self.append_message(message).await?;
            }

            let step_outcome = self.inner_loop(streaming).await?;
            let stop = step_outcome.stop_reason;
            outcome = Some(step_outcome);

            if matches!(stop, StopReason::Aborted | StopReason::Error) {
                break;
            }

            let followups = match &mut self.follow_up {
                Some(provider) => provider(&self.messages),
                None => Vec::new(),
            };
            if followups.is_empty() {
                break;
            }
            pending = followups;
        }

        self.emit(AgentEvent::AgentEnd { messages: self.messages.clone() }).await;

        if let Some(compaction) = &self.config.compaction {
            if compaction.mode == CompactionMode::Auto {
                let tokens = forge_tokens::estimate_context_tokens(&self.messages);
                if compaction.should_compact(tokens) {
                    self.run_compaction(CompactionReason::Threshold).await?;
                }
            }
        }

        outcome.ok_or_else(|| AgentError::Transport("agent produced no response".to_string()))
    }

    /// The inner (tool-call) loop: runs model steps until the assistant
    /// stops asking for tools and the steering queue is empty.
    async fn inner_loop(&mut self, streaming: bool) -> Result<GenerateOutcome, AgentError> {
        loop {
            self.emit(AgentEvent::TurnStart).await;

            if self.cancel.is_cancelled() {
                let assistant = forge_message::factory::assistant_message(Vec::new(), None, Usage::default(), StopReason::Aborted);
                self.append_message(assistant.clone()).await?;
                self.emit(AgentEvent::TurnEnd { message: assistant.clone(), tool_results: Vec::new() }).await;
                return Ok(GenerateOutcome { message: assistant, usage: Usage::default(), stop_reason: StopReason::Aborted });
            }

            let steered: Vec<Message> = self.steering_queue.drain(..).collect();
            for message in steered {
                self.append_message(message).await?;
            }

            let request = self.build_request();
            let step = if streaming {
                self.run_streaming_step(request).await?
            } else {
                self.run_generate_step(request).await?
            };

            self.emit(AgentEvent::TurnEnd {
                message: step.assistant.clone(),
                tool_results: step.tool_results.clone().into_iter().collect(),
            })
            .await;

            let has_tool_calls = forge_message::type_guards::has_tool_use(&step.assistant);
            let terminal = matches!(step.stop_reason, StopReason::Aborted | StopReason::Error);

            if terminal || (!has_tool_calls && self.steering_queue.is_empty()) {
                return Ok(GenerateOutcome {
                    message: step.assistant,
                    usage: step.usage,
                    stop_reason: step.stop_reason,
                });
            }
        }
    }

    fn build_request(&self) -> ModelRequest {
        let selected = &self.config.selected_tools;
        let call = PromptCall { selected_tools: selected, cwd: self.cwd.to_string_lossy().as_ref() };
        let system_prompt = forge_prompt::build_system_prompt(&self.config.prompt_options, &call);

        let tools: Vec<ToolDefinition> = selected
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|tool| ToolDefinition {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                input_schema: tool.input_schema(),
            })
            .collect();

        ModelRequest {
            messages: self.messages.clone(),
            system_prompt: Some(system_prompt),
            tools,
            max_output_tokens: self.config.max_output_tokens,
            cancel: Some(self.cancel.clone()),
        }
    }

    async fn run_generate_step(&mut self, request: ModelRequest) -> Result<StepOutcome, AgentError> {
        let result = self
            .model
            .generate(request)
            .await
            .map_err(|e| AgentError::Transport(e.to_string()))?;

        let assistant = result
            .messages
            .into_iter()
            .next()
            .unwrap_or_else(|| forge_message::factory::assistant_error("model returned no message"));

        self.emit(AgentEvent::MessageStart { message: assistant.clone() }).await;
        self.emit(AgentEvent::MessageEnd { message: assistant.clone() }).await;

        let tool_calls = extract_tool_calls(&assistant);
        let tool_results = if matches!(result.finish_reason, StopReason::Aborted | StopReason::Error) || tool_calls.is_empty() {
            None
        } else {
            Some(self.dispatch_tool_calls(tool_calls).await)
        };

        self.append_message(assistant.clone()).await?;
        if let Some(tool_results) = &tool_results {
            self.append_message(tool_results.clone()).await?;
        }

        Ok(StepOutcome { assistant, tool_results, stop_reason: result.finish_reason, usage: result.usage })
    }

    /// Consumes the part stream for deltas (so subscribers see text as it
    /// arrives) but treats `handle.response` as the source of truth for the
    /// final message, usage and stop reason — a caller that drops the
    /// stream early (or the stream ends abruptly on cancellation) still
    /// gets a correct result here, since the provider's `response` future
    /// accounts for whatever buffering happened internally.
    async fn run_streaming_step(&mut self, request: ModelRequest) -> Result<StepOutcome, AgentError> {
        let handle = self.model.stream(request).await.map_err(|e| AgentError::Transport(e.to_string()))?;
        let mut full_stream = handle.full_stream;
        let response = handle.response;

        self.emit(AgentEvent::MessageStart { message: Message::Assistant(AssistantMessage::empty()) }).await;

        let mut text = String::new();
        let mut thinking: Option<(String, Option<String>)> = None;
        let mut tool_calls: Vec<PendingToolCall> = Vec::new();
        let mut aborted = false;

        loop {
            let next = full_stream.next();
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    aborted = true;
                    break;
                }
                part = next => {
                    let Some(part) = part else { break };
                    match part {
                        Part::TextDelta { text: delta } => {
                            text.push_str(&delta);
                            let partial = build_assistant_message(&text, &thinking, &tool_calls, &Usage::default(), StopReason::Stop, None);
                            self.emit(AgentEvent::MessageUpdate { message: partial, delta: MessageDelta::Text(delta) }).await;
                        }
                        Part::ReasoningDelta { text: delta, signature } => {
                            let entry = thinking.get_or_insert_with(|| (String::new(), None));
                            entry.0.push_str(&delta);
                            if signature.is_some() {
                                entry.1 = signature.clone();
                            }
                            let partial = build_assistant_message(&text, &thinking, &tool_calls, &Usage::default(), StopReason::Stop, None);
                            self.emit(AgentEvent::MessageUpdate { message: partial, delta: MessageDelta::Thinking(delta) }).await;
                        }
                        Part::ToolCall { id, name, arguments } => {
                            self.emit(AgentEvent::ToolExecutionStart {
                                tool_call_id: id.clone(),
                                tool_name: name.clone(),
                                args: arguments.clone(),
                            })
                            .await;
                            tool_calls.push(PendingToolCall { id, name, arguments });
                        }
                        Part::Error { .. } | Part::Finish { .. } => break,
                        Part::StepFinish { .. } | Part::ToolResult { .. } => {}
                    }
                }
            }
        }

        let (assistant, stop_reason, usage) = if aborted {
            let message = build_assistant_message(&text, &thinking, &tool_calls, &Usage::default(), StopReason::Aborted, None);
            (message, StopReason::Aborted, Usage::default())
        } else {
            match response.await {
                Ok(result) => {
                    let message = result
                        .messages
                        .into_iter()
                        .next()
                        .unwrap_or_else(|| forge_message::factory::assistant_error("model returned no message"));
                    (message, result.finish_reason, result.usage)
                }
                Err(err) => (forge_message::factory::assistant_error(err.to_string()), StopReason::Error, Usage::default()),
            }
        };

        self.emit(AgentEvent::MessageEnd { message: assistant.clone() }).await;

        let tool_calls = if aborted { Vec::new() } else { extract_tool_calls(&assistant) };
        let tool_results = if matches!(stop_reason, StopReason::Aborted | StopReason::Error) || tool_calls.is_empty() {
            None
        } else {
            Some(self.dispatch_tool_calls(tool_calls).await)
        };

        self.append_message(assistant.clone()).await?;
        if let Some(tool_results) = &tool_results {
            self.append_message(tool_results.clone()).await?;
        }

        Ok(StepOutcome { assistant, tool_results, stop_reason, usage })
    }

    /// Runs every pending tool call concurrently and folds the results
    /// into one `tool` message, per the "one step, one tool message"
    /// contract the provider side expects.
    async fn dispatch_tool_calls(&self, calls: Vec<PendingToolCall>) -> Message {
        let futures = calls.into_iter().map(|call| {
            let tool = self.tools.get(&call.name);
            let event_tx = self.event_tx.clone();
            let on_partial = event_tx.clone().map(|tx| {
                let tool_call_id = call.id.clone();
                let tool_name = call.name.clone();
                let args = call.arguments.clone();
                Arc::new(move |partial_result: String| {
                    let _ = tx.try_send(AgentEvent::ToolExecutionUpdate {
                        tool_call_id: tool_call_id.clone(),
                        tool_name: tool_name.clone(),
                        args: args.clone(),
                        partial_result,
                    });
                }) as forge_runtime::PartialSink
            });
            let ctx = ToolContext {
                runtime: self.runtime.clone(),
                cwd: self.cwd.clone(),
                tool_call_id: call.id.clone(),
                cancel: self.cancel.clone(),
                on_partial,
            };
            async move {
                let result = match tool {
                    Some(handler) => handler.execute(call.arguments.clone(), ctx).await,
                    None => Err(forge_error::ToolError::new(format!("unknown tool: {}", call.name))),
                };
                let part = match &result {
                    Ok(output) => ToolResultPart::ok(&call.id, &call.name, output.text_content()),
                    Err(err) => ToolResultPart::error(&call.id, &call.name, err.to_string()),
                };
                if let Some(tx) = &event_tx {
                    let _ = tx
                        .send(AgentEvent::ToolExecutionEnd {
                            tool_call_id: call.id.clone(),
                            tool_name: call.name.clone(),
                            result: part.text.clone(),
                            is_error: part.is_error,
                        })
                        .await;
                }
                part
            }
        });

        let parts = futures::future::join_all(futures).await;
        tool_results_message(parts)
    }

    async fn append_message(&mut self, message: Message) -> Result<(), AgentError> {
        self.messages.push(message.clone());
        if let Some(session) = &mut self.session {
            session.append_message(message).await?;
        }
        Ok(())
    }

    async fn emit(&self, event: AgentEvent) {
        if let Some(tx) = &self.event_tx {
            if tx.send(event).await.is_err() {
                debug!("agent event receiver dropped");
            }
        }
    }

    /// Finds a cut point, asks `compaction_model` (or `model`, if unset)
    /// to summarize, and records the result as a new session entry.
    /// Returns `Ok(false)` when there was nothing to compact — never an
    /// error, matching the "no-op" rule for a missing cut point.
    async fn run_compaction(&mut self, reason: CompactionReason) -> Result<bool, AgentError> {
        if self.session.is_none() {
            return Ok(false);
        }
        let Some(config) = self.config.compaction.clone() else {
            return Ok(false);
        };

        let preparation = {
            let session = self.session.as_ref().expect("checked above");
            let branch = session.get_branch(None)?;
            match prepare_compaction(&branch, &config.settings) {
                Some(preparation) => preparation,
                None => {
                    debug!("no valid cut point; skipping compaction");
                    return Ok(false);
                }
            }
        };

        self.emit(AgentEvent::AutoCompactionStart { reason }).await;

        let is_split_turn = preparation.is_split_turn;
        let result = {
            let model: &dyn Model = self.compaction_model.as_deref().unwrap_or(self.model.as_ref());
            forge_compaction::summarize::compact(preparation, model).await
        };

        match result {
            Ok(result) => {
                let session = self.session.as_mut().expect("checked above");
                session
                    .append_compaction(result.summary.clone(), result.first_kept_entry_id, result.tokens_before, Some(result.details))
                    .await?;
                let ctx = session.build_session_context(None)?;
                self.messages = ctx.messages;

                info!(tokens_before = result.tokens_before, is_split_turn, "compaction completed");
                self.emit(AgentEvent::AutoCompactionEnd {
                    result: Some(CompactionOutcome {
                        summary: result.summary,
                        tokens_before: result.tokens_before,
                        is_split_turn,
                    }),
                    aborted: false,
                    will_retry: false,
                    error_message: None,
                })
                .await;
                Ok(true)
            }
            Err(forge_error::CompactionError::Aborted) => {
                warn!("compaction aborted");
                self.emit(AgentEvent::AutoCompactionEnd {
                    result: None,
                    aborted: true,
                    will_retry: false,
                    error_message: None,
                })
                .await;
                Ok(false)
            }
            Err(err) => {
                warn!(error = %err, "compaction failed");
                self.emit(AgentEvent::AutoCompactionEnd {
                    result: None,
                    aborted: false,
                    will_retry: true,
                    error_message: Some(err.to_string()),
                })
                .await;
                Ok(false)
            }
        }
    }
}

struct StepOutcome {
    assistant: Message,
    tool_results: Option<Message>,
    stop_reason: StopReason,
    usage: Usage,
}

fn extract_tool_calls(message: &Message) -> Vec<PendingToolCall> {
    let Message::Assistant(assistant) = message else { return Vec::new() };
    assistant
        .content
        .iter()
        .filter_map(|part| match part {
            AssistantPart::ToolCall { id, name, arguments } => {
                Some(PendingToolCall { id: id.clone(), name: name.clone(), arguments: arguments.clone() })
            }
            _ => None,
        })
        .collect()
}

fn build_assistant_message(
    text: &str,
    thinking: &Option<(String, Option<String>)>,
    tool_calls: &[PendingToolCall],
    usage: &Usage,
    stop_reason: StopReason,
    attribution: Option<Attribution>,
) -> Message {
    let mut content = Vec::new();
    if !text.is_empty() {
        content.push(AssistantPart::Text { text: text.to_string() });
    }
    if let Some((thinking_text, signature)) = thinking {
        content.push(AssistantPart::Thinking { text: thinking_text.clone(), signature: signature.clone() });
    }
    for call in tool_calls {
        content.push(AssistantPart::ToolCall { id: call.id.clone(), name: call.name.clone(), arguments: call.arguments.clone() });
    }

    Message::Assistant(AssistantMessage {
        content,
        attribution,
        usage: *usage,
        stop_reason,
        timestamp: Utc::now(),
        error: None,
    })
}

#[cfg(test)]
#[path = "agent.test.rs"]
mod tests;
