//! A scripted [`Model`] double for exercising the agent loop without a
//! network call. Not behind `#[cfg(test)]` because other crates' test
//! suites depend on it as an ordinary dev-dependency.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use forge_message::{AssistantPart, Message, StopReason, Usage};
use futures::stream;

use crate::{GenerateResult, Model, ModelError, ModelRequest, Part, StreamHandle};

/// One canned response: a sequence of parts to emit for a single call to
/// `stream`/`generate`. Successive calls to the same [`StubModel`] consume
/// successive scripts; calling past the end of the script repeats the last
/// one, so a test that doesn't care how many turns run doesn't need to
/// over-provision scripts.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTurn {
    pub parts: Vec<Part>,
}

pub struct StubModel {
    provider: String,
    model_id: String,
    scripts: Mutex<Vec<ScriptedTurn>>,
    calls: Arc<Mutex<usize>>,
}

impl StubModel {
    pub fn new(scripts: Vec<ScriptedTurn>) -> Self {
        Self {
            provider: "stub".into(),
            model_id: "stub-1".into(),
            scripts: Mutex::new(scripts),
            calls: Arc::new(Mutex::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }

    fn next_script(&self) -> ScriptedTurn {
        let mut calls = self.calls.lock().unwrap();
        let scripts = self.scripts.lock().unwrap();
        let idx = (*calls).min(scripts.len().saturating_sub(1));
        *calls += 1;
        scripts.get(idx).cloned().unwrap_or_default()
    }
}

fn finalize(parts: &[Part]) -> GenerateResult {
    let mut content = Vec::new();
    let mut usage = Usage::default();
    let mut finish_reason = StopReason::Stop;
    let mut error = None;

    for part in parts {
        match part {
            Part::TextDelta { text } => content.push(AssistantPart::Text { text: text.clone() }),
            Part::ReasoningDelta { text, signature } => {
                content.push(AssistantPart::Thinking { text: text.clone(), signature: signature.clone() })
            }
            Part::ToolCall { id, name, arguments } => {
                content.push(AssistantPart::ToolCall { id: id.clone(), name: name.clone(), arguments: arguments.clone() });
                finish_reason = StopReason::ToolUse;
            }
            Part::StepFinish { usage: u } => usage.add(u),
            Part::Error { message } => {
                finish_reason = StopReason::Error;
                error = Some(message.clone());
            }
            Part::Finish { finish_reason: reason } => finish_reason = *reason,
            Part::ToolResult { .. } => {}
        }
    }

    let message = Message::Assistant(forge_message::AssistantMessage {
        content,
        attribution: None,
        usage,
        stop_reason: finish_reason,
        timestamp: chrono::Utc::now(),
        error,
    });

    GenerateResult { messages: vec![message], finish_reason, usage }
}

#[async_trait]
impl Model for StubModel {
    async fn generate(&self, _request: ModelRequest) -> Result<GenerateResult, ModelError> {
        let script = self.next_script();
        Ok(finalize(&script.parts))
    }

    async fn stream(&self, _request: ModelRequest) -> Result<StreamHandle, ModelError> {
        let script = self.next_script();
        let result = finalize(&script.parts);
        let parts = script.parts;
        let full_stream = Box::pin(stream::iter(parts));
        let response = Box::pin(async move { Ok(result) });
        Ok(StreamHandle { full_stream, response })
    }

    fn provider(&self) -> &str {
        &self.provider
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
