//! [`forge_model::Model`] implementation speaking the OpenAI-compatible
//! chat completions wire protocol over HTTP.
//!
//! Request/response/chunk JSON shapes live in [`wire`], the translation to
//! and from [`forge_message`]/[`forge_model`] types in [`convert`], and SSE
//! chunk accumulation in [`stream`]. This module wires those together with
//! retry-with-backoff request sending and a background task that drains the
//! SSE stream into an `mpsc` channel while resolving the authoritative
//! `response` future through a `oneshot`.

mod convert;
mod error;
mod stream;
mod wire;

use std::time::Duration;

use async_trait::async_trait;
use eventsource_stream::Eventsource;
use forge_message::{AssistantMessage, Attribution, Message, StopReason};
use forge_model::{GenerateResult, Model, ModelError, ModelRequest, Part, PartStream, StreamHandle};
use futures::StreamExt;
use tokio::sync::{mpsc, oneshot};
use tokio_stream::wrappers::ReceiverStream;

pub use error::HttpModelError;
pub use wire::{ChatChunk, ChatResponse, ErrorEnvelope};

/// Configuration for one [`HttpModel`] instance: where to send requests,
/// how to authenticate, and how hard to retry before giving up.
#[derive(Debug, Clone)]
pub struct HttpModelConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub provider: String,
    pub model_id: String,
    pub max_retries: u32,
    pub base_delay: Duration,
    pub stream_idle_timeout: Duration,
}

impl HttpModelConfig {
    pub fn new(base_url: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            provider: "openai-compatible".to_string(),
            model_id: model_id.into(),
            max_retries: 3,
            base_delay: Duration::from_millis(200),
            stream_idle_timeout: Duration::from_secs(120),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = provider.into();
        self
    }
}

pub struct HttpModel {
    client: reqwest::Client,
    config: HttpModelConfig,
}

impl HttpModel {
    pub fn new(config: HttpModelConfig) -> Self {
        Self { client: reqwest::Client::new(), config }
    }

    fn attribution(&self) -> Attribution {
        Attribution {
            provider: self.config.provider.clone(),
            model_id: self.config.model_id.clone(),
            api: "chat.completions".to_string(),
        }
    }

    fn build_request(&self, request: &ModelRequest, stream: bool) -> wire::ChatRequest {
        wire::ChatRequest {
            model: self.config.model_id.clone(),
            messages: convert::to_wire_messages(request.system_prompt.as_deref(), &request.messages),
            tools: convert::to_wire_tools(&request.tools),
            max_tokens: request.max_output_tokens,
            stream,
            stream_options: stream.then_some(wire::StreamOptions { include_usage: true }),
        }
    }

    /// Sends the chat completions request, retrying on 429/5xx/network
    /// errors with exponential backoff. Rebuilds the request on every
    /// attempt rather than cloning a [`reqwest::RequestBuilder`], which
    /// reqwest does not support cloning once a streaming body is attached.
    async fn send_with_retry(&self, body: &wire::ChatRequest) -> Result<reqwest::Response, HttpModelError> {
        let mut attempt = 0;
        loop {
            let mut builder = self
                .client
                .post(format!("{}/chat/completions", self.config.base_url))
                .header("content-type", "application/json")
                .json(body);
            if let Some(api_key) = &self.config.api_key {
                builder = builder.bearer_auth(api_key);
            }

            match builder.send().await {
                Ok(resp) => {
                    let status = resp.status();
                    if (status.as_u16() == 429 || status.is_server_error()) && attempt < self.config.max_retries {
                        tracing::debug!(attempt, %status, "retrying chat completions request");
                        tokio::time::sleep(backoff(self.config.base_delay, attempt)).await;
                        attempt += 1;
                        continue;
                    }
                    return Ok(resp);
                }
                Err(err) => {
                    if attempt < self.config.max_retries {
                        tracing::debug!(attempt, error = %err, "retrying after network error");
                        tokio::time::sleep(backoff(self.config.base_delay, attempt)).await;
                        attempt += 1;
                        continue;
                    }
                    return Err(HttpModelError::Network(err));
                }
            }
        }
    }

    async fn error_for_status(resp: reqwest::Response) -> HttpModelError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_else(|_| "<unreadable body>".to_string());
        HttpModelError::Api { status, body }
    }
}

fn backoff(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt))
}

fn to_model_error(err: HttpModelError) -> ModelError {
    match err {
        HttpModelError::Cancelled => ModelError::Cancelled,
        other => ModelError::Transport(other.to_string()),
    }
}

#[async_trait]
impl Model for HttpModel {
    async fn generate(&self, request: ModelRequest) -> Result<GenerateResult, ModelError> {
        let cancel = request.cancel.clone();
        let body = self.build_request(&request, false);
        let send = self.send_with_retry(&body);

        let resp = match &cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => return Err(ModelError::Cancelled),
                result = send => result.map_err(to_model_error)?,
            },
            None => send.await.map_err(to_model_error)?,
        };

        if !resp.status().is_success() {
            return Err(to_model_error(Self::error_for_status(resp).await));
        }

        let parsed: ChatResponse = resp
            .json()
            .await
            .map_err(|e| to_model_error(HttpModelError::Parse(e.to_string())))?;
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| to_model_error(HttpModelError::Parse("response had no choices".to_string())))?;

        let content = convert::assistant_parts_from_response(&choice.message);
        let finish_reason = convert::finish_reason_from_wire(choice.finish_reason.as_deref());
        let usage = convert::usage_from_wire(parsed.usage);

        let message = Message::Assistant(AssistantMessage {
            content,
            attribution: Some(self.attribution()),
            usage,
            stop_reason: finish_reason,
            timestamp: chrono::Utc::now(),
            error: None,
        });

        Ok(GenerateResult { messages: vec![message], finish_reason, usage })
    }

    async fn stream(&self, request: ModelRequest) -> Result<StreamHandle, ModelError> {
        let cancel = request.cancel.clone();
        let body = self.build_request(&request, true);
        let send = self.send_with_retry(&body);

        let resp = match &cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => return Err(ModelError::Cancelled),
                result = send => result.map_err(to_model_error)?,
            },
            None => send.await.map_err(to_model_error)?,
        };

        if !resp.status().is_success() {
            return Err(to_model_error(Self::error_for_status(resp).await));
        }

        let (part_tx, part_rx) = mpsc::channel::<Part>(32);
        let (result_tx, result_rx) = oneshot::channel::<Result<GenerateResult, ModelError>>();
        let attribution = self.attribution();
        let idle_timeout = self.config.stream_idle_timeout;

        tokio::spawn(async move {
            let outcome = drive_sse(resp, idle_timeout, attribution, &part_tx).await;
            let _ = result_tx.send(outcome);
        });

        let full_stream: PartStream = Box::pin(ReceiverStream::new(part_rx));
        let response = Box::pin(async move {
            result_rx.await.unwrap_or(Err(ModelError::Transport("stream task dropped".to_string())))
        });

        Ok(StreamHandle { full_stream, response })
    }

    fn provider(&self) -> &str {
        &self.config.provider
    }

    fn model_id(&self) -> &str {
        &self.config.model_id
    }
}

/// Reads SSE chunks off `resp`, forwarding each decoded [`Part`] to
/// `part_tx` as it arrives, and returns the final [`GenerateResult`] once
/// the stream reports `finish_reason` (or is reconstructed from whatever
/// content arrived before an idle timeout or premature close).
async fn drive_sse(
    resp: reqwest::Response,
    idle_timeout: Duration,
    attribution: Attribution,
    part_tx: &mpsc::Sender<Part>,
) -> Result<GenerateResult, ModelError> {
    let mut accumulator = stream::StreamAccumulator::new();
    let mut events = resp.bytes_stream().eventsource();

    loop {
        let next = tokio::time::timeout(idle_timeout, events.next()).await;
        match next {
            Ok(Some(Ok(event))) => {
                if event.data.trim().is_empty() || event.data.trim() == "[DONE]" {
                    continue;
                }
                let chunk: ChatChunk = match serde_json::from_str(&event.data) {
                    Ok(chunk) => chunk,
                    Err(err) => {
                        let _ = part_tx.send(Part::Error { message: err.to_string() }).await;
                        return Err(ModelError::Transport(format!("malformed stream chunk: {err}")));
                    }
                };
                for part in accumulator.apply_chunk(chunk) {
                    if part_tx.send(part).await.is_err() {
                        break;
                    }
                }
                if accumulator.is_finished() {
                    break;
                }
            }
            Ok(Some(Err(err))) => {
                let _ = part_tx.send(Part::Error { message: err.to_string() }).await;
                return Err(ModelError::Transport(format!("stream error: {err}")));
            }
            Ok(None) => break,
            Err(_) => {
                tracing::debug!("sse stream idle timeout");
                break;
            }
        }
    }

    if !accumulator.is_finished() {
        for part in accumulator.finish_abnormally(StopReason::Error) {
            let _ = part_tx.send(part).await;
        }
    }

    let message = Message::Assistant(AssistantMessage {
        content: accumulator.assistant_parts(),
        attribution: Some(attribution),
        usage: accumulator.usage(),
        stop_reason: accumulator.finish_reason(),
        timestamp: chrono::Utc::now(),
        error: None,
    });

    Ok(GenerateResult { messages: vec![message], finish_reason: accumulator.finish_reason(), usage: accumulator.usage() })
}

#[cfg(test)]
#[path = "lib.test.rs"]
mod tests;
