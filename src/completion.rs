//! Chat-completion client
//!
//! One POST to `<base_url>/chat/completions` per call, no retries. The
//! credential is checked when the client is built, so a missing key never
//! reaches the network.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::CompletionSettings;

/// Fallback upstream error when the response carries no `error` field
pub const NO_CHOICES_MESSAGE: &str = "No 'choices' in API response";

#[derive(Debug, Clone, thiserror::Error)]
pub enum CompletionError {
    /// No API credential configured
    #[error("API key not set")]
    MissingApiKey,
    /// HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Client(String),
    /// API reachable but returned no usable completion
    #[error("completion API returned no usable completion")]
    Upstream { error: Value, api_response: Value },
    /// Network-level failure (timeout, refused connection, DNS)
    #[error("completion request failed: {0}")]
    Transport(String),
}

/// Anything that turns a prompt into generated text
#[async_trait]
pub trait Completer: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

/// Client for an OpenAI-compatible chat-completions endpoint
#[derive(Debug, Clone)]
pub struct CompletionClient {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
    model: String,
    temperature: f32,
    timeout: Duration,
}

impl CompletionClient {
    /// Build a client; fails with `MissingApiKey` when no usable key is set
    pub fn new(settings: &CompletionSettings) -> Result<Self, CompletionError> {
        let api_key = settings
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(CompletionError::MissingApiKey)?
            .to_string();

        let timeout = Duration::from_secs(settings.timeout_secs);
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CompletionError::Client(e.to_string()))?;

        Ok(Self {
            http,
            api_key,
            endpoint: format!("{}/chat/completions", settings.base_url.trim_end_matches('/')),
            model: settings.model.clone(),
            temperature: settings.temperature,
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn transport_error(&self, e: reqwest::Error) -> CompletionError {
        if e.is_timeout() {
            CompletionError::Transport(format!(
                "completion API timed out after {}s",
                self.timeout.as_secs()
            ))
        } else {
            CompletionError::Transport(e.to_string())
        }
    }
}

#[async_trait]
impl Completer for CompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
        };

        tracing::info!(
            model = %self.model,
            prompt_chars = prompt.chars().count(),
            "sending completion request"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        tracing::debug!(status = %status, bytes = body.len(), "completion response received");

        let payload: Value = match serde_json::from_str(&body) {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(status = %status, "completion API returned a non-JSON body");
                return Err(CompletionError::Upstream {
                    error: json!(format!(
                        "Completion API returned a non-JSON response (status {})",
                        status
                    )),
                    api_response: Value::String(body),
                });
            }
        };

        completion_content(payload)
    }
}

/// Pull `choices[0].message.content` out of a decoded response
pub fn completion_content(payload: Value) -> Result<String, CompletionError> {
    let content = payload
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.pointer("/message/content"))
        .and_then(Value::as_str)
        .map(str::to_string);

    match content {
        Some(text) => Ok(text),
        None => {
            let error = payload
                .get("error")
                .cloned()
                .unwrap_or_else(|| json!(NO_CHOICES_MESSAGE));
            tracing::warn!(error = %error, "completion API returned no choices");
            Err(CompletionError::Upstream {
                error,
                api_response: payload,
            })
        }
    }
}
