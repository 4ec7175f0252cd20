//! Language-model API interaction with retry logic.
//!
//! This module talks to an OpenAI-compatible chat completion endpoint (Groq
//! by default) and asks for a JSON object reply.
//!
//! # Architecture
//!
//! The module uses a trait-based design for flexibility:
//! - [`AskAsync`]: Core trait defining async LLM interaction
//! - [`ChatClient`]: HTTP implementation against `/chat/completions`
//! - [`RetryAsk`]: Decorator that adds retry logic to any `AskAsync` implementation
//!
//! # Retry Strategy
//!
//! - A fixed number of attempts in total (2 by default)
//! - A fixed pause between attempts (1 second by default)
//! - No backoff growth and no jitter

use crate::config::LlmConfig;
use crate::error::LlmError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, instrument, warn};

/// A system instruction plus a user instruction.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Trait for async LLM interaction.
///
/// Implementors send a [`Prompt`] to a model and return its reply. This
/// abstraction allows for different backends or decorators (like retry logic),
/// and lets the extraction stage run against scripted fakes in tests.
pub trait AskAsync {
    /// The type of response returned by the LLM.
    type Response;

    /// Send the prompt to the LLM and receive a response.
    async fn ask(&self, prompt: &Prompt) -> Result<Self::Response, LlmError>;
}

/// Wrapper that retries any [`AskAsync`] implementation with a fixed pause.
pub struct RetryAsk<T> {
    /// The underlying LLM client to wrap.
    inner: T,
    /// Attempts in total, including the first one.
    max_attempts: usize,
    /// Pause between attempts.
    pause: StdDuration,
}

impl<T> RetryAsk<T>
where
    T: AskAsync,
{
    /// Create a new retry wrapper around an existing [`AskAsync`] implementation.
    ///
    /// `max_attempts` is clamped to at least one.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let client = ChatClient::new(&config.llm, api_key);
    /// let retry_client = RetryAsk::new(client, 2, Duration::from_secs(1));
    /// ```
    pub fn new(inner: T, max_attempts: usize, pause: StdDuration) -> Self {
        Self {
            inner,
            max_attempts: max_attempts.max(1),
            pause,
        }
    }
}

impl<T> fmt::Debug for RetryAsk<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryAsk")
            .field("max_attempts", &self.max_attempts)
            .field("pause", &self.pause)
            .finish()
    }
}

impl<T> AskAsync for RetryAsk<T>
where
    T: AskAsync + fmt::Debug,
{
    type Response = T::Response;

    #[instrument(level = "debug", skip_all)]
    async fn ask(&self, prompt: &Prompt) -> Result<Self::Response, LlmError> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            let attempt_t0 = Instant::now();
            match self.inner.ask(prompt).await {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    attempt += 1;
                    let attempt_dt = attempt_t0.elapsed();
                    let total_dt = total_t0.elapsed();

                    if attempt >= self.max_attempts {
                        error!(
                            attempt,
                            max = self.max_attempts,
                            elapsed_ms_attempt = attempt_dt.as_millis(),
                            elapsed_ms_total = total_dt.as_millis(),
                            error = %e,
                            "ask() exhausted attempts"
                        );
                        return Err(e);
                    }

                    warn!(
                        attempt,
                        max = self.max_attempts,
                        elapsed_ms_attempt = attempt_dt.as_millis(),
                        pause = ?self.pause,
                        error = %e,
                        "ask() attempt failed; retrying"
                    );
                    sleep(self.pause).await;
                }
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Chat completion client for OpenAI-compatible APIs.
#[derive(Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl ChatClient {
    pub fn new(config: &LlmConfig, api_key: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(StdDuration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

impl AskAsync for ChatClient {
    type Response = String;

    #[instrument(level = "debug", skip_all, fields(model = %self.model))]
    async fn ask(&self, prompt: &Prompt) -> Result<Self::Response, LlmError> {
        let t0 = Instant::now();
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, elapsed_ms = t0.elapsed().as_millis(), "API call failed");
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(LlmError::EmptyResponse)?;

        debug!(
            elapsed_ms = t0.elapsed().as_millis(),
            bytes = content.len(),
            "Chat completion"
        );
        Ok(content)
    }
}

/// Build the production client: [`ChatClient`] wrapped in [`RetryAsk`].
pub fn build_client(config: &LlmConfig, api_key: &str) -> RetryAsk<ChatClient> {
    RetryAsk::new(
        ChatClient::new(config, api_key),
        config.max_attempts,
        StdDuration::from_millis(config.retry_pause_ms),
    )
}
