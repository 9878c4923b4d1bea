//! HTTP Completion Client - OpenAI-compatible chat completions.
//!
//! Resolves the target endpoint from the service id, applies a bounded
//! per-attempt timeout, retries only rate-limited requests with linear
//! backoff, and classifies every failure into [`CompletionError`].

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::config::{ServiceConfig, ServiceId};
use crate::ports::{ChatMessage, CompletionClient, CompletionError};

const DEEPSEEK_ENDPOINT: &str = "https://api.deepseek.com/chat/completions";
const KIMI_ENDPOINT: &str = "https://api.moonshot.cn/v1/chat/completions";
const OPENROUTER_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";

/// OpenRouter identifies calling applications through two extra headers.
const OPENROUTER_REFERER: &str = "https://promptsmith.dev";
const OPENROUTER_TITLE: &str = "Promptsmith";

const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 4000;

/// Tuning for the HTTP client.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Per-attempt request timeout.
    pub timeout: Duration,
    /// Maximum attempts for rate-limited requests.
    pub max_retries: u32,
    /// Backoff grows linearly: `attempt * retry_base_delay`.
    pub retry_base_delay: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_base_delay: Duration::from_secs(2),
        }
    }
}

impl ClientOptions {
    /// Sets the per-attempt timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the attempt ceiling.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the base backoff delay.
    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }
}

/// OpenAI-compatible HTTP completion client.
pub struct HttpCompletionClient {
    http: Client,
    options: ClientOptions,
}

impl Default for HttpCompletionClient {
    fn default() -> Self {
        Self::new(ClientOptions::default())
    }
}

impl HttpCompletionClient {
    /// Creates a client with the given options.
    pub fn new(options: ClientOptions) -> Self {
        let http = Client::builder()
            .timeout(options.timeout)
            .build()
            .expect("Failed to create HTTP client");
        Self { http, options }
    }

    /// Resolves the chat-completions endpoint for a configuration.
    ///
    /// The custom backend must carry an endpoint override; its absence
    /// is a configuration error, not a network error.
    fn resolve_endpoint(config: &ServiceConfig) -> Result<String, CompletionError> {
        match config.service {
            ServiceId::Deepseek => Ok(DEEPSEEK_ENDPOINT.to_string()),
            ServiceId::Kimi => Ok(KIMI_ENDPOINT.to_string()),
            ServiceId::Openrouter => Ok(OPENROUTER_ENDPOINT.to_string()),
            ServiceId::Custom => config
                .endpoint
                .as_deref()
                .map(str::trim)
                .filter(|endpoint| !endpoint.is_empty())
                .map(str::to_string)
                .ok_or_else(|| {
                    CompletionError::configuration(
                        "the custom backend requires an endpoint URL",
                    )
                }),
        }
    }

    async fn attempt(
        &self,
        endpoint: &str,
        request: &ChatRequest<'_>,
        config: &ServiceConfig,
    ) -> Result<String, CompletionError> {
        let mut builder = self
            .http
            .post(endpoint)
            .header(AUTHORIZATION, format!("Bearer {}", config.api_key()))
            .json(request);

        if config.service == ServiceId::Openrouter {
            builder = builder
                .header("HTTP-Referer", OPENROUTER_REFERER)
                .header("X-Title", OPENROUTER_TITLE);
        }

        let response = builder.send().await.map_err(|err| {
            if err.is_timeout() {
                CompletionError::TimedOut {
                    timeout_secs: self.options.timeout.as_secs(),
                }
            } else if err.is_connect() {
                CompletionError::network(format!("connection failed: {err}"))
            } else {
                CompletionError::network(err.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(status, &body));
        }

        let reply: ChatResponse = response
            .json()
            .await
            .map_err(|err| CompletionError::malformed(err.to_string()))?;
        extract_reply_text(reply)
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn send(
        &self,
        messages: &[ChatMessage],
        config: &ServiceConfig,
    ) -> Result<String, CompletionError> {
        if !config.has_api_key() || !config.has_model() {
            return Err(CompletionError::configuration(
                "API key and model are required",
            ));
        }
        let endpoint = Self::resolve_endpoint(config)?;

        let request = ChatRequest {
            model: &config.model,
            messages,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let mut attempt = 1;
        loop {
            match self.attempt(&endpoint, &request, config).await {
                Ok(text) => return Ok(text),
                Err(err) if err.is_retryable() && attempt < self.options.max_retries => {
                    let delay = self.options.retry_base_delay * attempt;
                    tracing::warn!(
                        attempt,
                        max = self.options.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        "rate limited; backing off"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Classifies a non-success HTTP response.
///
/// Status codes decide first; the error body's message text breaks the
/// remaining ties, mirroring how the backends phrase their failures.
fn classify_failure(status: StatusCode, body: &str) -> CompletionError {
    let message = extract_error_message(body);
    let lowered = message.to_lowercase();

    match status.as_u16() {
        401 | 403 => CompletionError::InvalidCredentials,
        429 => CompletionError::RateLimited,
        404 => CompletionError::ModelNotFound(message),
        _ if lowered.contains("api key") || lowered.contains("unauthorized") => {
            CompletionError::InvalidCredentials
        }
        _ if lowered.contains("rate limit") => CompletionError::RateLimited,
        _ if lowered.contains("quota") || lowered.contains("insufficient") => {
            CompletionError::QuotaExceeded
        }
        _ if lowered.contains("model") => CompletionError::ModelNotFound(message),
        _ => CompletionError::Unknown(format!("HTTP {}: {}", status.as_u16(), message)),
    }
}

/// Pulls `error.message` out of an error body, falling back to the raw
/// text.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .and_then(|err| err.get("message"))
                .and_then(|msg| msg.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

/// Extracts the assistant text from a parsed response.
fn extract_reply_text(reply: ChatResponse) -> Result<String, CompletionError> {
    reply
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content.unwrap_or_default())
        .ok_or_else(|| CompletionError::malformed("response carried no choices"))
}

// ----- Wire types -----

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}
