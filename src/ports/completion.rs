//! Completion Client Port - Interface for chat-completion backends.
//!
//! Abstracts the AI service behind a single `send` call so the matching,
//! clarification, and composition services never touch HTTP details.
//! Implementations classify every remote failure into a typed
//! [`CompletionError`]; callers must never need to re-inspect raw error
//! text.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::ServiceConfig;

/// Port for chat-completion backends.
///
/// Implementations connect to an OpenAI-compatible service and translate
/// transport and protocol failures into the [`CompletionError`] taxonomy.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Sends a chat request and returns the assistant's reply text.
    async fn send(
        &self,
        messages: &[ChatMessage],
        config: &ServiceConfig,
    ) -> Result<String, CompletionError>;

    /// Probes connectivity with a minimal one-message round trip.
    ///
    /// Swallows (and logs) the underlying error: this is a yes/no check
    /// used by configuration screens, not a diagnostic call.
    async fn validate_config(&self, config: &ServiceConfig) -> bool {
        let probe = [ChatMessage::user("Hello")];
        match self.send(&probe, config).await {
            Ok(_) => true,
            Err(err) => {
                tracing::warn!(error = %err, "configuration probe failed");
                false
            }
        }
    }
}

/// A message in a chat-completion conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who sent this message.
    pub role: MessageRole,
    /// Message content.
    pub content: String,
}

impl ChatMessage {
    /// Creates a new message.
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

/// Role of the message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instructions (guides model behavior).
    System,
    /// User input.
    User,
    /// Assistant (model) response.
    Assistant,
}

/// Classified chat-completion failures.
///
/// The client is the only layer that inspects status codes and error
/// bodies; everything above it branches on these variants.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    /// Required configuration (key, model, endpoint) is missing.
    #[error("incomplete service configuration: {0}")]
    Configuration(String),

    /// The backend rejected the credentials.
    #[error("invalid API credentials")]
    InvalidCredentials,

    /// The backend rate-limited the request. The only retryable failure.
    #[error("rate limited by the backend")]
    RateLimited,

    /// Account balance or quota is exhausted.
    #[error("account quota exhausted")]
    QuotaExceeded,

    /// The requested model does not exist on the backend.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The request exceeded the per-attempt timeout.
    #[error("request timed out after {timeout_secs}s")]
    TimedOut {
        /// Configured per-attempt timeout.
        timeout_secs: u64,
    },

    /// The backend could not be reached.
    #[error("network error: {0}")]
    NetworkUnreachable(String),

    /// The reply did not carry a non-empty `choices` array.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Anything the classifier could not place.
    #[error("completion failed: {0}")]
    Unknown(String),
}

impl CompletionError {
    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkUnreachable(message.into())
    }

    /// Creates a malformed-response error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    /// Returns true if the client should retry this failure.
    ///
    /// Only rate limiting qualifies; every other classification is
    /// surfaced immediately.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CompletionError::RateLimited)
    }
}
