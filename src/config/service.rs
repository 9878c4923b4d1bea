//! Active-service configuration: which backend, which model, which key.

use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported AI backends.
///
/// Every backend speaks the OpenAI-compatible chat-completion protocol;
/// `Custom` points at a user-supplied endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ServiceId {
    /// DeepSeek platform.
    #[default]
    Deepseek,
    /// Moonshot (Kimi) platform.
    Kimi,
    /// OpenRouter aggregator.
    Openrouter,
    /// Any OpenAI-compatible endpoint supplied by the user.
    Custom,
}

impl ServiceId {
    /// Stable identifier used in persisted settings and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deepseek => "deepseek",
            Self::Kimi => "kimi",
            Self::Openrouter => "openrouter",
            Self::Custom => "custom",
        }
    }

    /// Returns true if this backend requires a user-supplied endpoint.
    pub fn requires_endpoint(&self) -> bool {
        matches!(self, Self::Custom)
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The credential/model/endpoint triple for one completion request.
///
/// Immutable per request; required before any network call.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Which backend handles the request.
    pub service: ServiceId,
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model identifier on that backend.
    pub model: String,
    /// Endpoint override; mandatory for [`ServiceId::Custom`].
    pub endpoint: Option<String>,
}

impl ServiceConfig {
    /// Creates a configuration for a fixed-endpoint backend.
    pub fn new(
        service: ServiceId,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            service,
            api_key: Secret::new(api_key.into()),
            model: model.into(),
            endpoint: None,
        }
    }

    /// Sets the endpoint override (used by the custom backend).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Exposes the API key (for building the authorization header).
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Returns true if the key is present and non-empty.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.expose_secret().trim().is_empty()
    }

    /// Returns true if a model identifier is present.
    pub fn has_model(&self) -> bool {
        !self.model.trim().is_empty()
    }
}
