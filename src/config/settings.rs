//! Persisted settings profile: one key/model pair per backend.

use serde::{Deserialize, Serialize};

use super::service::{ServiceConfig, ServiceId};

/// Default model per backend, applied when nothing is persisted yet.
const DEFAULT_DEEPSEEK_MODEL: &str = "deepseek-chat";
const DEFAULT_KIMI_MODEL: &str = "kimi-k2-turbo-preview";
const DEFAULT_OPENROUTER_MODEL: &str = "anthropic/claude-sonnet-4.5";

/// The full persisted settings blob.
///
/// Keeps credentials for every backend so switching the active service
/// does not lose the others. The core never reads this directly for
/// completion calls; it projects [`ServiceConfig`] via
/// [`active_service_config`](Self::active_service_config).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsProfile {
    /// Which backend is currently in use.
    pub active_service: ServiceId,

    pub deepseek_api_key: String,
    pub deepseek_model: String,

    pub kimi_api_key: String,
    pub kimi_model: String,

    pub openrouter_api_key: String,
    pub openrouter_model: String,

    pub custom_api_key: String,
    pub custom_model: String,
    pub custom_endpoint: String,
}

impl Default for SettingsProfile {
    fn default() -> Self {
        Self {
            active_service: ServiceId::Deepseek,
            deepseek_api_key: String::new(),
            deepseek_model: DEFAULT_DEEPSEEK_MODEL.to_string(),
            kimi_api_key: String::new(),
            kimi_model: DEFAULT_KIMI_MODEL.to_string(),
            openrouter_api_key: String::new(),
            openrouter_model: DEFAULT_OPENROUTER_MODEL.to_string(),
            custom_api_key: String::new(),
            custom_model: String::new(),
            custom_endpoint: String::new(),
        }
    }
}

impl SettingsProfile {
    /// Checks that the active backend has every field it requires.
    ///
    /// Each backend has a fixed required-field set: key + model, plus the
    /// endpoint for the custom backend.
    pub fn validate(&self) -> ConfigValidation {
        let mut missing = Vec::new();

        match self.active_service {
            ServiceId::Deepseek => {
                push_if_empty(&mut missing, &self.deepseek_api_key, "deepseekApiKey");
                push_if_empty(&mut missing, &self.deepseek_model, "deepseekModel");
            }
            ServiceId::Kimi => {
                push_if_empty(&mut missing, &self.kimi_api_key, "kimiApiKey");
                push_if_empty(&mut missing, &self.kimi_model, "kimiModel");
            }
            ServiceId::Openrouter => {
                push_if_empty(&mut missing, &self.openrouter_api_key, "openrouterApiKey");
                push_if_empty(&mut missing, &self.openrouter_model, "openrouterModel");
            }
            ServiceId::Custom => {
                push_if_empty(&mut missing, &self.custom_api_key, "customApiKey");
                push_if_empty(&mut missing, &self.custom_model, "customModel");
                push_if_empty(&mut missing, &self.custom_endpoint, "customEndpoint");
            }
        }

        ConfigValidation {
            is_valid: missing.is_empty(),
            missing_fields: missing,
        }
    }

    /// Projects the active backend's [`ServiceConfig`].
    pub fn active_service_config(&self) -> ServiceConfig {
        match self.active_service {
            ServiceId::Deepseek => ServiceConfig::new(
                ServiceId::Deepseek,
                self.deepseek_api_key.clone(),
                self.deepseek_model.clone(),
            ),
            ServiceId::Kimi => ServiceConfig::new(
                ServiceId::Kimi,
                self.kimi_api_key.clone(),
                self.kimi_model.clone(),
            ),
            ServiceId::Openrouter => ServiceConfig::new(
                ServiceId::Openrouter,
                self.openrouter_api_key.clone(),
                self.openrouter_model.clone(),
            ),
            ServiceId::Custom => ServiceConfig::new(
                ServiceId::Custom,
                self.custom_api_key.clone(),
                self.custom_model.clone(),
            )
            .with_endpoint(self.custom_endpoint.clone()),
        }
    }

    /// Credential-free view suitable for export or display.
    pub fn export(&self) -> SettingsExport {
        SettingsExport {
            active_service: self.active_service,
            deepseek_model: self.deepseek_model.clone(),
            kimi_model: self.kimi_model.clone(),
            openrouter_model: self.openrouter_model.clone(),
            custom_model: self.custom_model.clone(),
            custom_endpoint: self.custom_endpoint.clone(),
        }
    }
}

fn push_if_empty(missing: &mut Vec<&'static str>, value: &str, field: &'static str) {
    if value.trim().is_empty() {
        missing.push(field);
    }
}

/// Result of a per-backend required-field check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidation {
    /// True when every required field of the active backend is present.
    pub is_valid: bool,
    /// Names of the missing fields, in declaration order.
    pub missing_fields: Vec<&'static str>,
}

/// Settings with every credential stripped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsExport {
    pub active_service: ServiceId,
    pub deepseek_model: String,
    pub kimi_model: String,
    pub openrouter_model: String,
    pub custom_model: String,
    pub custom_endpoint: String,
}
