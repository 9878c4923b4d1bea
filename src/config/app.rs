//! Process-level configuration loaded from environment variables.

use serde::Deserialize;
use std::time::Duration;

use super::error::ConfigError;

/// Root application configuration.
///
/// Loaded from environment variables with the `PROMPTSMITH` prefix;
/// nested values use `__` as separator, e.g.
/// `PROMPTSMITH__CATALOG__DIR=/opt/promptsmith/resources`.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Framework catalog resource location.
    pub catalog: CatalogConfig,

    /// Settings persistence location.
    pub storage: StorageConfig,

    /// HTTP completion client tuning.
    pub client: ClientConfig,
}

impl AppConfig {
    /// Loads configuration from the environment.
    ///
    /// Reads a `.env` file first when present (development convenience),
    /// then environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("PROMPTSMITH").separator("__"))
            .build()?;

        let app: Self = config.try_deserialize()?;
        app.validate()?;
        Ok(app)
    }

    /// Validates loaded values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog.dir.trim().is_empty() {
            return Err(ConfigError::Invalid("catalog.dir must not be empty"));
        }
        if self.storage.settings_path.trim().is_empty() {
            return Err(ConfigError::Invalid("storage.settings_path must not be empty"));
        }
        if self.client.timeout_secs == 0 {
            return Err(ConfigError::Invalid("client.timeout_secs must be positive"));
        }
        Ok(())
    }
}

/// Where the framework index and documents live.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Directory containing `frameworks_summary.json` and `frameworks/`.
    pub dir: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            dir: "resources".to_string(),
        }
    }
}

/// Where the settings profile is persisted.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path of the JSON settings file.
    pub settings_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            settings_path: "promptsmith-settings.json".to_string(),
        }
    }
}

/// Completion client tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Per-attempt request timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum attempts for rate-limited requests.
    pub max_retries: u32,
    /// Base backoff delay in milliseconds (grows linearly per attempt).
    pub retry_base_delay_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_retries: 3,
            retry_base_delay_ms: 2000,
        }
    }
}

impl ClientConfig {
    /// Timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Base retry delay as a [`Duration`].
    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }
}
