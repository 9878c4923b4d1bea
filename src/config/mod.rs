//! Application configuration module
//!
//! Two kinds of configuration live here:
//!
//! - [`SettingsProfile`] / [`ServiceConfig`]: the user-owned credential
//!   profile persisted through the settings-store port, holding one
//!   key/model pair per supported AI backend.
//! - [`AppConfig`]: process-level configuration loaded from environment
//!   variables with the `PROMPTSMITH` prefix (`__` separates nested
//!   values), covering resource locations and HTTP client tuning.

mod app;
mod error;
mod service;
mod settings;

pub use app::{AppConfig, CatalogConfig, ClientConfig, StorageConfig};
pub use error::ConfigError;
pub use service::{ServiceConfig, ServiceId};
pub use settings::{ConfigValidation, SettingsExport, SettingsProfile};
