//! JSON-file settings store.
//!
//! Persists the [`SettingsProfile`] as pretty-printed JSON. Per the
//! settings-store contract, I/O failures never propagate: loads fall
//! back to defaults and saves report a boolean, with the cause logged.

use std::path::PathBuf;

use crate::config::SettingsProfile;
use crate::ports::SettingsStore;

/// Settings store backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    /// Creates a store persisting to the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The configured settings path.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> SettingsProfile {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::debug!(path = %self.path.display(), error = %err, "no persisted settings; using defaults");
                return SettingsProfile::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(profile) => profile,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "persisted settings unreadable; using defaults");
                SettingsProfile::default()
            }
        }
    }

    fn save(&self, profile: &SettingsProfile) -> bool {
        let serialized = match serde_json::to_string_pretty(profile) {
            Ok(serialized) => serialized,
            Err(err) => {
                tracing::error!(error = %err, "failed to serialize settings");
                return false;
            }
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(err) = std::fs::create_dir_all(parent) {
                    tracing::error!(path = %parent.display(), error = %err, "failed to create settings directory");
                    return false;
                }
            }
        }

        match std::fs::write(&self.path, serialized) {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(path = %self.path.display(), error = %err, "failed to persist settings");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceId;

    #[test]
    fn round_trips_a_profile() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSettingsStore::new(dir.path().join("settings.json"));

        let profile = SettingsProfile {
            active_service: ServiceId::Kimi,
            kimi_api_key: "sk-kimi".into(),
            ..Default::default()
        };
        assert!(store.save(&profile));
        assert_eq!(store.load(), profile);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSettingsStore::new(dir.path().join("absent.json"));
        assert_eq!(store.load(), SettingsProfile::default());
    }

    #[test]
    fn corrupt_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = FileSettingsStore::new(path);
        assert_eq!(store.load(), SettingsProfile::default());
    }

    #[test]
    fn save_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSettingsStore::new(dir.path().join("nested/deeper/settings.json"));
        assert!(store.save(&SettingsProfile::default()));
        assert_eq!(store.load(), SettingsProfile::default());
    }

    #[test]
    fn update_merges_on_top_of_persisted_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSettingsStore::new(dir.path().join("settings.json"));

        let profile = SettingsProfile {
            deepseek_api_key: "sk-1".into(),
            ..Default::default()
        };
        assert!(store.save(&profile));

        assert!(store.update(&|p| p.active_service = ServiceId::Openrouter));

        let loaded = store.load();
        assert_eq!(loaded.active_service, ServiceId::Openrouter);
        // Untouched fields survive the update.
        assert_eq!(loaded.deepseek_api_key, "sk-1");
    }

    #[test]
    fn reset_restores_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSettingsStore::new(dir.path().join("settings.json"));
        let profile = SettingsProfile {
            deepseek_api_key: "sk-1".into(),
            ..Default::default()
        };
        assert!(store.save(&profile));
        assert!(store.reset());
        assert_eq!(store.load(), SettingsProfile::default());
    }
}
