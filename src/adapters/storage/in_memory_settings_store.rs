//! In-memory settings store for tests.

use std::sync::Mutex;

use crate::config::SettingsProfile;
use crate::ports::SettingsStore;

/// Settings store holding the profile in memory.
#[derive(Debug, Default)]
pub struct InMemorySettingsStore {
    profile: Mutex<SettingsProfile>,
}

impl InMemorySettingsStore {
    /// Creates a store holding the default profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with a profile.
    pub fn with_profile(profile: SettingsProfile) -> Self {
        Self {
            profile: Mutex::new(profile),
        }
    }
}

impl SettingsStore for InMemorySettingsStore {
    fn load(&self) -> SettingsProfile {
        self.profile.lock().expect("settings lock poisoned").clone()
    }

    fn save(&self, profile: &SettingsProfile) -> bool {
        *self.profile.lock().expect("settings lock poisoned") = profile.clone();
        true
    }
}
