//! Settings Store Port - Interface to the persisted-settings collaborator.
//!
//! Settings persistence lives outside the core; the core only needs to
//! load the profile (falling back to defaults), save it, and project the
//! active backend's [`ServiceConfig`](crate::config::ServiceConfig).

use crate::config::{ServiceConfig, SettingsProfile};

/// Port for persisted user settings.
///
/// Implementations swallow their own I/O errors: `load` falls back to
/// defaults and `save` reports a plain boolean, logging the cause.
pub trait SettingsStore: Send + Sync {
    /// Loads the settings profile, or defaults when nothing usable is
    /// persisted.
    fn load(&self) -> SettingsProfile;

    /// Persists the profile. Returns false on failure.
    fn save(&self, profile: &SettingsProfile) -> bool;

    /// Applies a mutation on top of the persisted profile and saves the
    /// result (merge, not overwrite).
    fn update(&self, apply: &dyn Fn(&mut SettingsProfile)) -> bool {
        let mut profile = self.load();
        apply(&mut profile);
        self.save(&profile)
    }

    /// Restores the persisted profile to defaults.
    fn reset(&self) -> bool {
        self.save(&SettingsProfile::default())
    }

    /// Projects the [`ServiceConfig`] of the currently active backend.
    fn load_active_service_config(&self) -> ServiceConfig {
        self.load().active_service_config()
    }
}
