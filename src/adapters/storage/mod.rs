//! Storage adapters - settings store implementations.

mod file_settings_store;
mod in_memory_settings_store;

pub use file_settings_store::FileSettingsStore;
pub use in_memory_settings_store::InMemorySettingsStore;
