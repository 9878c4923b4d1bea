//! Ports - Interfaces between the domain and the outside world.
//!
//! Following hexagonal architecture, these traits define what the core
//! needs from its collaborators (AI backends, persisted settings, bundled
//! resources) without coupling to any concrete implementation.

mod completion;
mod resource_store;
mod settings_store;

pub use completion::{ChatMessage, CompletionClient, CompletionError, MessageRole};
pub use resource_store::{ResourceError, ResourceStore};
pub use settings_store::SettingsStore;
