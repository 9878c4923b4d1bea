//! AI adapters - completion client implementations.

mod http_client;
mod scripted_client;

pub use http_client::{ClientOptions, HttpCompletionClient};
pub use scripted_client::ScriptedCompletionClient;
