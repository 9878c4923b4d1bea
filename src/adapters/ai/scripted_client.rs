//! Scripted completion client for tests.
//!
//! Returns queued replies (or errors) in order and records every
//! request for verification, so conversation flows can run without a
//! real backend.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::config::ServiceConfig;
use crate::ports::{ChatMessage, CompletionClient, CompletionError};

/// Completion client with a pre-scripted reply queue.
#[derive(Debug, Clone, Default)]
pub struct ScriptedCompletionClient {
    replies: Arc<Mutex<VecDeque<Result<String, CompletionError>>>>,
    calls: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
}

impl ScriptedCompletionClient {
    /// Creates a client with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful reply.
    pub fn with_reply(self, reply: impl Into<String>) -> Self {
        self.replies
            .lock()
            .expect("script lock poisoned")
            .push_back(Ok(reply.into()));
        self
    }

    /// Queues a failure.
    pub fn with_error(self, error: CompletionError) -> Self {
        self.replies
            .lock()
            .expect("script lock poisoned")
            .push_back(Err(error));
        self
    }

    /// Number of requests seen so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("call lock poisoned").len()
    }

    /// All recorded requests, oldest first.
    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().expect("call lock poisoned").clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletionClient {
    async fn send(
        &self,
        messages: &[ChatMessage],
        _config: &ServiceConfig,
    ) -> Result<String, CompletionError> {
        self.calls
            .lock()
            .expect("call lock poisoned")
            .push(messages.to_vec());

        self.replies
            .lock()
            .expect("script lock poisoned")
            .pop_front()
            .unwrap_or_else(|| Ok("scripted reply".to_string()))
    }
}
