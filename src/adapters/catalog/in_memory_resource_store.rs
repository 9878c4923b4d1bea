//! In-memory resource store for tests and fixtures.

use std::collections::HashMap;

use crate::ports::{ResourceError, ResourceStore};

/// Resource store backed by a path → text map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryResourceStore {
    resources: HashMap<String, String>,
}

impl InMemoryResourceStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a resource under a relative path.
    pub fn with_resource(mut self, path: impl Into<String>, text: impl Into<String>) -> Self {
        self.resources.insert(path.into(), text.into());
        self
    }
}

impl ResourceStore for InMemoryResourceStore {
    fn load_text(&self, path: &str) -> Result<String, ResourceError> {
        self.resources
            .get(path)
            .cloned()
            .ok_or_else(|| ResourceError::not_found(path))
    }
}
