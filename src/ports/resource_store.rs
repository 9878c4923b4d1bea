//! Resource Store Port - Access to the bundled framework catalog files.
//!
//! The catalog never touches the filesystem directly; it asks this port
//! for the index and for individual framework documents by relative
//! path. Loading is synchronous on purpose: resources are local and
//! small, and network calls are the only suspend points in the core.

/// Port for loading catalog resources by relative path.
pub trait ResourceStore: Send + Sync {
    /// Loads a text resource, e.g. `"frameworks/scqa.md"`.
    fn load_text(&self, path: &str) -> Result<String, ResourceError>;
}

/// Resource loading failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ResourceError {
    /// The resource does not exist.
    #[error("resource not found: {path}")]
    NotFound {
        /// Relative path that was requested.
        path: String,
    },

    /// The resource exists but could not be read.
    #[error("failed to read resource {path}: {message}")]
    Read {
        /// Relative path that was requested.
        path: String,
        /// Underlying failure description.
        message: String,
    },
}

impl ResourceError {
    /// Creates a not-found error.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Creates a read error.
    pub fn read(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Read {
            path: path.into(),
            message: message.into(),
        }
    }
}
