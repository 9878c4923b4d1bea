//! Filesystem resource store.

use std::io::ErrorKind;
use std::path::PathBuf;

use crate::ports::{ResourceError, ResourceStore};

/// Loads catalog resources from a root directory.
#[derive(Debug, Clone)]
pub struct FsResourceStore {
    root: PathBuf,
}

impl FsResourceStore {
    /// Creates a store rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The configured root directory.
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

impl ResourceStore for FsResourceStore {
    fn load_text(&self, path: &str) -> Result<String, ResourceError> {
        let full = self.root.join(path);
        std::fs::read_to_string(&full).map_err(|err| match err.kind() {
            ErrorKind::NotFound => ResourceError::not_found(path),
            _ => ResourceError::read(path, err.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_files_relative_to_the_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("frameworks")).unwrap();
        std::fs::write(dir.path().join("frameworks/scqa.md"), "# SCQA Framework\n").unwrap();

        let store = FsResourceStore::new(dir.path());
        let text = store.load_text("frameworks/scqa.md").unwrap();
        assert_eq!(text, "# SCQA Framework\n");
    }

    #[test]
    fn missing_files_map_to_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsResourceStore::new(dir.path());
        assert!(matches!(
            store.load_text("frameworks/absent.md"),
            Err(ResourceError::NotFound { .. })
        ));
    }
}
