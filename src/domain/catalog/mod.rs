//! Framework Catalog - the framework knowledge engine.
//!
//! Loads the framework index once at startup, resolves model-asserted
//! framework names back to catalog ids, and lazily parses per-framework
//! documents into [`FrameworkDetail`] records behind an id-keyed cache.

mod detail;
mod index;
mod parser;

pub use detail::{Complexity, FrameworkComponent, FrameworkDetail, WorkedExample};
pub use index::FrameworkIndexEntry;
pub use parser::parse_framework_document;

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::ports::{ResourceError, ResourceStore};

/// Relative path of the framework index resource.
pub const INDEX_PATH: &str = "frameworks_summary.json";

/// Catalog failures.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The catalog was used before a successful `initialize`.
    #[error("framework catalog has not been initialized")]
    Uninitialized,

    /// The id is absent from the index.
    #[error("unknown framework id: {0}")]
    NotFound(u32),

    /// A resource could not be loaded.
    #[error("failed to load catalog resource: {0}")]
    Load(#[from] ResourceError),

    /// The index resource did not deserialize.
    #[error("failed to parse framework index: {0}")]
    Index(String),

    /// A framework document had no recognizable structure.
    #[error("framework document has no recognizable structure: {path}")]
    Parse {
        /// Relative path of the offending document.
        path: String,
    },
}

/// The framework catalog.
///
/// Owned by the conversation controller; the detail cache lives for the
/// process lifetime (the catalog is small and read-mostly, so there is
/// no eviction).
#[derive(Debug, Default)]
pub struct FrameworkCatalog {
    index: Option<Vec<FrameworkIndexEntry>>,
    cache: HashMap<u32, FrameworkDetail>,
}

impl FrameworkCatalog {
    /// Creates an empty, uninitialized catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the framework index.
    ///
    /// Returns false on failure and leaves the catalog unusable; callers
    /// must check before use. Repeated calls reload the index
    /// unconditionally. The detail cache survives reloads.
    pub fn initialize(&mut self, store: &dyn ResourceStore) -> bool {
        match Self::load_index(store) {
            Ok(entries) => {
                tracing::info!(frameworks = entries.len(), "framework catalog initialized");
                self.index = Some(entries);
                true
            }
            Err(err) => {
                tracing::error!(error = %err, "framework catalog initialization failed");
                self.index = None;
                false
            }
        }
    }

    fn load_index(store: &dyn ResourceStore) -> Result<Vec<FrameworkIndexEntry>, CatalogError> {
        let raw = store.load_text(INDEX_PATH)?;
        index::parse_index(&raw)
    }

    /// Returns true once `initialize` has succeeded.
    pub fn is_initialized(&self) -> bool {
        self.index.is_some()
    }

    /// The loaded index entries.
    pub fn entries(&self) -> Result<&[FrameworkIndexEntry], CatalogError> {
        self.index.as_deref().ok_or(CatalogError::Uninitialized)
    }

    /// Resolves a framework name to its catalog id.
    ///
    /// Tries an exact match on the native or English name first, then a
    /// normalized mutual-containment match (lowercased, with whitespace,
    /// hyphens, and underscores stripped). When several entries qualify,
    /// the first one in catalog order wins; that pick is arbitrary in
    /// pathological duplicate-name catalogs.
    pub fn find_id_by_name(&self, name: &str, name_en: &str) -> Option<u32> {
        let index = self.index.as_deref()?;

        let exact = index.iter().find(|entry| {
            entry.name == name
                || entry.name == name_en
                || (!entry.name_en.is_empty()
                    && (entry.name_en == name || entry.name_en == name_en))
        });
        if let Some(entry) = exact {
            return Some(entry.id);
        }

        let query = normalize_name(if name.is_empty() { name_en } else { name });
        if query.is_empty() {
            return None;
        }

        index
            .iter()
            .find(|entry| {
                let native = normalize_name(&entry.name);
                let english = normalize_name(&entry.name_en);
                mutually_contains(&native, &query) || mutually_contains(&english, &query)
            })
            .map(|entry| entry.id)
    }

    /// Returns the parsed detail for a framework, loading and caching it
    /// on first access.
    pub fn load_detail(
        &mut self,
        id: u32,
        store: &dyn ResourceStore,
    ) -> Result<&FrameworkDetail, CatalogError> {
        let index = self.index.as_deref().ok_or(CatalogError::Uninitialized)?;

        match self.cache.entry(id) {
            Entry::Occupied(cached) => Ok(cached.into_mut()),
            Entry::Vacant(slot) => {
                let entry = index
                    .iter()
                    .find(|entry| entry.id == id)
                    .ok_or(CatalogError::NotFound(id))?;
                let text = store.load_text(&entry.document_path)?;
                let detail = parse_framework_document(&text, entry)?;
                Ok(slot.insert(detail))
            }
        }
    }
}

/// Lowercases and strips whitespace, hyphens, and underscores.
fn normalize_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .collect()
}

/// Containment in either direction; empty candidates never match.
fn mutually_contains(candidate: &str, query: &str) -> bool {
    !candidate.is_empty() && (candidate.contains(query) || query.contains(candidate))
}
