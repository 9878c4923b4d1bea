//! Framework index loading and enrichment.

use serde::Deserialize;

use super::CatalogError;

/// One row of the framework index, enriched with its document path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameworkIndexEntry {
    /// Unique, non-negative framework id.
    pub id: u32,
    /// Native-language framework name.
    pub name: String,
    /// English framework name (may be empty for older index rows).
    pub name_en: String,
    /// Comma-separated scenario tags.
    pub scenario_tags: String,
    /// Relative path of the framework document, derived from `filename`.
    pub document_path: String,
}

/// Raw index record as persisted in `frameworks_summary.json`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawIndexRecord {
    id: u32,
    name: String,
    #[serde(default)]
    name_en: String,
    #[serde(default)]
    scenario: String,
    filename: String,
}

/// Parses the index resource and derives each entry's document path.
pub fn parse_index(raw: &str) -> Result<Vec<FrameworkIndexEntry>, CatalogError> {
    let records: Vec<RawIndexRecord> =
        serde_json::from_str(raw).map_err(|err| CatalogError::Index(err.to_string()))?;

    Ok(records
        .into_iter()
        .map(|record| FrameworkIndexEntry {
            id: record.id,
            name: record.name,
            name_en: record.name_en,
            scenario_tags: record.scenario,
            document_path: format!("frameworks/{}", record.filename),
        })
        .collect())
}
