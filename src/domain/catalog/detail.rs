//! Parsed framework detail records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fully parsed framework document, cached by id for the process
/// lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkDetail {
    pub id: u32,
    /// Native-language name (from the index).
    pub name: String,
    /// English name (from the document title line).
    pub name_en: String,
    /// Reference URL.
    pub url: String,
    /// Application scenarios.
    pub scenarios: Vec<String>,
    /// One-paragraph overview.
    pub overview: String,
    /// Ordered framework elements.
    pub components: Vec<FrameworkComponent>,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    /// Worked examples used as style anchors during generation.
    pub examples: Vec<WorkedExample>,
}

impl FrameworkDetail {
    /// Complexity derived from the element count.
    pub fn complexity(&self) -> Complexity {
        match self.components.len() {
            0..=3 => Complexity::Simple,
            4..=5 => Complexity::Medium,
            _ => Complexity::Complex,
        }
    }
}

/// One element of a framework.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkComponent {
    /// Native-language element name.
    pub name_native: String,
    /// English element name.
    pub name_en: String,
    /// What the element contributes.
    pub description: String,
}

/// A worked example from a framework document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkedExample {
    pub title: String,
    pub body: String,
}

/// Framework complexity buckets.
///
/// Accepts both English and native labels on the wire, since the model
/// echoes whichever the catalog used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Complexity {
    #[serde(alias = "simple", alias = "简单")]
    Simple,
    #[default]
    #[serde(alias = "medium", alias = "中等")]
    Medium,
    #[serde(alias = "complex", alias = "复杂")]
    Complex,
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Complexity::Simple => "Simple",
            Complexity::Medium => "Medium",
            Complexity::Complex => "Complex",
        };
        f.write_str(label)
    }
}
