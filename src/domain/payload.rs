//! Structured-payload recovery from free-text model replies.
//!
//! Models are instructed to answer with a JSON object, but replies often
//! wrap it in prose or a markdown fence. Recovery runs three tiers in
//! order, each only when the previous one found nothing usable:
//!
//! 1. a fenced ```json block,
//! 2. the outermost `{...}` span, accepted when it mentions the
//!    required key,
//! 3. the whole reply parsed as one JSON document.
//!
//! Both the matcher and the clarification engine share this single
//! implementation so the heuristics are tested once.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static FENCED_JSON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```json[ \t]*\n(.*?)\n[ \t]*```").expect("valid fence pattern"));

/// Recovers the structured payload of a model reply.
///
/// `required_key` is the key the payload must carry (e.g. `frameworks`,
/// `questions`); it gates the raw-span tier so arbitrary braces in prose
/// are not mistaken for the payload.
pub fn extract_structured_payload(text: &str, required_key: &str) -> Result<Value, PayloadError> {
    // Tier 1: fenced ```json block.
    if let Some(caps) = FENCED_JSON.captures(text) {
        let inner = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        if let Ok(value) = serde_json::from_str(inner) {
            return Ok(value);
        }
    }

    // Tier 2: outermost brace span containing the required key.
    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if start < end {
            let span = &text[start..=end];
            if span.contains(&format!("\"{}\"", required_key)) {
                if let Ok(value) = serde_json::from_str(span) {
                    return Ok(value);
                }
            }
        }
    }

    // Tier 3: the whole reply.
    serde_json::from_str(text.trim()).map_err(|err| PayloadError::Unrecoverable {
        key: required_key.to_string(),
        message: err.to_string(),
    })
}

/// All recovery tiers failed.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PayloadError {
    #[error("no structured payload containing \"{key}\" could be recovered: {message}")]
    Unrecoverable {
        /// Key the caller required.
        key: String,
        /// Parse failure from the last tier.
        message: String,
    },
}
