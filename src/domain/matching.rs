//! Framework Matcher - ranks catalog frameworks against a user request.
//!
//! Builds one ranking prompt over the whole catalog, sends it through
//! the completion client, and recovers the ranked shortlist from the
//! reply. Ranking quality is the model's responsibility; this component
//! only guarantees syntactic recovery of whatever came back.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::domain::catalog::{CatalogError, Complexity, FrameworkCatalog};
use crate::domain::payload::{extract_structured_payload, PayloadError};
use crate::domain::prompts;
use crate::ports::{ChatMessage, CompletionClient, CompletionError};

/// One ranked recommendation from the matcher.
///
/// Transient output: it lives in the session only until a selection is
/// made, after which the loaded
/// [`FrameworkDetail`](crate::domain::catalog::FrameworkDetail) takes
/// over.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RankedFramework {
    /// Native-language framework name as asserted by the model.
    pub name: String,
    /// English framework name.
    pub name_en: String,
    /// Why the model recommends it.
    pub reason: String,
    /// Model-asserted complexity.
    pub complexity: Complexity,
    /// Model-asserted element count.
    pub elements: u32,
}

/// Framework matching failures.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error("framework matching failed: {0}")]
    Completion(#[from] CompletionError),

    #[error("could not parse framework recommendations: {0}")]
    Parse(#[from] PayloadError),

    #[error("framework matching needs the catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("recommendation payload had an unexpected shape: {0}")]
    Shape(String),
}

/// Ranks catalog frameworks against free-text user requests.
pub struct FrameworkMatcher {
    client: Arc<dyn CompletionClient>,
}

impl FrameworkMatcher {
    /// Creates a matcher over the given completion client.
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Returns the model's ranked shortlist for a user request.
    pub async fn match_frameworks(
        &self,
        catalog: &FrameworkCatalog,
        user_input: &str,
        config: &ServiceConfig,
    ) -> Result<Vec<RankedFramework>, MatchError> {
        let listing = build_framework_listing(catalog)?;
        let user_prompt = format!(
            "User request: {user_input}\n\n\
             Available frameworks:\n{listing}\n\n\
             Analyze the request against these dimensions:\n\
             1. Scenario fit (weight 40%)\n\
             2. Complexity fit (weight 30%)\n\
             3. Domain fit (weight 20%)\n\
             4. Framework popularity (weight 10%)\n\n\
             Recommend the 2 best-suited frameworks."
        );

        let messages = [
            prompts::framework_matching_system_prompt(),
            ChatMessage::user(user_prompt),
        ];

        let reply = self.client.send(&messages, config).await?;
        parse_recommendations(&reply)
    }
}

/// Renders every catalog entry as `{id}. {name} - scenarios: {tags}`.
fn build_framework_listing(catalog: &FrameworkCatalog) -> Result<String, CatalogError> {
    let lines: Vec<String> = catalog
        .entries()?
        .iter()
        .map(|entry| {
            format!(
                "{}. {} - scenarios: {}",
                entry.id, entry.name, entry.scenario_tags
            )
        })
        .collect();
    Ok(lines.join("\n"))
}

/// Recovers the ranked list from a model reply.
fn parse_recommendations(reply: &str) -> Result<Vec<RankedFramework>, MatchError> {
    let mut payload = extract_structured_payload(reply, "frameworks")?;

    match payload.get_mut("frameworks") {
        Some(frameworks) => serde_json::from_value(frameworks.take())
            .map_err(|err| MatchError::Shape(err.to_string())),
        // A recovered payload without the key counts as zero
        // recommendations, not a failure.
        None => Ok(Vec::new()),
    }
}
