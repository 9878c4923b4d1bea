//! Clarification Engine - the bounded question/answer loop.
//!
//! Each round asks the model either for the most valuable open
//! questions or, on the final allowed round, for an unconditional
//! completion signal. The returned `is_complete` flag is advisory: the
//! controller's round ceiling is authoritative.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::domain::catalog::FrameworkDetail;
use crate::domain::conversation::ClarificationData;
use crate::domain::payload::{extract_structured_payload, PayloadError};
use crate::domain::prompts;
use crate::ports::{ChatMessage, CompletionClient, CompletionError};

/// One clarification question proposed by the model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClarificationQuestion {
    /// Which requirement dimension the question targets.
    pub dimension: String,
    /// The question itself.
    pub question: String,
    /// Why the question matters.
    pub hint: String,
}

/// Result of one clarification round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClarificationOutcome {
    /// Questions to put to the user (empty when complete).
    pub questions: Vec<ClarificationQuestion>,
    /// Model-asserted sufficiency. Advisory only.
    pub is_complete: bool,
}

/// Clarification failures.
#[derive(Debug, thiserror::Error)]
pub enum ClarificationError {
    #[error("clarification round failed: {0}")]
    Completion(#[from] CompletionError),

    #[error("could not parse clarification questions: {0}")]
    Parse(#[from] PayloadError),
}

/// Drives the bounded question/answer loop against the model.
pub struct ClarificationEngine {
    client: Arc<dyn CompletionClient>,
}

impl ClarificationEngine {
    /// Creates an engine over the given completion client.
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Runs one clarification round.
    ///
    /// `round` is 1-based; when `round >= max_rounds` the model is
    /// instructed to report completion unconditionally.
    pub async fn ask(
        &self,
        framework: &FrameworkDetail,
        user_input: &str,
        data: &ClarificationData,
        config: &ServiceConfig,
        round: u32,
        max_rounds: u32,
    ) -> Result<ClarificationOutcome, ClarificationError> {
        let remaining = max_rounds.saturating_sub(round);
        let round_note = if remaining > 0 {
            format!("(round {round}; {remaining} confirmation round(s) remain)")
        } else {
            "(this is the final round; set isComplete to true)".to_string()
        };

        let elements: Vec<String> = framework
            .components
            .iter()
            .map(|c| format!("{}({})", c.name_native, c.name_en))
            .collect();

        let collected =
            serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string());

        let user_prompt = format!(
            "Framework: {}\n\
             Framework elements: {}\n\n\
             Original user request: {}\n\n\
             Collected information:\n{}\n\n\
             {}\n\
             Based on the framework's requirements and the information \
             collected so far, ask the most critical clarification \
             questions to fill the gaps.",
            framework.name,
            elements.join(", "),
            user_input,
            collected,
            round_note,
        );

        let messages = [
            prompts::clarification_system_prompt(round, max_rounds),
            ChatMessage::user(user_prompt),
        ];

        let reply = self.client.send(&messages, config).await?;
        let payload = extract_structured_payload(&reply, "questions")?;
        serde_json::from_value(payload).map_err(|err| {
            ClarificationError::Parse(PayloadError::Unrecoverable {
                key: "questions".to_string(),
                message: err.to_string(),
            })
        })
    }
}
