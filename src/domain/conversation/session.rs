//! The single live conversation session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::catalog::FrameworkDetail;
use crate::domain::matching::RankedFramework;
use crate::ports::MessageRole;

use super::stage::Stage;

/// Default clarification round ceiling.
pub const DEFAULT_MAX_CLARIFICATION_ROUNDS: u32 = 2;

/// Requirement details accumulated across clarification rounds.
///
/// Accumulation is append/merge: answers and adjustment requests extend
/// `additional_info`; earlier rounds are never overwritten.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClarificationData {
    /// The user's original free-text request.
    pub original_input: String,
    pub goal: String,
    pub audience: String,
    pub context: String,
    pub format_requirements: String,
    pub constraints: String,
    /// Free-text answers and adjustment requests, newline-separated.
    pub additional_info: String,
}

impl ClarificationData {
    /// Creates clarification data seeded with the original request.
    pub fn for_input(input: impl Into<String>) -> Self {
        Self {
            original_input: input.into(),
            ..Default::default()
        }
    }

    /// Appends a clarification answer.
    pub fn append_answer(&mut self, answer: &str) {
        self.additional_info.push_str(answer);
        self.additional_info.push('\n');
    }

    /// Appends an adjustment request raised after generation.
    pub fn append_adjustment(&mut self, request: &str) {
        self.additional_info.push_str("\nAdjustment request: ");
        self.additional_info.push_str(request);
    }
}

/// One entry of the conversation transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: MessageRole,
    pub content: String,
    pub at: DateTime<Utc>,
}

/// The mutable state of the single live conversation.
///
/// Owned exclusively by the controller. Replaced wholesale on "new
/// conversation" rather than field-by-field reset.
#[derive(Debug, Clone)]
pub struct ConversationSession {
    pub id: Uuid,
    pub stage: Stage,
    /// The first utterance that started the conversation.
    pub user_input: String,
    /// Shortlist produced by the matcher, pending a selection.
    pub recommended_frameworks: Vec<RankedFramework>,
    /// Detail of the selected framework, once a pick was made.
    pub selected_framework: Option<FrameworkDetail>,
    /// Completed clarification rounds. Monotonically non-decreasing;
    /// never exceeds `max_clarification_rounds`.
    pub clarification_round: u32,
    /// Hard ceiling on clarification rounds, fixed at construction.
    pub max_clarification_rounds: u32,
    pub clarification_data: ClarificationData,
    pub history: Vec<HistoryEntry>,
    /// The latest generated prompt (raw model reply).
    pub generated_prompt: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConversationSession {
    /// Creates a fresh session with the default round ceiling.
    pub fn new() -> Self {
        Self::with_max_rounds(DEFAULT_MAX_CLARIFICATION_ROUNDS)
    }

    /// Creates a fresh session with an explicit round ceiling.
    pub fn with_max_rounds(max_clarification_rounds: u32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            stage: Stage::Initial,
            user_input: String::new(),
            recommended_frameworks: Vec::new(),
            selected_framework: None,
            clarification_round: 0,
            max_clarification_rounds,
            clarification_data: ClarificationData::default(),
            history: Vec::new(),
            generated_prompt: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Appends a transcript entry.
    pub fn record(&mut self, role: MessageRole, content: impl Into<String>) {
        let now = Utc::now();
        self.history.push(HistoryEntry {
            role,
            content: content.into(),
            at: now,
        });
        self.updated_at = now;
    }

    /// Starts the next clarification round and returns its number.
    pub fn begin_clarification_round(&mut self) -> u32 {
        self.clarification_round += 1;
        self.updated_at = Utc::now();
        self.clarification_round
    }

    /// Returns true once the round ceiling is reached.
    pub fn at_round_ceiling(&self) -> bool {
        self.clarification_round >= self.max_clarification_rounds
    }

    /// Rounds still available before the ceiling.
    pub fn remaining_rounds(&self) -> u32 {
        self.max_clarification_rounds
            .saturating_sub(self.clarification_round)
    }
}

impl Default for ConversationSession {
    fn default() -> Self {
        Self::new()
    }
}
