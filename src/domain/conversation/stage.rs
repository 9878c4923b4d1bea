//! Conversation stage machine.
//!
//! Tracks where the single live conversation is in its lifecycle.
//! Failure reverts (`Matching -> Initial`, `Generating -> Clarifying`)
//! are modeled as explicit transitions so every stage change goes
//! through validation; "new conversation" replaces the session
//! wholesale and is not a transition.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Lifecycle stage of the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Waiting for the first user utterance.
    #[default]
    Initial,

    /// Matching ran (or is running); awaiting a framework selection.
    Matching,

    /// Clarification rounds in progress.
    Clarifying,

    /// Final prompt generation in flight.
    Generating,

    /// A prompt has been generated; adjustments are accepted.
    Complete,
}

impl Stage {
    /// Returns true if `handle_send` accepts a free-text utterance in
    /// this stage.
    pub fn accepts_utterance(&self) -> bool {
        matches!(self, Self::Initial | Self::Clarifying | Self::Complete)
    }

    /// Returns true if the stage is waiting on a framework pick.
    pub fn awaits_selection(&self) -> bool {
        matches!(self, Self::Matching)
    }
}

impl StateMachine for Stage {
    fn can_transition_to(&self, target: &Self) -> bool {
        use Stage::*;
        matches!(
            (self, target),
            // First utterance kicks off matching
            (Initial, Matching) |
            // Match failure reverts
            (Matching, Initial) |
            // A selection was made
            (Matching, Clarifying) |
            // Enough information, or the round ceiling was hit
            (Clarifying, Generating) |
            // Generation finished
            (Generating, Complete) |
            // Generation failure reverts
            (Generating, Clarifying) |
            // Adjustment request or regeneration
            (Complete, Generating)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use Stage::*;
        match self {
            Initial => vec![Matching],
            Matching => vec![Initial, Clarifying],
            Clarifying => vec![Generating],
            Generating => vec![Complete, Clarifying],
            Complete => vec![Generating],
        }
    }
}
