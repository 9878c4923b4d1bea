//! State machine trait for lifecycle enums.
//!
//! Provides a consistent interface for validating and performing state
//! transitions, keeping transition rules in one place per enum.

/// Trait for status enums that represent state machines.
///
/// Implementors define valid transitions and get a validated
/// `transition_to` for free.
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from the current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs the transition with validation.
    fn transition_to(&self, target: Self) -> Result<Self, TransitionError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(TransitionError {
                from: format!("{:?}", self),
                to: format!("{:?}", target),
            })
        }
    }

    /// Checks if the current state has no valid outgoing transitions.
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

/// An attempted transition that the state machine forbids.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot transition from {from} to {to}")]
pub struct TransitionError {
    /// State the transition started from.
    pub from: String,
    /// State the transition targeted.
    pub to: String,
}
