//! Conversation state: the session record and its stage machine.

mod session;
mod stage;

pub use session::{
    ClarificationData, ConversationSession, HistoryEntry, DEFAULT_MAX_CLARIFICATION_ROUNDS,
};
pub use stage::Stage;
