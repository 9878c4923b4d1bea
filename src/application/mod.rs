//! Application layer - the conversation controller.
//!
//! Orchestrates the domain services over the single live session and is
//! the only layer that catches component failures, always returning the
//! session to a stable stage.

mod controller;

pub use controller::{ControllerError, ControllerReply, ConversationController};
