//! Orchestrator Module
//!
//! Coordinates a story turn: conversation updates, the model call, and
//! rendering of the reply.

pub mod feedback;
pub mod narrator;

pub use feedback::{FeedbackOption, FEEDBACK_OPTIONS};
pub use narrator::Narrator;
