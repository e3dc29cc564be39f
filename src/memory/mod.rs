//! Memory Module
//!
//! In-process conversation state: the per-session message history and the
//! store that owns one history per session. Nothing here is persisted.

pub mod conversation;
pub mod sessions;

pub use conversation::{Conversation, Message, Role};
pub use sessions::{SessionStore, SharedConversation, DEFAULT_MAX_SESSIONS, DEFAULT_SESSION};
