//! Story Backend
//!
//! HTTP backend for an interactive storytelling front end:
//! - Proxies chat turns to a local Ollama model
//! - Keeps one linear conversation history per session
//! - Separates `<think>` reasoning from the final answer and renders both as HTML
//! - Forwards profanity scoring requests to a third-party API

pub mod agent;
pub mod config;
pub mod memory;
pub mod orchestrator;
pub mod response;
pub mod server;
pub mod services;
pub mod utils;

// Re-exports for convenience
pub use agent::{BackendError, LLMProvider, OllamaProvider};
pub use config::StoryConfig;
pub use memory::{Conversation, SessionStore};
pub use orchestrator::Narrator;
pub use response::{ThoughtSplitter, TurnReply};
pub use server::AppState;
