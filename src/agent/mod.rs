//! Agent Module
//!
//! The model backend seam: a provider trait and its Ollama implementation.

mod provider;

pub use provider::{BackendError, LLMProvider, OllamaProvider};
