use std::time::Duration;

use async_trait::async_trait;
use ollama_rs::generation::chat::{request::ChatMessageRequest, ChatMessage};
use ollama_rs::Ollama;
use thiserror::Error;
use tracing::debug;

use crate::memory::{Message, Role};

/// Failure talking to the inference backend
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("model backend did not answer within {0:?}")]
    Timeout(Duration),
    #[error("model backend request failed: {0}")]
    Upstream(String),
}

#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Send the full message history and return the assistant's reply text.
    async fn chat(&self, messages: &[Message]) -> Result<String, BackendError>;

    fn model(&self) -> &str;
}

pub struct OllamaProvider {
    client: Ollama,
    model: String,
}

impl OllamaProvider {
    pub fn new(client: Ollama, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Names of the models the backend has pulled locally
    pub async fn local_models(&self) -> Result<Vec<String>, BackendError> {
        let models = self
            .client
            .list_local_models()
            .await
            .map_err(|e| BackendError::Upstream(e.to_string()))?;
        Ok(models.into_iter().map(|m| m.name).collect())
    }
}

fn to_chat_message(message: &Message) -> ChatMessage {
    let content = message.content.clone();
    match message.role {
        Role::System => ChatMessage::system(content),
        Role::User => ChatMessage::user(content),
        Role::Assistant => ChatMessage::assistant(content),
    }
}

#[async_trait]
impl LLMProvider for OllamaProvider {
    async fn chat(&self, messages: &[Message]) -> Result<String, BackendError> {
        let request = ChatMessageRequest::new(
            self.model.clone(),
            messages.iter().map(to_chat_message).collect(),
        );

        debug!("Sending {} messages to {}", messages.len(), self.model);
        let res = self
            .client
            .send_chat_messages(request)
            .await
            .map_err(|e| BackendError::Upstream(e.to_string()))?;

        Ok(res.message.content)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
