//! Conversation - Linear chat history for one story session
//!
//! Holds the ordered, role-tagged messages exchanged with the model.
//! Every turn sends the whole sequence, so nothing is ever trimmed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role in a conversation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single message in the history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Ordered message history seeded with a fixed system prompt
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
    initial_prompt: String,
}

impl Conversation {
    /// Create a conversation already seeded with the initial system prompt
    pub fn new(initial_prompt: impl Into<String>) -> Self {
        let mut conversation = Self {
            messages: Vec::new(),
            initial_prompt: initial_prompt.into(),
        };
        conversation.reset();
        conversation
    }

    /// Clear all history and re-seed the initial system prompt
    pub fn reset(&mut self) {
        self.messages.clear();
        self.messages.push(Message::new(Role::System, self.initial_prompt.clone()));
    }

    /// Add a user message
    pub fn append_user(&mut self, content: impl Into<String>) {
        self.push(Role::User, content);
    }

    /// Add a system message
    pub fn append_system(&mut self, content: impl Into<String>) {
        self.push(Role::System, content);
    }

    /// Add an assistant response
    pub fn append_assistant(&mut self, content: impl Into<String>) {
        self.push(Role::Assistant, content);
    }

    fn push(&mut self, role: Role, content: impl Into<String>) {
        self.messages.push(Message::new(role, content));
    }

    /// Copy of the full history, in order, for sending to the model
    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.clone()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn initial_prompt(&self) -> &str {
        &self.initial_prompt
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_seeds_single_system_message() {
        let mut conversation = Conversation::new("Tell me a story.");
        conversation.append_user("hello");
        conversation.append_assistant("once upon a time");

        conversation.reset();

        let snapshot = conversation.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].role, Role::System);
        assert_eq!(snapshot[0].content, "Tell me a story.");
    }

    #[test]
    fn test_append_user_after_reset() {
        let mut conversation = Conversation::new("seed");
        conversation.reset();
        conversation.append_user("hi");

        let snapshot = conversation.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[1].role, Role::User);
        assert_eq!(snapshot[1].content, "hi");
    }

    #[test]
    fn test_order_is_preserved_and_empty_content_allowed() {
        let mut conversation = Conversation::new("seed");
        conversation.append_system("be concise");
        conversation.append_system("");
        conversation.append_user("next");

        let roles: Vec<Role> = conversation.messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::System, Role::System, Role::System, Role::User]);
        assert_eq!(conversation.messages()[2].content, "");
        assert_eq!(conversation.last().map(|m| m.content.as_str()), Some("next"));
    }

    #[test]
    fn test_snapshot_is_isolated_from_later_appends() {
        let mut conversation = Conversation::new("seed");
        let before = conversation.snapshot();
        conversation.append_user("later");

        assert_eq!(before.len(), 1);
        assert_eq!(conversation.len(), 2);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_value(Message::new(Role::Assistant, "x")).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "x");
    }
}
