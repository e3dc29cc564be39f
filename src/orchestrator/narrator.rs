//! Narrator - Runs one story turn against the model backend
//!
//! Each operation mutates the conversation it is handed, sends the complete
//! history to the provider, records the reply as an assistant message, then
//! splits and renders it. Callers hold the conversation lock for the whole
//! call so a turn is never interleaved with another.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::agent::{BackendError, LLMProvider};
use crate::memory::Conversation;
use crate::response::{ThoughtSplitter, TurnReply};

pub struct Narrator {
    provider: Arc<dyn LLMProvider>,
    splitter: ThoughtSplitter,
    timeout: Duration,
}

impl Narrator {
    pub fn new(provider: Arc<dyn LLMProvider>) -> Self {
        Self {
            provider,
            splitter: ThoughtSplitter::default(),
            timeout: Duration::from_secs(300),
        }
    }

    pub fn with_splitter(mut self, splitter: ThoughtSplitter) -> Self {
        self.splitter = splitter;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    /// Restart the story from the initial prompt
    pub async fn start(&self, conversation: &mut Conversation) -> Result<TurnReply, BackendError> {
        conversation.reset();
        info!("Starting new story with {}", self.model());
        self.respond(conversation).await
    }

    /// Continue the story with a user prompt
    pub async fn question(&self, conversation: &mut Conversation, prompt: impl Into<String>) -> Result<TurnReply, BackendError> {
        conversation.append_user(prompt);
        self.respond(conversation).await
    }

    /// Add steering instructions as system messages, then ask again
    pub async fn feedback<I, S>(&self, conversation: &mut Conversation, feedback: I) -> Result<TurnReply, BackendError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut added = 0;
        for message in feedback {
            conversation.append_system(message);
            added += 1;
        }
        info!("Applied {} feedback messages", added);
        self.respond(conversation).await
    }

    /// Query the model with the whole history and record its reply
    pub async fn complete(&self, conversation: &mut Conversation) -> Result<String, BackendError> {
        let history = conversation.snapshot();
        for message in &history {
            debug!("{:?}: {}", message.role, message.content);
        }

        let reply = match tokio::time::timeout(self.timeout, self.provider.chat(&history)).await {
            Ok(result) => result?,
            Err(_) => {
                warn!("Model call exceeded {:?}", self.timeout);
                return Err(BackendError::Timeout(self.timeout));
            }
        };

        conversation.append_assistant(reply.clone());
        Ok(reply)
    }

    async fn respond(&self, conversation: &mut Conversation) -> Result<TurnReply, BackendError> {
        let raw = self.complete(conversation).await?;
        Ok(self.splitter.render(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{Message, Role};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use tokio::sync::Mutex;

    struct ScriptedProvider {
        replies: Mutex<VecDeque<String>>,
        seen: Mutex<Vec<Vec<Message>>>,
    }

    impl ScriptedProvider {
        fn new(replies: &[&str]) -> Self {
            Self {
                replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LLMProvider for ScriptedProvider {
        async fn chat(&self, messages: &[Message]) -> Result<String, BackendError> {
            self.seen.lock().await.push(messages.to_vec());
            self.replies
                .lock()
                .await
                .pop_front()
                .ok_or_else(|| BackendError::Upstream("script exhausted".into()))
        }

        fn model(&self) -> &str {
            "scripted"
        }
    }

    struct SlowProvider;

    #[async_trait]
    impl LLMProvider for SlowProvider {
        async fn chat(&self, _messages: &[Message]) -> Result<String, BackendError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("too late".into())
        }

        fn model(&self) -> &str {
            "slow"
        }
    }

    #[tokio::test]
    async fn test_start_resets_and_records_reply() {
        let provider = Arc::new(ScriptedProvider::new(&["<think>plan</think>answer"]));
        let narrator = Narrator::new(provider.clone());
        let mut conversation = Conversation::new("seed");
        conversation.append_user("stale");

        let reply = narrator.start(&mut conversation).await.unwrap();

        assert_eq!(reply.thoughts.as_deref(), Some("<p>plan</p>\n"));
        assert_eq!(reply.output, "<p>answer</p>\n");
        let seen = provider.seen.lock().await;
        assert_eq!(seen[0].len(), 1);
        assert_eq!(seen[0][0].content, "seed");
        assert_eq!(conversation.len(), 2);
        assert_eq!(conversation.messages()[1].role, Role::Assistant);
        assert_eq!(conversation.messages()[1].content, "<think>plan</think>answer");
    }

    #[tokio::test]
    async fn test_question_sends_full_history_including_new_message() {
        let provider = Arc::new(ScriptedProvider::new(&["first", "second"]));
        let narrator = Narrator::new(provider.clone());
        let mut conversation = Conversation::new("seed");

        narrator.start(&mut conversation).await.unwrap();
        narrator.question(&mut conversation, "what next?").await.unwrap();

        let seen = provider.seen.lock().await;
        let contents: Vec<&str> = seen[1].iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["seed", "first", "what next?"]);
        assert_eq!(conversation.len(), 4);
    }

    #[tokio::test]
    async fn test_feedback_appends_system_messages_in_order() {
        let provider = Arc::new(ScriptedProvider::new(&["revised"]));
        let narrator = Narrator::new(provider.clone());
        let mut conversation = Conversation::new("seed");

        narrator
            .feedback(&mut conversation, vec!["be concise", "use bullet points"])
            .await
            .unwrap();

        let seen = provider.seen.lock().await;
        let sent: Vec<(Role, &str)> = seen[0].iter().map(|m| (m.role, m.content.as_str())).collect();
        assert_eq!(
            sent,
            vec![
                (Role::System, "seed"),
                (Role::System, "be concise"),
                (Role::System, "use bullet points"),
            ]
        );
    }

    #[tokio::test]
    async fn test_backend_error_keeps_user_message_without_reply() {
        let provider = Arc::new(ScriptedProvider::new(&[]));
        let narrator = Narrator::new(provider);
        let mut conversation = Conversation::new("seed");

        let err = narrator.question(&mut conversation, "hello").await.unwrap_err();

        assert!(matches!(err, BackendError::Upstream(_)));
        assert_eq!(conversation.len(), 2);
        assert_eq!(conversation.last().map(|m| m.role), Some(Role::User));
    }

    #[tokio::test]
    async fn test_slow_backend_times_out() {
        let narrator = Narrator::new(Arc::new(SlowProvider)).with_timeout(Duration::from_millis(50));
        let mut conversation = Conversation::new("seed");

        let err = narrator.question(&mut conversation, "hurry").await.unwrap_err();

        assert!(matches!(err, BackendError::Timeout(d) if d == Duration::from_millis(50)));
        assert_eq!(conversation.len(), 2);
    }
}
