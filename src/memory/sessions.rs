//! Session Store
//!
//! Maps session ids to independently locked conversations. A turn holds its
//! conversation's lock from the first append until the reply is recorded.
//! The map is bounded: once full, the least recently used session is dropped.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use super::Conversation;

/// Session used when a request does not name one
pub const DEFAULT_SESSION: &str = "default";

/// Maximum number of conversations kept in memory
pub const DEFAULT_MAX_SESSIONS: usize = 1024;

pub type SharedConversation = Arc<Mutex<Conversation>>;

pub struct SessionStore {
    sessions: Mutex<LruCache<String, SharedConversation>>,
    initial_prompt: String,
}

impl SessionStore {
    pub fn new(initial_prompt: impl Into<String>) -> Self {
        Self::with_max_sessions(initial_prompt, DEFAULT_MAX_SESSIONS)
    }

    pub fn with_max_sessions(initial_prompt: impl Into<String>, max_sessions: usize) -> Self {
        let capacity = NonZeroUsize::new(max_sessions).unwrap_or(NonZeroUsize::MIN);
        Self {
            sessions: Mutex::new(LruCache::new(capacity)),
            initial_prompt: initial_prompt.into(),
        }
    }

    /// Get the conversation for `id`, creating a freshly seeded one if needed
    pub async fn session(&self, id: &str) -> SharedConversation {
        let mut sessions = self.sessions.lock().await;
        if let Some(existing) = sessions.get(id) {
            return existing.clone();
        }

        debug!("Creating session '{}'", id);
        let conversation = Arc::new(Mutex::new(Conversation::new(self.initial_prompt.clone())));
        if let Some((evicted, _)) = sessions.push(id.to_string(), conversation.clone()) {
            debug!("Evicted idle session '{}'", evicted);
        }
        conversation
    }

    /// Look up an existing conversation without creating one
    pub async fn get(&self, id: &str) -> Option<SharedConversation> {
        self.sessions.lock().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}
