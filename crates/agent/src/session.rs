use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::llm::Message;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

/// Checkpoint store for conversation history, keyed by session.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, id: &SessionId) -> Result<Option<Vec<Message>>, SessionError>;
    async fn save(&self, id: SessionId, messages: Vec<Message>) -> Result<(), SessionError>;
    /// Forgets a session; returns whether it existed.
    async fn clear(&self, id: &SessionId) -> Result<bool, SessionError>;
}

#[derive(Clone, Debug)]
struct SessionRecord {
    messages: Vec<Message>,
    updated_at: DateTime<Utc>,
}

#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, SessionRecord>>,
}

impl InMemorySessionStore {
    pub async fn updated_at(&self, id: &SessionId) -> Option<DateTime<Utc>> {
        let sessions = self.sessions.read().await;
        sessions.get(&id.0).map(|record| record.updated_at)
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, id: &SessionId) -> Result<Option<Vec<Message>>, SessionError> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(&id.0).map(|record| record.messages.clone()))
    }

    async fn save(&self, id: SessionId, messages: Vec<Message>) -> Result<(), SessionError> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(id.0, SessionRecord { messages, updated_at: Utc::now() });
        Ok(())
    }

    async fn clear(&self, id: &SessionId) -> Result<bool, SessionError> {
        let mut sessions = self.sessions.write().await;
        Ok(sessions.remove(&id.0).is_some())
    }
}
