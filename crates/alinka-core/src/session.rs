//! Per-chat conversation memory.
//!
//! A [`ChatSession`] holds the turns exchanged with the completion model for
//! one chat. The [`SessionStore`] owns every session and hands out shared
//! handles; nothing else keeps a session alive, so replacing the store entry
//! is enough to forget a conversation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::completion::CompletionClient;
use crate::error::Result;

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The Telegram user.
    User,
    /// The completion model.
    Model,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Model => write!(f, "model"),
        }
    }
}

/// A single exchanged message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Who said it.
    pub role: Role,
    /// What was said.
    pub text: String,
    /// When the turn was recorded.
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    /// Create a turn stamped with the current time.
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    /// Create a model turn.
    pub fn model(text: impl Into<String>) -> Self {
        Self::new(Role::Model, text)
    }
}

/// Conversation history for one chat.
#[derive(Debug)]
pub struct ChatSession {
    /// Chat this session belongs to.
    pub chat_id: i64,
    history: Vec<Turn>,
}

impl ChatSession {
    /// Create an empty session.
    pub fn new(chat_id: i64) -> Self {
        Self {
            chat_id,
            history: Vec::new(),
        }
    }

    /// Prior turns, oldest first.
    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    /// Number of recorded turns.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Whether nothing has been exchanged yet.
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Send `text` as the next user turn and return the model's reply.
    ///
    /// Both turns are recorded only when the call succeeds, so a failed
    /// request leaves the history exactly as it was.
    pub async fn send_message(&mut self, client: &dyn CompletionClient, text: &str) -> Result<String> {
        let reply = client.complete(&self.history, text).await?;
        self.history.push(Turn::user(text));
        self.history.push(Turn::model(reply.clone()));
        debug!(chat_id = self.chat_id, turns = self.history.len(), "Session advanced");
        Ok(reply)
    }
}

/// Shared handle to a stored session.
pub type SessionHandle = Arc<tokio::sync::Mutex<ChatSession>>;

/// Owner of every chat session, keyed by chat id.
///
/// At most one session exists per chat id. The map lock is only held for
/// lookups and swaps; a session's own lock is held for the length of a
/// completion call.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<i64, SessionHandle>>,
}

impl SessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self) -> MutexGuard<'_, HashMap<i64, SessionHandle>> {
        // A panic while holding the guard cannot leave the map half-updated.
        self.sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Return the chat's session, creating an empty one on first use.
    pub fn get_or_create(&self, chat_id: i64) -> SessionHandle {
        let mut sessions = self.map();
        Arc::clone(sessions.entry(chat_id).or_insert_with(|| {
            debug!(chat_id, "Creating chat session");
            Arc::new(tokio::sync::Mutex::new(ChatSession::new(chat_id)))
        }))
    }

    /// Forget the chat's session. No-op when none exists.
    pub fn reset(&self, chat_id: i64) {
        if self.map().remove(&chat_id).is_some() {
            debug!(chat_id, "Chat session discarded");
        }
    }

    /// Swap in a fresh empty session and return it.
    pub fn replace(&self, chat_id: i64) -> SessionHandle {
        let fresh = Arc::new(tokio::sync::Mutex::new(ChatSession::new(chat_id)));
        self.map().insert(chat_id, Arc::clone(&fresh));
        debug!(chat_id, "Chat session replaced");
        fresh
    }

    /// Whether a session exists for the chat.
    pub fn contains(&self, chat_id: i64) -> bool {
        self.map().contains_key(&chat_id)
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.map().len()
    }

    /// Whether the store holds no sessions.
    pub fn is_empty(&self) -> bool {
        self.map().is_empty()
    }
}
