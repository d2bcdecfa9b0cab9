//! Session domain model.
//!
//! This module contains the core ChatSession entity that represents one
//! conversation thread in the application's domain layer.

use super::message::ChatMessage;
use serde::{Deserialize, Serialize};

/// Greeting appended to every freshly created session.
const WELCOME_MESSAGE: &str = "Hello! I can help you navigate the CME rulebook. \
Ask me about position limits, margin requirements, delivery procedures, or any \
other exchange rule, and I'll point you at the relevant pages.";

/// One conversation thread.
///
/// A session holds an ordered, append-only list of messages. Sessions are
/// created by explicit user action, seeded with a single welcome assistant
/// message, and are never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    /// Unique session identifier (UUID format)
    pub id: String,
    /// Human-readable session title
    pub title: String,
    /// Timestamp when the session was created (ISO 8601 format)
    pub created_at: String,
    /// Timestamp when the session was last updated (ISO 8601 format)
    pub updated_at: String,
    /// Conversation history, in append order
    pub messages: Vec<ChatMessage>,
}

impl ChatSession {
    /// Creates a new session seeded with the welcome message.
    pub fn seeded(title: impl Into<String>) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            created_at: now.clone(),
            updated_at: now,
            messages: vec![ChatMessage::assistant(WELCOME_MESSAGE)],
        }
    }

    /// The most recent assistant message, if any.
    pub fn last_assistant_message(&self) -> Option<&ChatMessage> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == super::MessageRole::Assistant)
    }
}
