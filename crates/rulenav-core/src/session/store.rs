//! In-memory session store.
//!
//! Ordered collection of chat sessions with a single active session.
//! The store is single-writer: all mutation goes through [`SessionStore`]
//! methods, never through direct field access, so every observer sees only
//! fully-formed snapshots.

use super::message::ChatMessage;
use super::model::ChatSession;
use crate::error::{NavigatorError, Result};

/// Title given to sessions created without an explicit title.
const DEFAULT_SESSION_TITLE: &str = "New conversation";

/// Ordered collection of chat sessions with exactly one active session.
///
/// The collection is seeded with one default session at initialization and
/// is therefore never empty. Newly created sessions are prepended so they
/// surface first in the sidebar. There are no delete, rename, or reorder
/// operations.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Vec<ChatSession>,
    active_id: String,
}

impl SessionStore {
    /// Creates a store seeded with one default session, which is active.
    pub fn new() -> Self {
        let seed = ChatSession::seeded(DEFAULT_SESSION_TITLE);
        let active_id = seed.id.clone();
        Self {
            sessions: vec![seed],
            active_id,
        }
    }

    /// All sessions, newest-created first.
    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    /// The currently active session.
    ///
    /// Looks the active id up in the collection; when the id is unknown the
    /// first session is returned instead. This fallback is part of the
    /// contract, not a convenience.
    pub fn active_session(&self) -> &ChatSession {
        self.sessions
            .iter()
            .find(|s| s.id == self.active_id)
            // The store is seeded non-empty and nothing removes sessions.
            .unwrap_or(&self.sessions[0])
    }

    /// The id recorded as active (may not resolve; see `active_session`).
    pub fn active_id(&self) -> &str {
        &self.active_id
    }

    /// Marks a session id as active. The id is not required to resolve;
    /// reads fall back to the first session.
    pub fn set_active(&mut self, session_id: impl Into<String>) {
        self.active_id = session_id.into();
    }

    /// Appends a message to the tail of the target session and refreshes its
    /// `updated_at`. All other sessions are untouched.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no session has the given id.
    pub fn append_message(&mut self, session_id: &str, message: ChatMessage) -> Result<()> {
        let session = self
            .sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .ok_or_else(|| NavigatorError::not_found("session", session_id))?;

        session.messages.push(message);
        session.updated_at = chrono::Utc::now().to_rfc3339();
        Ok(())
    }

    /// Creates a new seeded session, prepends it to the collection, and
    /// makes it active. Returns the new session id.
    pub fn create_session(&mut self, title: Option<&str>) -> String {
        let session = ChatSession::seeded(title.unwrap_or(DEFAULT_SESSION_TITLE));
        let id = session.id.clone();
        self.sessions.insert(0, session);
        self.active_id = id.clone();
        id
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MessageRole;

    #[test]
    fn store_is_seeded_with_welcome_session() {
        let store = SessionStore::new();
        assert_eq!(store.sessions().len(), 1);
        let active = store.active_session();
        assert_eq!(active.messages.len(), 1);
        assert_eq!(active.messages[0].role, MessageRole::Assistant);
    }

    #[test]
    fn active_session_falls_back_to_first_when_id_unknown() {
        let mut store = SessionStore::new();
        store.create_session(Some("second"));
        store.set_active("no-such-session");

        // First element, i.e. the most recently created session.
        assert_eq!(store.active_session().title, "second");
    }

    #[test]
    fn create_session_prepends_and_activates() {
        let mut store = SessionStore::new();
        let first_id = store.active_id().to_string();
        let new_id = store.create_session(None);

        assert_ne!(new_id, first_id);
        assert_eq!(store.sessions()[0].id, new_id);
        assert_eq!(store.active_session().id, new_id);
        assert_eq!(store.sessions().len(), 2);
    }

    #[test]
    fn append_targets_only_the_named_session() {
        let mut store = SessionStore::new();
        let first_id = store.sessions()[0].id.clone();
        let second_id = store.create_session(None);

        store
            .append_message(&first_id, ChatMessage::user("question"))
            .unwrap();

        let first = store.sessions().iter().find(|s| s.id == first_id).unwrap();
        let second = store.sessions().iter().find(|s| s.id == second_id).unwrap();
        assert_eq!(first.messages.len(), 2);
        assert_eq!(second.messages.len(), 1);
    }

    #[test]
    fn append_refreshes_updated_at() {
        let mut store = SessionStore::new();
        let id = store.active_id().to_string();
        let before = store.active_session().updated_at.clone();

        store
            .append_message(&id, ChatMessage::user("question"))
            .unwrap();

        assert!(store.active_session().updated_at >= before);
    }

    #[test]
    fn append_to_unknown_session_is_not_found() {
        let mut store = SessionStore::new();
        let err = store
            .append_message("missing", ChatMessage::user("question"))
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
