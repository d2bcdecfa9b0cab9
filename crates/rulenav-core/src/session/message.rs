//! Chat message types.
//!
//! This module contains types for representing messages in a conversation,
//! including roles, message content, and attached citations.

use crate::citation::Citation;
use serde::{Deserialize, Serialize};

/// Represents the role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    /// Message from the user.
    User,
    /// Message from the AI assistant.
    Assistant,
}

/// A single turn in a conversation.
///
/// Messages are created once when a turn completes and never mutated
/// afterwards; they are owned exclusively by their parent session's
/// append-only message list.
///
/// `citations` is present only for assistant messages that found supporting
/// evidence. Absent and empty are treated identically by consumers; use
/// [`ChatMessage::citations`] rather than reading the field directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique within the owning session
    pub id: String,
    pub role: MessageRole,
    /// Markdown-flavored message text
    pub content: String,
    /// Timestamp when the message was created (ISO 8601 format)
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub citations: Option<Vec<Citation>>,
}

impl ChatMessage {
    /// Creates a user-authored message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::build(MessageRole::User, content.into(), None)
    }

    /// Creates an assistant message without citations.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::build(MessageRole::Assistant, content.into(), None)
    }

    /// Creates an assistant message carrying citations.
    ///
    /// An empty citation list is stored as absent, for symmetry with how
    /// message history renders.
    pub fn assistant_cited(content: impl Into<String>, citations: Vec<Citation>) -> Self {
        let citations = if citations.is_empty() {
            None
        } else {
            Some(citations)
        };
        Self::build(MessageRole::Assistant, content.into(), citations)
    }

    fn build(role: MessageRole, content: String, citations: Option<Vec<Citation>>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            content,
            timestamp: chrono::Utc::now().to_rfc3339(),
            citations,
        }
    }

    /// Citations attached to this message; empty slice when none.
    pub fn citations(&self) -> &[Citation] {
        self.citations.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::citation::HighlightRange;

    #[test]
    fn empty_citation_list_stored_as_absent() {
        let message = ChatMessage::assistant_cited("answer", Vec::new());
        assert!(message.citations.is_none());
        assert!(message.citations().is_empty());
    }

    #[test]
    fn citations_accessor_returns_attached_list() {
        let citation = Citation {
            id: "c-1".to_string(),
            document_id: "CME-Rulebook".to_string(),
            document_name: None,
            page_number: 3,
            highlight_range: HighlightRange::for_excerpt("text"),
            excerpt: "text".to_string(),
            relevance_score: Some(0.9),
            positions: Vec::new(),
            pdf_url: None,
        };
        let message = ChatMessage::assistant_cited("answer", vec![citation]);
        assert_eq!(message.citations().len(), 1);
        assert_eq!(message.citations()[0].page_number, 3);
    }
}
