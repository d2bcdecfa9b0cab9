//! Answering-collaborator interface.
//!
//! The chat backend is an explicit, injectable capability object: resolved
//! once at application start (see [`crate::resolve_backend`]) and passed by
//! `Arc` into the dispatch pipeline. Both the live HTTP collaborator and the
//! offline fallback implement this trait, so call sites never branch on
//! availability.

use async_trait::async_trait;
use rulenav_core::citation::Citation;
use rulenav_core::error::Result;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

/// One user query heading to the answering collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatTurn {
    /// User-authored question text
    pub content: String,
    /// Conversation context on the collaborator side, when one exists
    pub session_id: Option<String>,
}

impl ChatTurn {
    pub fn new(content: impl Into<String>, session_id: Option<String>) -> Self {
        Self {
            content: content.into(),
            session_id,
        }
    }
}

/// A completed answer from the collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    /// Final answer text
    pub message: String,
    /// Supporting citations, possibly empty
    pub citations: Vec<Citation>,
    /// Collaborator-assigned session id
    pub session_id: String,
}

/// Events emitted by the streaming collaborator shape.
///
/// Content fragments are concatenated in emission order by the consumer;
/// `Done` is terminal and carries the server-assigned session id.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatStreamEvent {
    /// A batch of citations found for the query
    Citations(Vec<Citation>),
    /// A fragment of the answer text
    Content(String),
    /// Terminal success event
    Done { session_id: String },
    /// Terminal failure event
    Error(String),
}

/// The external service that maps a user query to an answer plus citations.
///
/// # Cancellation
///
/// Only the streaming shape supports mid-flight cancellation. An aborted
/// stream returns `Ok(())` without emitting further events; abort is
/// silent, never an error.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Request/response shape: one query in, one full reply out.
    async fn send_message(&self, turn: ChatTurn) -> Result<ChatReply>;

    /// Streaming shape: emits citation batches and content fragments on
    /// `events`, then a terminal `Done` or `Error`.
    async fn stream_message(
        &self,
        turn: ChatTurn,
        events: UnboundedSender<ChatStreamEvent>,
        cancel: CancellationToken,
    ) -> Result<()>;
}
