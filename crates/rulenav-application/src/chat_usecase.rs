//! Message dispatch pipeline.
//!
//! `ChatUseCase` turns one user-authored string into exactly one appended
//! user message and exactly one appended assistant message, never zero and
//! never more than one per call. When the answering collaborator fails, a
//! locally synthesized fallback reply is appended instead; the user always
//! gets an answer, with or without backend connectivity.

use rulenav_core::error::Result;
use rulenav_core::session::{ChatMessage, ChatSession, SessionStore};
use rulenav_interaction::{ChatBackend, ChatStreamEvent, ChatTurn, FallbackBackend};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Clears the in-flight count on every exit path, including early returns
/// and errors.
struct InFlightGuard<'a>(&'a AtomicUsize);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// How a streaming exchange ended.
enum StreamOutcome {
    Completed,
    Failed(String),
    /// Channel closed without a terminal event (connection died mid-stream).
    Interrupted,
}

/// Orchestrates the session store and the answering collaborator.
///
/// # Concurrency
///
/// The store is single-writer behind an async `RwLock`; reads hand out
/// cloned snapshots. Concurrent dispatches are not mutually excluded; each
/// call guarantees only that its own user-message append happens before its
/// assistant-message append, and each clears exactly the loading count it
/// raised. The loading flag is a UI affordance, not a correctness gate.
pub struct ChatUseCase {
    store: RwLock<SessionStore>,
    backend: Arc<dyn ChatBackend>,
    fallback: FallbackBackend,
    in_flight: AtomicUsize,
}

impl ChatUseCase {
    /// Creates a use case over a freshly seeded store.
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            store: RwLock::new(SessionStore::new()),
            backend,
            fallback: FallbackBackend::new(),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Overrides the fallback responder (tests use a zero-delay one).
    pub fn with_fallback(mut self, fallback: FallbackBackend) -> Self {
        self.fallback = fallback;
        self
    }

    /// True while at least one exchange is outstanding.
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Sends one user message through the request/response collaborator
    /// shape and appends the reply.
    ///
    /// Empty or whitespace-only content is silently ignored: no message is
    /// appended and no loading state is entered.
    pub async fn send_message(&self, content: &str, session_id: &str) -> Result<()> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Ok(());
        }

        self.store
            .write()
            .await
            .append_message(session_id, ChatMessage::user(trimmed))?;

        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let _guard = InFlightGuard(&self.in_flight);

        let turn = ChatTurn::new(trimmed, Some(session_id.to_string()));
        let reply = match self.backend.send_message(turn.clone()).await {
            Ok(reply) => reply,
            Err(err) => {
                tracing::warn!(
                    target: "dispatch",
                    "collaborator failed, serving fallback: {err}"
                );
                self.fallback.respond(&turn).await
            }
        };

        self.store.write().await.append_message(
            session_id,
            ChatMessage::assistant_cited(reply.message, reply.citations),
        )
    }

    /// Sends one user message through the streaming collaborator shape.
    ///
    /// Citation batches and content fragments are accumulated in arrival
    /// order; the assistant message is appended only once the stream
    /// completes. Aborting through `cancel` appends nothing and surfaces
    /// nothing; abort is silent, not an error.
    pub async fn send_message_streaming(
        &self,
        content: &str,
        session_id: &str,
        cancel: CancellationToken,
    ) -> Result<()> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Ok(());
        }

        self.store
            .write()
            .await
            .append_message(session_id, ChatMessage::user(trimmed))?;

        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let _guard = InFlightGuard(&self.in_flight);

        let turn = ChatTurn::new(trimmed, Some(session_id.to_string()));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let backend = Arc::clone(&self.backend);
        let stream_task = tokio::spawn({
            let turn = turn.clone();
            let cancel = cancel.clone();
            async move { backend.stream_message(turn, tx, cancel).await }
        });

        let mut citations = Vec::new();
        let mut answer = String::new();
        let mut outcome = StreamOutcome::Interrupted;
        while let Some(event) = rx.recv().await {
            match event {
                ChatStreamEvent::Citations(batch) => citations.extend(batch),
                ChatStreamEvent::Content(fragment) => answer.push_str(&fragment),
                ChatStreamEvent::Done { .. } => {
                    outcome = StreamOutcome::Completed;
                    break;
                }
                ChatStreamEvent::Error(message) => {
                    outcome = StreamOutcome::Failed(message);
                    break;
                }
            }
        }

        // Surface a transport-level failure as an interrupted stream.
        if let Ok(Err(err)) = stream_task.await {
            if matches!(outcome, StreamOutcome::Interrupted) {
                outcome = StreamOutcome::Failed(err.to_string());
            }
        }

        if cancel.is_cancelled() {
            // The caller aborted: no partial message, no error, no fallback.
            return Ok(());
        }

        let message = match outcome {
            StreamOutcome::Completed => ChatMessage::assistant_cited(answer, citations),
            StreamOutcome::Failed(err) => {
                tracing::warn!(target: "dispatch", "stream failed, serving fallback: {err}");
                let reply = self.fallback.respond(&turn).await;
                ChatMessage::assistant_cited(reply.message, reply.citations)
            }
            StreamOutcome::Interrupted => {
                tracing::warn!(target: "dispatch", "stream ended early, serving fallback");
                let reply = self.fallback.respond(&turn).await;
                ChatMessage::assistant_cited(reply.message, reply.citations)
            }
        };

        self.store.write().await.append_message(session_id, message)
    }

    /// All sessions, newest-created first (cloned snapshot).
    pub async fn sessions(&self) -> Vec<ChatSession> {
        self.store.read().await.sessions().to_vec()
    }

    /// The active session, falling back to the first when the active id is
    /// unknown (cloned snapshot).
    pub async fn active_session(&self) -> ChatSession {
        self.store.read().await.active_session().clone()
    }

    pub async fn active_session_id(&self) -> String {
        self.store.read().await.active_session().id.clone()
    }

    /// Creates a new seeded session and makes it active; returns its id.
    pub async fn create_session(&self) -> String {
        self.store.write().await.create_session(None)
    }

    /// Marks a session as active; reads fall back when the id is unknown.
    pub async fn select_session(&self, session_id: &str) {
        self.store.write().await.set_active(session_id);
    }
}
