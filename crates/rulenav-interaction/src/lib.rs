//! Rulenav interaction layer.
//!
//! The boundary to the answering and document-retrieval collaborators: the
//! [`ChatBackend`] capability trait, its live HTTP and offline fallback
//! implementations, wire DTO mapping, and the startup backend resolution.

pub mod backend;
pub mod config;
pub mod documents;
pub mod fallback;
pub mod http;
pub mod wire;

pub use backend::{ChatBackend, ChatReply, ChatStreamEvent, ChatTurn};
pub use config::BackendConfig;
pub use documents::DocumentClient;
pub use fallback::FallbackBackend;
pub use http::HttpChatBackend;

use std::sync::Arc;

/// Resolves the answering collaborator once at application start.
///
/// Probes the backend's health endpoint; when it answers, the live HTTP
/// backend is used, otherwise the offline fallback. The result is an
/// explicit capability object handed to the dispatch pipeline; there is no
/// ambient "backend available" flag anywhere.
pub async fn resolve_backend(config: &BackendConfig) -> Arc<dyn ChatBackend> {
    let probe = DocumentClient::new(config.clone());
    if probe.health().await {
        tracing::info!(target: "interaction", "backend live at {}", config.base_url());
        Arc::new(HttpChatBackend::new(config.clone()))
    } else {
        tracing::warn!(
            target: "interaction",
            "backend unreachable at {}, serving canned fallback answers",
            config.base_url()
        );
        Arc::new(FallbackBackend::new())
    }
}
