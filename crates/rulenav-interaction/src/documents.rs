//! Document retrieval collaborator client.
//!
//! Read-only client over the backend's document API: corpus listing,
//! semantic search, per-page info with highlight positions, indexing status,
//! and the liveness probe consulted once at startup.

use crate::config::BackendConfig;
use crate::wire::{ApiCitation, into_citations};
use reqwest::Client;
use rulenav_core::citation::{Citation, TextPosition};
use rulenav_core::error::{NavigatorError, Result};
use serde::Deserialize;

/// Information about one indexed document.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentInfo {
    pub document_id: String,
    pub title: String,
    pub filename: String,
    pub total_pages: u32,
    pub indexed_chunks: u32,
    pub pdf_url: String,
}

/// Rendered page dimensions in PDF points.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageDimensions {
    pub width: f64,
    pub height: f64,
}

/// Per-page info, with highlight positions when a highlight text was given.
#[derive(Debug, Clone, Deserialize)]
pub struct PageInfo {
    pub document_id: String,
    pub page_number: u32,
    pub dimensions: PageDimensions,
    #[serde(default)]
    pub highlight_positions: Vec<TextPosition>,
    pub pdf_url: String,
}

/// Progress of corpus indexing on the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct IndexingStatus {
    pub total_documents: u32,
    pub indexed_documents: u32,
    pub total_chunks: u64,
    pub is_complete: bool,
    #[serde(default)]
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct SearchResponseBody {
    #[serde(default)]
    results: Vec<ApiCitation>,
    total_found: u32,
    #[allow(dead_code)]
    query: String,
}

/// Search hits mapped into domain citations.
#[derive(Debug, Clone)]
pub struct DocumentSearchResults {
    pub results: Vec<Citation>,
    pub total_found: u32,
}

/// HTTP client for the document-retrieval collaborator.
#[derive(Clone)]
pub struct DocumentClient {
    client: Client,
    config: BackendConfig,
}

impl DocumentClient {
    pub fn new(config: BackendConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// `GET /api/health` liveness probe. Any transport or status failure
    /// reads as "not live"; this call never errors.
    pub async fn health(&self) -> bool {
        match self.client.get(self.config.url("/api/health")).send().await {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                tracing::debug!(target: "documents", "health probe failed: {err}");
                false
            }
        }
    }

    /// `GET /api/documents/list`: all indexed documents.
    pub async fn list_documents(&self) -> Result<Vec<DocumentInfo>> {
        self.get_json(&self.config.url("/api/documents/list")).await
    }

    /// `GET /api/documents/search`: semantic search over the corpus,
    /// optionally filtered to one document.
    pub async fn search(
        &self,
        query: &str,
        limit: u32,
        document_id: Option<&str>,
    ) -> Result<DocumentSearchResults> {
        let mut request = self
            .client
            .get(self.config.url("/api/documents/search"))
            .query(&[("query", query), ("limit", &limit.to_string())]);
        if let Some(id) = document_id {
            request = request.query(&[("document_id", id)]);
        }

        let response = request
            .send()
            .await
            .map_err(|err| NavigatorError::unreachable(format!("search failed: {err}")))?;
        let body: SearchResponseBody = Self::parse(response).await?;

        Ok(DocumentSearchResults {
            results: into_citations(body.results),
            total_found: body.total_found,
        })
    }

    /// `GET /api/documents/{id}/page/{n}`: page dimensions and, when
    /// `highlight_text` is given, positions for drawing highlight boxes.
    pub async fn page_info(
        &self,
        document_id: &str,
        page_number: u32,
        highlight_text: Option<&str>,
    ) -> Result<PageInfo> {
        let url = self
            .config
            .url(&format!("/api/documents/{document_id}/page/{page_number}"));
        let mut request = self.client.get(url);
        if let Some(text) = highlight_text {
            request = request.query(&[("highlight_text", text)]);
        }

        let response = request
            .send()
            .await
            .map_err(|err| NavigatorError::unreachable(format!("page request failed: {err}")))?;
        Self::parse(response).await
    }

    /// `GET /api/documents/indexing/status`
    pub async fn indexing_status(&self) -> Result<IndexingStatus> {
        self.get_json(&self.config.url("/api/documents/indexing/status"))
            .await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| NavigatorError::unreachable(format!("request failed: {err}")))?;
        Self::parse(response).await
    }

    async fn parse<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(NavigatorError::backend(status.as_u16(), body));
        }
        response.json().await.map_err(|err| {
            NavigatorError::json(format!("failed to parse document response: {err}"))
        })
    }
}
