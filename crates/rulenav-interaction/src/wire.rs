//! Wire DTOs for the answering and document-retrieval collaborators.
//!
//! The backend speaks snake_case JSON; these types mirror that contract
//! exactly and are mapped field-by-field into the domain shapes. Internal
//! code never consumes the wire shapes directly; the `From` impls here are
//! the only crossing point.

use rulenav_core::citation::{Citation, HighlightRange, TextPosition};
use serde::{Deserialize, Serialize};

/// Request body for `POST /api/chat` and `POST /api/chat/stream`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequestBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub include_citations: bool,
}

/// Success body of `POST /api/chat`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponseBody {
    pub message: String,
    #[serde(default)]
    pub citations: Vec<ApiCitation>,
    pub session_id: String,
    #[allow(dead_code)]
    pub timestamp: Option<String>,
}

/// Diagnostics body optionally attached to non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub detail: String,
}

/// Payload of one `data:` line on the streaming endpoint.
///
/// Exactly one of the optional keys is populated per event: `citations` on
/// a citations batch, `text` on a content fragment, `session_id` alone on
/// the terminal done event, `error` on failure.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamPayload {
    #[serde(default)]
    pub citations: Option<Vec<ApiCitation>>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Citation as the backend serializes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiCitation {
    pub id: String,
    pub document_id: String,
    #[serde(default)]
    pub document_title: Option<String>,
    pub page_number: u32,
    pub excerpt: String,
    #[serde(default)]
    pub positions: Vec<TextPosition>,
    #[serde(default)]
    pub relevance_score: Option<f64>,
    #[serde(default)]
    pub pdf_url: Option<String>,
}

impl From<ApiCitation> for Citation {
    fn from(wire: ApiCitation) -> Self {
        // The backend highlights the whole excerpt; the range is synthesized
        // client-side rather than carried on the wire.
        let highlight_range = HighlightRange::for_excerpt(&wire.excerpt);
        Citation {
            id: wire.id,
            document_id: wire.document_id,
            document_name: wire.document_title,
            page_number: wire.page_number,
            highlight_range,
            excerpt: wire.excerpt,
            relevance_score: wire.relevance_score,
            positions: wire.positions,
            pdf_url: wire.pdf_url,
        }
    }
}

/// Maps a batch of wire citations into domain citations.
pub fn into_citations(wire: Vec<ApiCitation>) -> Vec<Citation> {
    wire.into_iter().map(Citation::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_citation_maps_field_by_field() {
        let wire: ApiCitation = serde_json::from_value(serde_json::json!({
            "id": "cit-1",
            "document_id": "CME-Position-Limits",
            "document_title": "Position Limits",
            "page_number": 12,
            "excerpt": "No person shall own or control...",
            "positions": [{"x0": 1.0, "y0": 2.0, "x1": 3.0, "y1": 4.0}],
            "relevance_score": 0.87,
            "pdf_url": "/pdfs/Position-Limits.pdf"
        }))
        .unwrap();

        let citation = Citation::from(wire);
        assert_eq!(citation.document_id, "CME-Position-Limits");
        assert_eq!(citation.document_name.as_deref(), Some("Position Limits"));
        assert_eq!(citation.page_number, 12);
        assert_eq!(citation.highlight_range.start, 0);
        assert_eq!(
            citation.highlight_range.end,
            "No person shall own or control...".len()
        );
        assert_eq!(citation.positions.len(), 1);
        assert_eq!(citation.relevance_score, Some(0.87));
        assert_eq!(
            citation.pdf_url.as_deref(),
            Some("/pdfs/Position-Limits.pdf")
        );
    }

    #[test]
    fn optional_wire_fields_default() {
        let wire: ApiCitation = serde_json::from_value(serde_json::json!({
            "id": "cit-2",
            "document_id": "CME-Rulebook",
            "page_number": 1,
            "excerpt": "text"
        }))
        .unwrap();

        let citation = Citation::from(wire);
        assert!(citation.document_name.is_none());
        assert!(citation.positions.is_empty());
        assert!(citation.relevance_score.is_none());
        assert!(citation.pdf_url.is_none());
    }

    #[test]
    fn stream_payload_variants_deserialize() {
        let done: StreamPayload =
            serde_json::from_str(r#"{"session_id": "s-1"}"#).unwrap();
        assert_eq!(done.session_id.as_deref(), Some("s-1"));
        assert!(done.text.is_none());

        let content: StreamPayload = serde_json::from_str(r#"{"text": "Po"}"#).unwrap();
        assert_eq!(content.text.as_deref(), Some("Po"));

        let error: StreamPayload = serde_json::from_str(r#"{"error": "boom"}"#).unwrap();
        assert_eq!(error.error.as_deref(), Some("boom"));
    }
}
