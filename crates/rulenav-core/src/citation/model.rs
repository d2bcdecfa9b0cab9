//! Citation model and its highlight/position types.

use serde::{Deserialize, Serialize};

/// Corpus prefix stripped when deriving display labels and PDF filenames.
const DOCUMENT_ID_PREFIX: &str = "CME-";

/// Bounding box of text on a rendered page, for fine-grained highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextPosition {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

/// Half-open character interval into a cited excerpt.
///
/// Offsets index into the excerpt text, not into the full page.
/// Invariant: `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightRange {
    pub start: usize,
    pub end: usize,
}

impl HighlightRange {
    /// Creates a range, clamping `end` so the `start <= end` invariant holds.
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    /// Range covering a whole excerpt (`{0, excerpt.len()}`).
    pub fn for_excerpt(excerpt: &str) -> Self {
        Self {
            start: 0,
            end: excerpt.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// An immutable reference from an assistant message to a location in a
/// source document.
///
/// Produced by the answering collaborator and attached to exactly one
/// assistant message. The `document_id` is a weak reference: the document
/// corpus lives behind an external service and the id is never assumed to
/// resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    /// Unique within the owning message
    pub id: String,
    /// Document identifier (e.g. "CME-Position-Limits")
    pub document_id: String,
    /// Display label; derived from `document_id` when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_name: Option<String>,
    /// 1-based page number
    pub page_number: u32,
    /// Character range into `excerpt` to highlight
    pub highlight_range: HighlightRange,
    /// Verbatim quoted text from the document
    pub excerpt: String,
    /// Relevance score from retrieval (0.0-1.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<f64>,
    /// Highlight rectangles on the rendered page
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub positions: Vec<TextPosition>,
    /// Direct URL to the source PDF, when the backend provides one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,
}

impl Citation {
    /// Stable display label for this citation.
    ///
    /// Prefers `document_name`; otherwise derives a human label from the
    /// document id. The derivation is pure and deterministic, so the label
    /// can be used as a cache key.
    pub fn display_label(&self) -> String {
        match &self.document_name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => derive_label(&self.document_id),
        }
    }

    /// Filename under the static `/pdfs/` route serving this document.
    ///
    /// Mirrors the server-side convention: strip the corpus prefix from the
    /// id and append `.pdf`.
    pub fn pdf_filename(&self) -> String {
        let stem = self
            .document_id
            .strip_prefix(DOCUMENT_ID_PREFIX)
            .unwrap_or(&self.document_id);
        format!("{stem}.pdf")
    }
}

fn derive_label(document_id: &str) -> String {
    let stem = document_id
        .strip_prefix(DOCUMENT_ID_PREFIX)
        .unwrap_or(document_id);
    stem.replace(['-', '_'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn citation(document_id: &str, document_name: Option<&str>) -> Citation {
        Citation {
            id: "c-1".to_string(),
            document_id: document_id.to_string(),
            document_name: document_name.map(str::to_string),
            page_number: 1,
            highlight_range: HighlightRange::for_excerpt("quoted text"),
            excerpt: "quoted text".to_string(),
            relevance_score: None,
            positions: Vec::new(),
            pdf_url: None,
        }
    }

    #[test]
    fn label_prefers_document_name() {
        let c = citation("CME-Position-Limits", Some("Position Limits Guide"));
        assert_eq!(c.display_label(), "Position Limits Guide");
    }

    #[test]
    fn label_derived_from_id_when_name_absent() {
        let c = citation("CME-Position-Limits", None);
        assert_eq!(c.display_label(), "Position Limits");
    }

    #[test]
    fn label_derivation_is_deterministic() {
        let a = citation("CME-Margin_Requirements", None);
        let b = citation("CME-Margin_Requirements", None);
        assert_eq!(a.display_label(), b.display_label());
        assert_eq!(a.display_label(), "Margin Requirements");
    }

    #[test]
    fn label_tolerates_unprefixed_ids() {
        let c = citation("misc-handbook", None);
        assert_eq!(c.display_label(), "misc handbook");
    }

    #[test]
    fn pdf_filename_strips_prefix() {
        let c = citation("CME-Position-Limits", None);
        assert_eq!(c.pdf_filename(), "Position-Limits.pdf");
    }

    #[test]
    fn highlight_range_for_excerpt_spans_whole_text() {
        let range = HighlightRange::for_excerpt("abcde");
        assert_eq!(range, HighlightRange { start: 0, end: 5 });
        assert!(!range.is_empty());
    }

    #[test]
    fn highlight_range_clamps_inverted_bounds() {
        let range = HighlightRange::new(7, 3);
        assert_eq!(range.start, 7);
        assert_eq!(range.end, 7);
        assert!(range.is_empty());
    }
}
