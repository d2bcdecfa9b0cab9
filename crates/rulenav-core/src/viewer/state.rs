//! Viewer state types.

use crate::citation::HighlightRange;
use serde::{Deserialize, Serialize};

/// The single shared navigation cursor into the document corpus.
///
/// There is exactly one instance per application session (process-wide, not
/// per chat session). It is set from a citation when one is activated, but
/// is thereafter independently navigable page-by-page without a fresh
/// citation.
///
/// Invariant: when `active_document_id` is `None`, `highlight_range` is also
/// `None`; no dangling highlight without a target document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentViewState {
    /// `None` means "no document open"
    pub active_document_id: Option<String>,
    /// 1-based; meaningful only while a document is open
    pub current_page: u32,
    pub highlight_range: Option<HighlightRange>,
}

impl DocumentViewState {
    pub fn closed() -> Self {
        Self {
            active_document_id: None,
            current_page: 1,
            highlight_range: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.active_document_id.is_some()
    }
}

impl Default for DocumentViewState {
    fn default() -> Self {
        Self::closed()
    }
}

/// Orthogonal flags describing pane visibility and sharing.
///
/// `is_document_panel_open` controls whether the document pane is visible at
/// all; `is_split_view` controls whether a visible pane shares space with
/// chat (split) or overlays it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewModeState {
    pub is_document_panel_open: bool,
    pub is_split_view: bool,
}
