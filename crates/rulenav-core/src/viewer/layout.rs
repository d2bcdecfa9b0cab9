//! Derived pane composition.

use super::state::ViewModeState;
use serde::{Deserialize, Serialize};

/// How the chat and document panes share the viewport.
///
/// Entirely derivable from [`ViewModeState`]; carries no independent logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewLayout {
    /// Document panel hidden; chat fills the viewport.
    ChatOnly,
    /// Chat and document panes each occupy half the viewport.
    Split,
    /// Document pane overlays/replaces the chat pane.
    Overlay,
}

impl ViewLayout {
    /// Derives the layout from the view mode flags.
    pub fn from_mode(mode: ViewModeState) -> Self {
        if !mode.is_document_panel_open {
            Self::ChatOnly
        } else if mode.is_split_view {
            Self::Split
        } else {
            Self::Overlay
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_follows_mode_flags() {
        let closed = ViewModeState {
            is_document_panel_open: false,
            is_split_view: false,
        };
        assert_eq!(ViewLayout::from_mode(closed), ViewLayout::ChatOnly);

        // Split flag alone does not show the pane.
        let split_closed = ViewModeState {
            is_document_panel_open: false,
            is_split_view: true,
        };
        assert_eq!(ViewLayout::from_mode(split_closed), ViewLayout::ChatOnly);

        let overlay = ViewModeState {
            is_document_panel_open: true,
            is_split_view: false,
        };
        assert_eq!(ViewLayout::from_mode(overlay), ViewLayout::Overlay);

        let split = ViewModeState {
            is_document_panel_open: true,
            is_split_view: true,
        };
        assert_eq!(ViewLayout::from_mode(split), ViewLayout::Split);
    }
}
