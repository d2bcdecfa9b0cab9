//! Document navigation controller.
//!
//! State machine over `DocumentViewState` x `ViewModeState`. The controller
//! is the sole writer of viewer state; no other component mutates it
//! directly.

use super::layout::ViewLayout;
use super::state::{DocumentViewState, ViewModeState};
use crate::citation::Citation;

/// Reacts to citation clicks and close/toggle actions, keeping the viewer
/// cursor and pane flags consistent.
///
/// A citation whose document id does not resolve in the corpus is still
/// opened: degraded display is the viewer's concern, never an error state
/// here, and page navigation stays functional.
#[derive(Debug, Clone, Default)]
pub struct NavigationController {
    view: DocumentViewState,
    mode: ViewModeState,
}

impl NavigationController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> &DocumentViewState {
        &self.view
    }

    pub fn mode(&self) -> ViewModeState {
        self.mode
    }

    /// Current pane composition, derived from the mode flags.
    pub fn layout(&self) -> ViewLayout {
        ViewLayout::from_mode(self.mode)
    }

    /// Opens the document a citation points at, jumping to its page and
    /// highlight, and reveals the document panel.
    ///
    /// Valid from any state; idempotent for the same citation.
    pub fn open_citation(&mut self, citation: &Citation) {
        self.view.active_document_id = Some(citation.document_id.clone());
        self.view.current_page = citation.page_number.max(1);
        self.view.highlight_range = Some(citation.highlight_range);
        self.mode.is_document_panel_open = true;
    }

    /// Hides the document panel.
    ///
    /// When split view is off the view state is cleared entirely: closing
    /// in overlay mode forgets the document. While split view is on the
    /// document is pinned and survives the close, so reopening the panel
    /// lands back on the same page.
    pub fn close_document_panel(&mut self) {
        self.mode.is_document_panel_open = false;
        if !self.mode.is_split_view {
            self.view = DocumentViewState::closed();
        }
    }

    /// Flips split view. Turning split on always reveals the document pane,
    /// even with no document selected; the pane may render an empty state.
    pub fn toggle_split_view(&mut self) {
        self.mode.is_split_view = !self.mode.is_split_view;
        if self.mode.is_split_view {
            self.mode.is_document_panel_open = true;
        }
    }

    /// Adjusts the current page by `delta`, clamped at a lower bound of 1.
    ///
    /// There is no upper bound here: going past the last page is resolved by
    /// the page-fetching collaborator, not by the controller.
    pub fn navigate_page(&mut self, delta: i32) {
        let next = i64::from(self.view.current_page) + i64::from(delta);
        self.view.current_page = next.clamp(1, i64::from(u32::MAX)) as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::citation::HighlightRange;

    fn citation(document_id: &str, page: u32) -> Citation {
        Citation {
            id: format!("c-{document_id}-{page}"),
            document_id: document_id.to_string(),
            document_name: None,
            page_number: page,
            highlight_range: HighlightRange::new(0, 12),
            excerpt: "some excerpt".to_string(),
            relevance_score: None,
            positions: Vec::new(),
            pdf_url: None,
        }
    }

    fn assert_highlight_invariant(controller: &NavigationController) {
        if controller.view().active_document_id.is_none() {
            assert!(controller.view().highlight_range.is_none());
        }
    }

    #[test]
    fn open_citation_sets_cursor_and_reveals_panel() {
        let mut controller = NavigationController::new();
        controller.open_citation(&citation("CME-Rulebook", 7));

        assert_eq!(
            controller.view().active_document_id.as_deref(),
            Some("CME-Rulebook")
        );
        assert_eq!(controller.view().current_page, 7);
        assert!(controller.view().highlight_range.is_some());
        assert_eq!(controller.layout(), ViewLayout::Overlay);
    }

    #[test]
    fn open_citation_is_idempotent() {
        let c = citation("CME-Rulebook", 4);
        let mut once = NavigationController::new();
        once.open_citation(&c);

        let mut twice = NavigationController::new();
        twice.open_citation(&c);
        twice.open_citation(&c);

        assert_eq!(once.view(), twice.view());
        assert_eq!(once.mode(), twice.mode());
    }

    #[test]
    fn close_in_overlay_mode_forgets_the_document() {
        let mut controller = NavigationController::new();
        controller.open_citation(&citation("CME-Rulebook", 7));
        controller.close_document_panel();

        assert_eq!(controller.view(), &DocumentViewState::closed());
        assert_eq!(controller.layout(), ViewLayout::ChatOnly);
        assert_highlight_invariant(&controller);
    }

    #[test]
    fn close_in_split_mode_pins_the_document() {
        let mut controller = NavigationController::new();
        controller.open_citation(&citation("CME-Rulebook", 7));
        controller.toggle_split_view();
        controller.close_document_panel();

        assert_eq!(
            controller.view().active_document_id.as_deref(),
            Some("CME-Rulebook")
        );
        assert_eq!(controller.view().current_page, 7);
        assert_eq!(controller.layout(), ViewLayout::ChatOnly);
    }

    #[test]
    fn toggle_split_on_forces_panel_open() {
        let mut controller = NavigationController::new();
        controller.toggle_split_view();

        // No document selected; the pane shows an empty state.
        assert!(controller.mode().is_document_panel_open);
        assert_eq!(controller.layout(), ViewLayout::Split);
        assert!(controller.view().active_document_id.is_none());
        assert_highlight_invariant(&controller);
    }

    #[test]
    fn toggle_split_off_keeps_panel_visibility() {
        let mut controller = NavigationController::new();
        controller.open_citation(&citation("CME-Rulebook", 2));
        controller.toggle_split_view();
        controller.toggle_split_view();

        assert!(controller.mode().is_document_panel_open);
        assert_eq!(controller.layout(), ViewLayout::Overlay);
    }

    #[test]
    fn page_navigation_clamps_at_one() {
        let mut controller = NavigationController::new();
        controller.open_citation(&citation("CME-Rulebook", 1));

        controller.navigate_page(-1);
        assert_eq!(controller.view().current_page, 1);

        controller.navigate_page(1);
        controller.navigate_page(1);
        assert_eq!(controller.view().current_page, 3);

        controller.navigate_page(-5);
        assert_eq!(controller.view().current_page, 1);
    }

    #[test]
    fn open_citation_clamps_zero_page() {
        let mut controller = NavigationController::new();
        controller.open_citation(&citation("CME-Rulebook", 0));
        assert_eq!(controller.view().current_page, 1);
    }

    #[test]
    fn highlight_never_dangles_across_transitions() {
        let mut controller = NavigationController::new();
        let c = citation("CME-Rulebook", 3);

        controller.open_citation(&c);
        controller.toggle_split_view();
        controller.close_document_panel();
        assert_highlight_invariant(&controller);

        controller.toggle_split_view();
        controller.close_document_panel();
        assert_highlight_invariant(&controller);
    }
}
