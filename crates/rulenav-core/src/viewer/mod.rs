//! Document viewer domain module.
//!
//! Owns the single "active document view" cursor and the overlay/split view
//! toggle, and derives how the chat and document panes share screen space.
//!
//! # Module Structure
//!
//! - `state`: `DocumentViewState` and `ViewModeState`
//! - `controller`: `NavigationController`, the sole writer of viewer state
//! - `layout`: `ViewLayout`, derived pane composition

mod controller;
mod layout;
mod state;

pub use controller::NavigationController;
pub use layout::ViewLayout;
pub use state::{DocumentViewState, ViewModeState};
