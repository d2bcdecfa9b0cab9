//! Rulenav domain core.
//!
//! Pure domain types and state machines for the citation-to-document
//! synchronization core: the citation linking model, the session/message
//! store, and the document navigation controller. No I/O lives here; the
//! interaction layer maps wire shapes into these types and the application
//! layer drives the mutations.

pub mod citation;
pub mod error;
pub mod session;
pub mod viewer;

// Re-export common error type
pub use error::NavigatorError;
