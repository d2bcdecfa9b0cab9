//! Citation domain module.
//!
//! A citation is a pointer from an assistant's answer to a specific
//! page/excerpt of a source document. This module contains the citation
//! model itself plus the highlight/position types it carries.

mod model;

pub use model::{Citation, HighlightRange, TextPosition};
