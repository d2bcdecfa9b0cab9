//! Session domain module.
//!
//! This module contains the chat session/message models and the in-memory
//! session store.
//!
//! # Module Structure
//!
//! - `message`: Chat message types (`MessageRole`, `ChatMessage`)
//! - `model`: Core session domain model (`ChatSession`)
//! - `store`: Ordered session collection with a single active session

mod message;
mod model;
mod store;

// Re-export public API
pub use message::{ChatMessage, MessageRole};
pub use model::ChatSession;
pub use store::SessionStore;
