//! Rulenav application layer.
//!
//! Orchestrates the domain store and the answering collaborator. The only
//! piece here is the message dispatch pipeline; viewer state is driven
//! directly through `rulenav_core::viewer` by the presentation layer.

mod chat_usecase;

pub use chat_usecase::ChatUseCase;
