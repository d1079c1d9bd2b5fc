//! Chat message types.

mod message;

pub use message::{ChatMessage, MessageRole};
