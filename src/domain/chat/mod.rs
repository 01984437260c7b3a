//! Chat module - transcript types for the assistant widget.

mod message;

pub use message::{ChatMessage, ChatRole};
