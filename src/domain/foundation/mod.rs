//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the Self-Defi domain.

mod context;
mod errors;
mod ids;
mod state_machine;

pub use context::TopicContext;
pub use errors::ValidationError;
pub use ids::MessageId;
pub use state_machine::StateMachine;
