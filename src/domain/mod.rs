//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (topic context, IDs, errors, state machine)
//! - `plan` - The Plan Schema, questionnaire answers and plain-text export
//! - `guidance` - Prompt templates, pro tips and explainer video lookup
//! - `chat` - Assistant transcript types
//! - `flow` - Controller lifecycle states

pub mod chat;
pub mod flow;
pub mod foundation;
pub mod guidance;
pub mod plan;
