//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Inference gateways (live Gemini, offline stub, mock)
//! - `export` - Plan export to the local filesystem

pub mod ai;
pub mod export;

pub use ai::{select_gateway, GeminiConfig, GeminiGateway, MockAiGateway, OfflineGateway};
pub use export::LocalFileExporter;
