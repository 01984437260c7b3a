//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AiGateway` / `ChatSession` - generative inference (live or offline)
//! - `PlanExporter` - delivery of a plan's plain-text export

mod ai_gateway;
mod plan_exporter;

pub use ai_gateway::{AiGateway, ChatSession, ChunkStream, GatewayError, GatewayMode};
pub use plan_exporter::{ExportError, ExportReceipt, PlanExporter};
