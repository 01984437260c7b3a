//! Self-Defi - Security Guide
//!
//! Short questionnaires turn into AI-generated security action plans for
//! crypto self-custody, password and identity backup, and AI-tool trust,
//! alongside a conversational assistant. Without an API key every AI call
//! is answered by a deterministic offline gateway.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
