//! Plan Exporter Port - Delivery of a plan's plain-text export.
//!
//! The text itself comes from `ActionPlan::to_export_text`; exporters only
//! decide where it goes (a downloaded file, a terminal, ...).

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::plan::ActionPlan;

/// Port for handing an exported plan to the user.
#[async_trait]
pub trait PlanExporter: Send + Sync {
    /// Delivers the plan and reports where it went.
    async fn export(&self, plan: &ActionPlan) -> Result<ExportReceipt, ExportError>;
}

/// Where an export ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReceipt {
    /// Written file.
    pub path: PathBuf,
    /// Size of the written text.
    pub bytes_written: usize,
}

/// Export errors.
#[derive(Debug, Clone, Error)]
pub enum ExportError {
    #[error("Export directory unavailable: {0}")]
    DirectoryUnavailable(String),

    #[error("Failed to write export: {0}")]
    WriteFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_error_displays_reason() {
        let err = ExportError::WriteFailed("disk full".to_string());
        assert_eq!(err.to_string(), "Failed to write export: disk full");
    }
}
