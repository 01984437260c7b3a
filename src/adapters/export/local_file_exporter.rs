//! Local File Exporter - writes the plan download to disk.
//!
//! Uses a write-to-temp-then-rename pattern so a crash mid-write never
//! leaves a truncated `my-security-plan.txt` behind. An existing export in
//! the same directory is replaced.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::domain::plan::{ActionPlan, EXPORT_FILE_NAME};
use crate::ports::{ExportError, ExportReceipt, PlanExporter};

/// Writes plan exports into one directory.
#[derive(Debug, Clone)]
pub struct LocalFileExporter {
    output_dir: PathBuf,
}

impl LocalFileExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Final location of the export.
    pub fn export_path(&self) -> PathBuf {
        self.output_dir.join(EXPORT_FILE_NAME)
    }

    fn temp_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.tmp", EXPORT_FILE_NAME))
    }

    async fn ensure_output_dir(&self) -> Result<(), ExportError> {
        fs::create_dir_all(&self.output_dir).await.map_err(|e| {
            ExportError::DirectoryUnavailable(format!("{}: {}", self.output_dir.display(), e))
        })
    }
}

#[async_trait]
impl PlanExporter for LocalFileExporter {
    async fn export(&self, plan: &ActionPlan) -> Result<ExportReceipt, ExportError> {
        self.ensure_output_dir().await?;

        let text = plan.to_export_text();
        let temp_path = self.temp_path();
        let final_path = self.export_path();

        let mut file = fs::File::create(&temp_path).await.map_err(|e| {
            ExportError::WriteFailed(format!("create {}: {}", temp_path.display(), e))
        })?;
        file.write_all(text.as_bytes()).await.map_err(|e| {
            ExportError::WriteFailed(format!("write {}: {}", temp_path.display(), e))
        })?;
        file.sync_all().await.map_err(|e| {
            ExportError::WriteFailed(format!("sync {}: {}", temp_path.display(), e))
        })?;
        drop(file);

        fs::rename(&temp_path, &final_path).await.map_err(|e| {
            ExportError::WriteFailed(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                final_path.display(),
                e
            ))
        })?;

        tracing::debug!(path = %final_path.display(), bytes = text.len(), "Plan exported");

        Ok(ExportReceipt {
            path: final_path,
            bytes_written: text.len(),
        })
    }
}
