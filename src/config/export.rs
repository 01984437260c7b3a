//! Plan export configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Where downloaded plans are written
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Directory receiving `my-security-plan.txt`
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl ExportConfig {
    /// Validate export configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(ValidationError::Blank("EXPORT__OUTPUT_DIR"));
        }
        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}
