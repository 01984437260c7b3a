//! Configuration for the guide.
//!
//! Values come from the process environment (plus an optional `.env`) under
//! the `SELF_DEFI` prefix, with `__` between section and key:
//!
//! ```text
//! SELF_DEFI__AI__API_KEY=...          live mode; omit for offline mode
//! SELF_DEFI__AI__MODEL=gemini-2.5-pro
//! SELF_DEFI__APP__LOG_FORMAT=json
//! SELF_DEFI__EXPORT__OUTPUT_DIR=./plans
//! ```

mod ai;
mod app;
mod error;
mod export;

pub use ai::AiConfig;
pub use app::{LogFormat, RuntimeConfig};
pub use error::{ConfigError, ValidationError};
pub use export::ExportConfig;

use serde::Deserialize;

/// Bare variable accepted for the AI key when the prefixed one is unset.
pub const LEGACY_API_KEY_VAR: &str = "API_KEY";

/// All sections default, so an empty environment is a valid offline setup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub app: RuntimeConfig,

    #[serde(default)]
    pub ai: AiConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

impl AppConfig {
    /// Reads `.env` if present, then the `SELF_DEFI__*` variables.
    ///
    /// A key in `API_KEY` is used only when `SELF_DEFI__AI__API_KEY` is
    /// missing or blank.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let source = config::Environment::default()
            .prefix("SELF_DEFI")
            .prefix_separator("__")
            .separator("__");
        let mut loaded: AppConfig = config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()?;

        if !loaded.ai.has_credential() {
            loaded.ai.api_key = std::env::var(LEGACY_API_KEY_VAR)
                .ok()
                .filter(|key| !key.trim().is_empty());
        }
        Ok(loaded)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.app.validate()?;
        self.ai.validate()?;
        self.export.validate()
    }
}
