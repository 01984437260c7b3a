//! Logging settings for the binary

use serde::Deserialize;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct RuntimeConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,
}

/// How log lines are rendered on stderr.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl RuntimeConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.log_level.trim().is_empty() {
            return Err(ValidationError::Blank("APP__LOG_LEVEL"));
        }
        Ok(())
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::Pretty,
        }
    }
}

fn default_log_level() -> String {
    "warn,self_defi=info".into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_pretty_logging_by_default() {
        let runtime = RuntimeConfig::default();
        assert_eq!(runtime.log_level, "warn,self_defi=info");
        assert_eq!(runtime.log_format, LogFormat::Pretty);
        assert_eq!(runtime.validate(), Ok(()));
    }

    #[test]
    fn json_format_parses_from_lowercase() {
        let runtime: RuntimeConfig =
            serde_json::from_str(r#"{"log_level":"debug","log_format":"json"}"#).unwrap();
        assert_eq!(runtime.log_level, "debug");
        assert_eq!(runtime.log_format, LogFormat::Json);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let runtime: RuntimeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(runtime.log_format, LogFormat::Pretty);
        assert!(!runtime.log_level.is_empty());
    }

    #[test]
    fn blank_filter_is_rejected() {
        let runtime = RuntimeConfig {
            log_level: "  ".into(),
            ..RuntimeConfig::default()
        };
        assert_eq!(runtime.validate(), Err(ValidationError::Blank("APP__LOG_LEVEL")));
    }
}
