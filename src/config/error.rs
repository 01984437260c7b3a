//! Configuration errors

use thiserror::Error;

/// Failure while building `AppConfig` from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// A loaded value that cannot be used.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} must not be blank")]
    Blank(&'static str),

    #[error("AI__TIMEOUT_SECS must be between 1 and 300, got {0}")]
    TimeoutOutOfRange(u64),

    #[error("AI__BASE_URL must be an http(s) URL, got '{0}'")]
    UnsupportedScheme(String),
}
