//! Domain validation failures.

use thiserror::Error;

/// Raised when a value or a state change breaks a domain rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    EmptyField { field: String },

    #[error("{field} is malformed: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("Cannot move from {from} to {to}")]
    IllegalTransition { from: String, to: String },
}

impl ValidationError {
    pub fn empty_field(field: impl Into<String>) -> Self {
        Self::EmptyField { field: field.into() }
    }

    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Offending field, if the error is about one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::EmptyField { field } | Self::InvalidFormat { field, .. } => Some(field),
            Self::IllegalTransition { .. } => None,
        }
    }
}
