//! Questionnaire answers collected by the plan flows.
//!
//! Each answer carries the value sent to the model (`prompt_value`) and the
//! wording shown on its selection button (`label`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// "What best describes your self-custody experience?"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CryptoExperience {
    Never,
    WalletUser,
    ColdStorage,
}

/// "How urgent is it for you to move some crypto off risky setups?"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CryptoUrgency {
    Low,
    Medium,
    High,
}

/// "How do you currently store most of your passwords?"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackupStorage {
    Browser,
    Notes,
    Manager,
    Unsure,
}

/// "What's your preferred security approach?"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackupSecurity {
    Simple,
    Balanced,
    Max,
}

/// AI tools offered as one-tap presets on the trust check.
pub const AI_TOOL_PRESETS: &[&str] = &["ChatGPT", "Gemini", "Claude", "Midjourney", "Other AI Tool"];

impl CryptoExperience {
    pub fn all() -> &'static [CryptoExperience] {
        &[
            CryptoExperience::Never,
            CryptoExperience::WalletUser,
            CryptoExperience::ColdStorage,
        ]
    }

    pub fn prompt_value(&self) -> &'static str {
        match self {
            CryptoExperience::Never => "Never",
            CryptoExperience::WalletUser => "WalletUser",
            CryptoExperience::ColdStorage => "ColdStorage",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CryptoExperience::Never => "I’ve never self-custodied before",
            CryptoExperience::WalletUser => "I’ve used a wallet before",
            CryptoExperience::ColdStorage => "I already use cold storage",
        }
    }
}

impl CryptoUrgency {
    pub fn all() -> &'static [CryptoUrgency] {
        &[CryptoUrgency::Low, CryptoUrgency::Medium, CryptoUrgency::High]
    }

    pub fn prompt_value(&self) -> &'static str {
        match self {
            CryptoUrgency::Low => "Low",
            CryptoUrgency::Medium => "Medium",
            CryptoUrgency::High => "High",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CryptoUrgency::Low => "Exploring (Low)",
            CryptoUrgency::Medium => "Ready to Improve (Med)",
            CryptoUrgency::High => "High Priority (High)",
        }
    }

    /// Helper line under the selection button.
    pub fn description(&self) -> &'static str {
        match self {
            CryptoUrgency::Low => "I’m just learning. I’m not moving large amounts yet.",
            CryptoUrgency::Medium => "I’m holding real value and want a safer setup this month.",
            CryptoUrgency::High => "If my exchange or device died tomorrow, I’d be stressed.",
        }
    }
}

impl BackupStorage {
    pub fn all() -> &'static [BackupStorage] {
        &[
            BackupStorage::Browser,
            BackupStorage::Notes,
            BackupStorage::Manager,
            BackupStorage::Unsure,
        ]
    }

    pub fn prompt_value(&self) -> &'static str {
        match self {
            BackupStorage::Browser => "Browser",
            BackupStorage::Notes => "Notes",
            BackupStorage::Manager => "Manager",
            BackupStorage::Unsure => "Unsure",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BackupStorage::Browser => "Browser auto-save",
            BackupStorage::Notes => "Notes app / notebook",
            BackupStorage::Manager => "Password manager",
            BackupStorage::Unsure => "I’m not sure",
        }
    }
}

impl BackupSecurity {
    pub fn all() -> &'static [BackupSecurity] {
        &[
            BackupSecurity::Simple,
            BackupSecurity::Balanced,
            BackupSecurity::Max,
        ]
    }

    pub fn prompt_value(&self) -> &'static str {
        match self {
            BackupSecurity::Simple => "Simple",
            BackupSecurity::Balanced => "Balanced",
            BackupSecurity::Max => "Max",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BackupSecurity::Simple => "Keep it simple",
            BackupSecurity::Balanced => "Balanced",
            BackupSecurity::Max => "Maximum security",
        }
    }
}

/// Matches an answer by its prompt value or its 1-based position in `all()`.
fn parse_answer<T: Copy>(
    field: &str,
    input: &str,
    all: &[T],
    prompt_value: impl Fn(&T) -> &'static str,
) -> Result<T, ValidationError> {
    let trimmed = input.trim();
    if let Ok(position) = trimmed.parse::<usize>() {
        if let Some(answer) = position.checked_sub(1).and_then(|i| all.get(i)) {
            return Ok(*answer);
        }
    }
    all.iter()
        .find(|answer| prompt_value(*answer).eq_ignore_ascii_case(trimmed))
        .copied()
        .ok_or_else(|| {
            ValidationError::invalid_format(field, format!("unknown answer '{}'", trimmed))
        })
}

impl FromStr for CryptoExperience {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_answer("experience", s, Self::all(), Self::prompt_value)
    }
}

impl FromStr for CryptoUrgency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_answer("urgency", s, Self::all(), Self::prompt_value)
    }
}

impl FromStr for BackupStorage {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_answer("storage", s, Self::all(), Self::prompt_value)
    }
}

impl FromStr for BackupSecurity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_answer("security", s, Self::all(), Self::prompt_value)
    }
}

impl fmt::Display for CryptoExperience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl fmt::Display for CryptoUrgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl fmt::Display for BackupStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl fmt::Display for BackupSecurity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
