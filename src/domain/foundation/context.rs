//! TopicContext enum - the topic scope threaded through prompts, chat framing,
//! tips and video lookup.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Topic the user is currently working through.
///
/// `Home` is the landing page: no flow selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TopicContext {
    #[default]
    Home,
    SecureCrypto,
    BackupAccounts,
    AiTrust,
}

impl TopicContext {
    /// Returns all contexts, landing page first.
    pub fn all() -> &'static [TopicContext] {
        &[
            TopicContext::Home,
            TopicContext::SecureCrypto,
            TopicContext::BackupAccounts,
            TopicContext::AiTrust,
        ]
    }

    /// Maps the optional wire value (null for the landing page).
    pub fn from_wire(value: Option<&str>) -> Result<Self, ValidationError> {
        match value {
            None => Ok(TopicContext::Home),
            Some(raw) => raw.parse(),
        }
    }

    /// Wire value, `None` for the landing page.
    pub fn wire_name(&self) -> Option<&'static str> {
        match self {
            TopicContext::Home => None,
            TopicContext::SecureCrypto => Some("SECURE_CRYPTO"),
            TopicContext::BackupAccounts => Some("BACKUP_ACCOUNTS"),
            TopicContext::AiTrust => Some("AI_TRUST"),
        }
    }

    /// Human phrasing used inside prompts.
    pub fn topic_phrase(&self) -> &'static str {
        match self {
            TopicContext::Home => "general digital security",
            TopicContext::SecureCrypto => "crypto self-custody",
            TopicContext::BackupAccounts => "password and identity backup",
            TopicContext::AiTrust => "safe use of AI tools",
        }
    }

    /// Returns the display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            TopicContext::Home => "Home",
            TopicContext::SecureCrypto => "Secure My Crypto",
            TopicContext::BackupAccounts => "Back Up My Accounts",
            TopicContext::AiTrust => "AI Trust Check",
        }
    }
}

impl fmt::Display for TopicContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for TopicContext {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "" | "HOME" | "NULL" => Ok(TopicContext::Home),
            "SECURE_CRYPTO" | "CRYPTO" => Ok(TopicContext::SecureCrypto),
            "BACKUP_ACCOUNTS" | "BACKUP" => Ok(TopicContext::BackupAccounts),
            "AI_TRUST" | "AI" => Ok(TopicContext::AiTrust),
            other => Err(ValidationError::invalid_format(
                "context",
                format!("unknown topic context '{}'", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_home() {
        assert_eq!(TopicContext::default(), TopicContext::Home);
    }

    #[test]
    fn wire_names_round_trip() {
        for ctx in TopicContext::all() {
            assert_eq!(TopicContext::from_wire(ctx.wire_name()).unwrap(), *ctx);
        }
    }

    #[test]
    fn serializes_screaming_snake_case() {
        let json = serde_json::to_string(&TopicContext::BackupAccounts).unwrap();
        assert_eq!(json, "\"BACKUP_ACCOUNTS\"");

        let parsed: TopicContext = serde_json::from_str("\"AI_TRUST\"").unwrap();
        assert_eq!(parsed, TopicContext::AiTrust);
    }

    #[test]
    fn parses_short_aliases() {
        assert_eq!("crypto".parse::<TopicContext>().unwrap(), TopicContext::SecureCrypto);
        assert_eq!("backup".parse::<TopicContext>().unwrap(), TopicContext::BackupAccounts);
        assert_eq!("ai-trust".parse::<TopicContext>().unwrap(), TopicContext::AiTrust);
    }

    #[test]
    fn rejects_unknown_context() {
        assert!("banking".parse::<TopicContext>().is_err());
    }
}
