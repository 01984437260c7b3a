//! Local keyword heuristics that add a "pro tip" to assistant replies.
//!
//! Purely local: no network, no state.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::foundation::TopicContext;

/// Keyword family a tip is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TipCategory {
    SeedPhrase,
    Custodial,
    Phishing,
    TwoFactor,
    HardwareWallet,
    PasswordManager,
    AiTools,
}

struct TipRule {
    category: TipCategory,
    pattern: Regex,
    tip: &'static str,
}

// Patterns run against lower-cased input, in this order.
static RULES: Lazy<Vec<TipRule>> = Lazy::new(|| {
    [
        (
            TipCategory::SeedPhrase,
            r"seed|recovery|mnemonic|secret phrase",
            "Never type your seed phrase online. Store it offline in two safe places.",
        ),
        (
            TipCategory::Custodial,
            r"exchange|coinbase|binance|kraken|custodial",
            "If you don’t control keys, it's not your crypto. Exchanges are for buying/selling, not storage.",
        ),
        (
            TipCategory::Phishing,
            r"phishing|scam|fake|link|dm|airdrop",
            "Never click wallet links from DMs. Always type the URL yourself or use bookmarks.",
        ),
        (
            TipCategory::TwoFactor,
            r"2fa|authenticator|sms|factor",
            "Prefer an authenticator app (like Google Auth or YubiKey) over SMS 2FA.",
        ),
        (
            TipCategory::HardwareWallet,
            r"hardware|cold|trezor|ledger|coldcard",
            "Do a small test send first… confirm on-device.",
        ),
        (
            TipCategory::PasswordManager,
            r"password manager|lastpass|1password|bitwarden|keeper",
            "One strong master password, backed up offline, never reused.",
        ),
        (
            TipCategory::AiTools,
            r"ai tool|privacy|data|chatgpt|gemini|claude|copilot",
            "Don’t paste IDs, passwords, seed phrases, private keys, or unreleased strategies.",
        ),
    ]
    .into_iter()
    .filter_map(|(category, pattern, tip)| match Regex::new(pattern) {
        Ok(pattern) => Some(TipRule {
            category,
            pattern,
            tip,
        }),
        Err(err) => {
            tracing::error!(?category, %err, "Invalid pro tip pattern");
            None
        }
    })
    .collect()
});

/// Categories whose keywords appear anywhere in `user_text`.
pub fn matched_categories(user_text: &str) -> Vec<TipCategory> {
    let text = user_text.to_lowercase();
    RULES
        .iter()
        .filter(|rule| rule.pattern.is_match(&text))
        .map(|rule| rule.category)
        .collect()
}

/// Returns the tips triggered by `user_text`, each at most once, in rule order.
///
/// `context` is accepted so callers thread the current topic through, but
/// tips are not filtered by it.
pub fn pro_tips(user_text: &str, _context: TopicContext) -> Vec<&'static str> {
    let text = user_text.to_lowercase();
    let mut tips: Vec<&'static str> = Vec::new();
    for rule in RULES.iter() {
        if rule.pattern.is_match(&text) && !tips.contains(&rule.tip) {
            tips.push(rule.tip);
        }
    }
    tips
}

/// Formats tips the way they are appended to an assistant reply.
pub fn format_tip_suffix(tips: &[&str]) -> Option<String> {
    if tips.is_empty() {
        None
    } else {
        Some(format!("\n\n💡 Pro tip: {}", tips.join(" ")))
    }
}
