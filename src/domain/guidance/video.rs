//! Static lookup of explainer videos for plan steps.

use crate::domain::foundation::TopicContext;

/// Walkthrough shown on the landing page.
pub const INTRO_VIDEO_URL: &str =
    "https://ipfs.io/ipfs/bafybeih3x42itzuigx3dfw63pjg4mtpdtmc5u6mrtqhp4j5m6n2fnjjcdm";

const CRYPTO_VIDEOS: &[(&str, &str)] = &[
    (
        "hardware wallet",
        "https://www.youtube.com/results?search_query=hardware+wallet+setup+for+beginners",
    ),
    (
        "seed phrase",
        "https://www.youtube.com/results?search_query=how+to+store+a+seed+phrase+safely",
    ),
    (
        "recovery phrase",
        "https://www.youtube.com/results?search_query=how+to+store+a+seed+phrase+safely",
    ),
    (
        "test",
        "https://www.youtube.com/results?search_query=crypto+test+transaction+small+amount",
    ),
    (
        "exchange",
        "https://www.youtube.com/results?search_query=withdraw+crypto+from+exchange+to+wallet",
    ),
];

const BACKUP_VIDEOS: &[(&str, &str)] = &[
    (
        "password manager",
        "https://www.youtube.com/results?search_query=password+manager+setup+for+beginners",
    ),
    (
        "authenticator",
        "https://www.youtube.com/results?search_query=set+up+authenticator+app+2fa",
    ),
    (
        "2fa",
        "https://www.youtube.com/results?search_query=set+up+authenticator+app+2fa",
    ),
    (
        "recovery code",
        "https://www.youtube.com/results?search_query=store+2fa+backup+recovery+codes",
    ),
    (
        "backup code",
        "https://www.youtube.com/results?search_query=store+2fa+backup+recovery+codes",
    ),
];

const AI_TRUST_VIDEOS: &[(&str, &str)] = &[
    (
        "privacy",
        "https://www.youtube.com/results?search_query=ai+chatbot+privacy+settings",
    ),
    (
        "history",
        "https://www.youtube.com/results?search_query=turn+off+chat+history+ai+training",
    ),
    (
        "paste",
        "https://www.youtube.com/results?search_query=what+not+to+share+with+ai+chatbots",
    ),
];

fn table_for(context: TopicContext) -> &'static [(&'static str, &'static str)] {
    match context {
        TopicContext::Home => &[],
        TopicContext::SecureCrypto => CRYPTO_VIDEOS,
        TopicContext::BackupAccounts => BACKUP_VIDEOS,
        TopicContext::AiTrust => AI_TRUST_VIDEOS,
    }
}

/// Returns the first video whose keyword appears in `step_text` (case-insensitive).
pub fn video_url_for_step(step_text: &str, context: TopicContext) -> Option<&'static str> {
    let text = step_text.to_lowercase();
    table_for(context)
        .iter()
        .find(|(keyword, _)| text.contains(keyword))
        .map(|(_, url)| *url)
}
