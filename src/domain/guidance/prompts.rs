//! Prompt templates for plan generation, step explanations and chat framing.

use crate::domain::foundation::TopicContext;
use crate::domain::plan::{BackupSecurity, BackupStorage, CryptoExperience, CryptoUrgency};

/// Suffix every trust snapshot title ends with.
pub const TRUST_SNAPSHOT_SUFFIX: &str = " Trust Snapshot";

/// Timeframe every trust snapshot uses.
pub const TRUST_SNAPSHOT_TIMEFRAME: &str = "Use these rules anytime you use this tool";

/// Greeting shown whenever the assistant is (re)initialised.
pub const CHAT_GREETING: &str = "Hi, I’m the Self-Defi Security Guide. I can help with crypto safety, password backups, or AI privacy — whichever path you’re taking today.";

/// One-tap questions offered under the chat input.
pub const QUICK_PROMPTS: &[&str] = &[
    "How do I safely store my crypto?",
    "How do I avoid phishing scams?",
    "What data is safe to paste into AI tools?",
];

pub fn crypto_plan_prompt(experience: CryptoExperience, urgency: CryptoUrgency) -> String {
    format!(
        r#"Generate a crypto security action plan based on:
- Experience Level: {experience}
- Urgency: {urgency}

Rules:
1. Title must reflect experience and urgency.
2. Timeframe must be a short phrase like "Do this in the next 24 hours".
3. Steps must be exactly 3 clear, non-technical actions the user can take without connecting a wallet or revealing keys.
4. Notes must be a short safety reminder about never sharing seed phrases, private keys, or passwords."#,
        experience = experience.prompt_value(),
        urgency = urgency.prompt_value(),
    )
}

pub fn backup_plan_prompt(storage: BackupStorage, security: BackupSecurity) -> String {
    format!(
        r#"Generate a password/identity backup plan based on:
- Current Storage: {storage}
- Preferred Approach: {security}

Rules:
1. Focus on improving password manager usage or safe backup locations.
2. Steps must be exactly 3 clear actions to reduce single points of failure.
3. Timeframe should be realistic (e.g., "This weekend").
4. Notes should be a safety reminder."#,
        storage = storage.prompt_value(),
        security = security.prompt_value(),
    )
}

pub fn ai_trust_prompt(tool: &str) -> String {
    format!(
        r#"Generate an AI Trust Snapshot for the tool: "{tool}".

Rules:
1. Title must be the tool name + "{suffix}".
2. Timeframe must be "{timeframe}".
3. Steps must be exactly 3 concrete "do / don't" style rules (e.g., what is safe to paste, what to avoid).
4. Notes must include a disclaimer to review the tool's own privacy policy."#,
        tool = tool,
        suffix = TRUST_SNAPSHOT_SUFFIX,
        timeframe = TRUST_SNAPSHOT_TIMEFRAME,
    )
}

pub fn step_explanation_prompt(step: &str, context: TopicContext) -> String {
    format!(
        r#"Context: {context}
Step: "{step}"

Explain this crypto / security / AI safety step in simple, non-technical language for a beginner.
Keep it under 200 words and include 2–3 very concrete sub-actions they can perform.
Do not use markdown formatting like bold or headers, just plain text paragraphs."#,
        context = context.topic_phrase(),
        step = step,
    )
}

const CHAT_GROUND_RULES: &str = "You are the Self-Defi Security Guide, a friendly assistant for beginners.
Rules you always follow:
- Give general education only. Never give financial, investment, tax or legal advice.
- Never ask for, accept, or produce secrets: private keys, seed or recovery phrases, passwords, 2FA codes, or personal data. If the user shares one, tell them to stop and treat it as compromised.
- Only discuss crypto self-custody, account and password safety, scams, and safe use of AI tools. Politely refuse anything else.
- Keep every answer short: 2 to 5 sentences, plain language, no jargon.";

/// System instruction for a chat session bound to `context`.
pub fn chat_system_instruction(context: TopicContext) -> String {
    let focus = match context {
        TopicContext::Home => {
            "The user has not picked a path yet. Help them choose between securing crypto, backing up accounts, or checking an AI tool."
        }
        TopicContext::SecureCrypto => {
            "The user is building a crypto self-custody plan. Focus on wallets, seed phrase storage, test transactions and moving funds off exchanges."
        }
        TopicContext::BackupAccounts => {
            "The user is improving password and identity backups. Focus on password managers, authenticator apps, recovery codes and removing single points of failure."
        }
        TopicContext::AiTrust => {
            "The user is checking whether an AI tool is safe to use. Focus on what is safe to paste, privacy settings, chat history and data retention."
        }
    };
    format!("{}\n\n{}", CHAT_GROUND_RULES, focus)
}
