//! Offline Gateway - deterministic local content used when no API key is set.
//!
//! Every plan has exactly three non-empty steps and is derived only from its
//! inputs, so the same answers always produce the same plan. No network
//! access happens here.

use async_trait::async_trait;
use futures::stream;

use crate::domain::foundation::TopicContext;
use crate::domain::guidance::prompts::{TRUST_SNAPSHOT_SUFFIX, TRUST_SNAPSHOT_TIMEFRAME};
use crate::domain::plan::{
    ActionPlan, BackupSecurity, BackupStorage, CryptoExperience, CryptoUrgency,
};
use crate::ports::{AiGateway, ChatSession, ChunkStream, GatewayError, GatewayMode};

const CRYPTO_NOTES: &str = "Never share your seed phrase, private keys or passwords with anyone, including support staff or this guide. Nobody legitimate will ever ask for them.";
const BACKUP_NOTES: &str = "Never reuse your master password anywhere else, and never type recovery codes into a site you reached from a link.";

/// Deterministic gateway with canned, input-dependent content.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineGateway;

impl OfflineGateway {
    pub fn new() -> Self {
        Self
    }

    pub fn crypto_plan(experience: CryptoExperience, urgency: CryptoUrgency) -> Result<ActionPlan, GatewayError> {
        let level = match experience {
            CryptoExperience::Never => "First Self-Custody",
            CryptoExperience::WalletUser => "Wallet Hardening",
            CryptoExperience::ColdStorage => "Cold Storage Review",
        };
        let timeframe = match urgency {
            CryptoUrgency::Low => "Over the next month",
            CryptoUrgency::Medium => "This week",
            CryptoUrgency::High => "Do this in the next 24 hours",
        };
        let steps = match experience {
            CryptoExperience::Never => [
                "Choose a well-known hardware wallet and order it directly from the maker's official website.",
                "Write your seed phrase on paper during setup and store it somewhere private and fireproof.",
                "Send a small test amount from your exchange to the new wallet before moving anything larger.",
            ],
            CryptoExperience::WalletUser => [
                "Check that your seed phrase backup is offline, readable and stored away from your devices.",
                "Move long-term savings off the exchange into a wallet only you control.",
                "Revoke old token approvals and remove browser extensions you no longer use.",
            ],
            CryptoExperience::ColdStorage => [
                "Do a test recovery of your seed phrase on a spare device to confirm the backup works.",
                "Keep a second copy of your recovery phrase in a separate secure location.",
                "Write down a simple inheritance note explaining where your wallet and backups are.",
            ],
        };

        build_plan(
            format!("{} Plan ({} Urgency)", level, urgency.prompt_value()),
            timeframe,
            steps,
            CRYPTO_NOTES,
        )
    }

    pub fn backup_plan(storage: BackupStorage, security: BackupSecurity) -> Result<ActionPlan, GatewayError> {
        let approach = match security {
            BackupSecurity::Simple => "Simple",
            BackupSecurity::Balanced => "Balanced",
            BackupSecurity::Max => "Maximum Security",
        };
        let starting_point = match storage {
            BackupStorage::Browser => "Browser Passwords",
            BackupStorage::Notes => "Notes-Based Passwords",
            BackupStorage::Manager => "Password Manager",
            BackupStorage::Unsure => "Unknown Password Setup",
        };
        let timeframe = match security {
            BackupSecurity::Simple => "This weekend",
            BackupSecurity::Balanced => "Over the next week",
            BackupSecurity::Max => "Over the next two weekends",
        };
        let first = match storage {
            BackupStorage::Browser => "Export your browser's saved passwords into a dedicated password manager, then turn off browser auto-save.",
            BackupStorage::Notes => "Move every password from your notes into a password manager, then delete the old notes.",
            BackupStorage::Manager => "Run your password manager's security check and change any reused or weak passwords.",
            BackupStorage::Unsure => "List your five most important accounts and pick a password manager to hold their passwords.",
        };
        let second = match security {
            BackupSecurity::Simple => "Turn on two-step login with an authenticator app for your email account.",
            BackupSecurity::Balanced => "Turn on two-step login with an authenticator app for your email, bank and password manager.",
            BackupSecurity::Max => "Use an authenticator app or a hardware security key on every account that supports it.",
        };

        build_plan(
            format!("{} Backup Plan: {}", approach, starting_point),
            timeframe,
            [
                first,
                second,
                "Print your recovery codes and store them somewhere safe that is not on your computer.",
            ],
            BACKUP_NOTES,
        )
    }

    pub fn ai_trust_snapshot(tool: &str) -> Result<ActionPlan, GatewayError> {
        let tool = tool.trim();
        build_plan(
            format!("{}{}", tool, TRUST_SNAPSHOT_SUFFIX),
            TRUST_SNAPSHOT_TIMEFRAME,
            [
                "Do paste general questions, public text and drafts with names and numbers removed.",
                "Don't paste passwords, seed phrases, ID numbers, health records or private client data.",
                "Do check the privacy settings and turn off chat history or training on your data if you can.",
            ],
            format!(
                "This is general guidance only. Review {}'s own privacy policy and data settings before sharing anything sensitive.",
                tool
            ),
        )
    }

    pub fn step_explanation(step: &str, context: TopicContext) -> String {
        let actions = match context {
            TopicContext::Home => "First, decide which area matters most to you right now. Second, set aside twenty quiet minutes. Third, follow one small action at a time instead of changing everything at once.",
            TopicContext::SecureCrypto => "First, do this on a device you trust and with nobody watching your screen. Second, write down anything important on paper, never in a photo or cloud note. Third, try it with a tiny amount before trusting it with real savings.",
            TopicContext::BackupAccounts => "First, start with your email account because it can reset everything else. Second, save any recovery codes on paper in a safe place. Third, log out and back in once to prove the new setup works.",
            TopicContext::AiTrust => "First, open the tool's settings page and look for privacy or data controls. Second, remove names, numbers and anything identifying before you paste. Third, when in doubt, leave it out.",
        };
        format!(
            "This step is about {}: \"{}\". It protects you by removing a single point of failure, so one mistake or one lost device does not cost you everything.\n\n{}",
            context.topic_phrase(),
            step.trim(),
            actions
        )
    }

    /// Canned reply for an offline chat turn.
    pub fn chat_reply(text: &str, context: TopicContext) -> String {
        let framing = match context {
            TopicContext::Home => "Pick one of the three paths on the home screen and I can walk you through it.",
            TopicContext::SecureCrypto => "For crypto, the golden rule is that your seed phrase stays offline and private.",
            TopicContext::BackupAccounts => "For account backups, a password manager plus an authenticator app covers most risks.",
            TopicContext::AiTrust => "For AI tools, treat anything you paste as something that could be stored.",
        };
        format!(
            "I'm running in offline mode, so this is a general answer to \"{}\". {}",
            text.trim(),
            framing
        )
    }
}

fn build_plan(
    title: impl Into<String>,
    timeframe: impl Into<String>,
    steps: [&str; 3],
    notes: impl Into<String>,
) -> Result<ActionPlan, GatewayError> {
    ActionPlan::new(
        title,
        timeframe,
        steps.iter().map(|s| s.to_string()).collect(),
        notes,
    )
    .map_err(|e| GatewayError::generation(e.to_string()))
}

#[async_trait]
impl AiGateway for OfflineGateway {
    async fn generate_crypto_plan(
        &self,
        experience: CryptoExperience,
        urgency: CryptoUrgency,
    ) -> Result<ActionPlan, GatewayError> {
        Self::crypto_plan(experience, urgency)
    }

    async fn generate_backup_plan(
        &self,
        storage: BackupStorage,
        security: BackupSecurity,
    ) -> Result<ActionPlan, GatewayError> {
        Self::backup_plan(storage, security)
    }

    async fn generate_ai_trust_snapshot(&self, tool: &str) -> Result<ActionPlan, GatewayError> {
        Self::ai_trust_snapshot(tool)
    }

    async fn generate_step_explanation(
        &self,
        step: &str,
        context: TopicContext,
    ) -> Result<String, GatewayError> {
        Ok(Self::step_explanation(step, context))
    }

    fn create_chat_session(&self, context: TopicContext) -> Box<dyn ChatSession> {
        Box::new(OfflineChatSession { context })
    }

    fn mode(&self) -> GatewayMode {
        GatewayMode::Offline
    }
}

/// Offline chat; each reply arrives as a single chunk.
#[derive(Debug, Clone, Copy)]
pub struct OfflineChatSession {
    context: TopicContext,
}

#[async_trait]
impl ChatSession for OfflineChatSession {
    fn context(&self) -> TopicContext {
        self.context
    }

    async fn send_message_stream(&self, text: &str) -> Result<ChunkStream, GatewayError> {
        let reply = OfflineGateway::chat_reply(text, self.context);
        Ok(Box::pin(stream::iter(vec![Ok(reply)])))
    }
}
