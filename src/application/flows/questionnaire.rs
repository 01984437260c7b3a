//! Questionnaires collected by the three plan flows.

use futures::future::BoxFuture;
use std::fmt;

use crate::domain::foundation::TopicContext;
use crate::domain::plan::{
    ActionPlan, BackupSecurity, BackupStorage, CryptoExperience, CryptoUrgency,
};
use crate::ports::{AiGateway, GatewayError};

/// Selections a flow gathers before it can ask the gateway for a plan.
pub trait Questionnaire: Default + Send + 'static {
    /// Complete, validated selections.
    type Answers: Clone + fmt::Debug + Send + Sync + 'static;

    /// Topic this flow belongs to.
    const CONTEXT: TopicContext;

    /// Alert shown when generation fails.
    const FAILURE_ALERT: &'static str;

    /// `Some` once every required selection is made.
    fn answers(&self) -> Option<Self::Answers>;

    /// Asks the gateway for this flow's plan.
    fn generate<'a>(
        gateway: &'a dyn AiGateway,
        answers: &'a Self::Answers,
    ) -> BoxFuture<'a, Result<ActionPlan, GatewayError>>;

    fn is_complete(&self) -> bool {
        self.answers().is_some()
    }
}

/// "Secure My Crypto": experience plus urgency.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CryptoQuestionnaire {
    pub experience: Option<CryptoExperience>,
    pub urgency: Option<CryptoUrgency>,
}

impl CryptoQuestionnaire {
    pub fn select_experience(&mut self, experience: CryptoExperience) {
        self.experience = Some(experience);
    }

    pub fn select_urgency(&mut self, urgency: CryptoUrgency) {
        self.urgency = Some(urgency);
    }
}

impl Questionnaire for CryptoQuestionnaire {
    type Answers = (CryptoExperience, CryptoUrgency);

    const CONTEXT: TopicContext = TopicContext::SecureCrypto;
    const FAILURE_ALERT: &'static str =
        "Could not generate plan. Please check your internet connection and try again.";

    fn answers(&self) -> Option<Self::Answers> {
        Some((self.experience?, self.urgency?))
    }

    fn generate<'a>(
        gateway: &'a dyn AiGateway,
        answers: &'a Self::Answers,
    ) -> BoxFuture<'a, Result<ActionPlan, GatewayError>> {
        let (experience, urgency) = *answers;
        gateway.generate_crypto_plan(experience, urgency)
    }
}

/// "Back Up My Accounts": current storage plus preferred approach.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackupQuestionnaire {
    pub storage: Option<BackupStorage>,
    pub security: Option<BackupSecurity>,
}

impl BackupQuestionnaire {
    pub fn select_storage(&mut self, storage: BackupStorage) {
        self.storage = Some(storage);
    }

    pub fn select_security(&mut self, security: BackupSecurity) {
        self.security = Some(security);
    }
}

impl Questionnaire for BackupQuestionnaire {
    type Answers = (BackupStorage, BackupSecurity);

    const CONTEXT: TopicContext = TopicContext::BackupAccounts;
    const FAILURE_ALERT: &'static str = "Could not generate plan. Please try again.";

    fn answers(&self) -> Option<Self::Answers> {
        Some((self.storage?, self.security?))
    }

    fn generate<'a>(
        gateway: &'a dyn AiGateway,
        answers: &'a Self::Answers,
    ) -> BoxFuture<'a, Result<ActionPlan, GatewayError>> {
        let (storage, security) = *answers;
        gateway.generate_backup_plan(storage, security)
    }
}

/// "AI Trust Check": a tool name or URL, typed or picked from the presets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AiTrustQuestionnaire {
    pub tool: String,
}

impl AiTrustQuestionnaire {
    pub fn set_tool(&mut self, tool: impl Into<String>) {
        self.tool = tool.into();
    }
}

impl Questionnaire for AiTrustQuestionnaire {
    type Answers = String;

    const CONTEXT: TopicContext = TopicContext::AiTrust;
    const FAILURE_ALERT: &'static str = "Could not generate snapshot. Please try again.";

    fn answers(&self) -> Option<Self::Answers> {
        let tool = self.tool.trim();
        if tool.is_empty() {
            None
        } else {
            Some(tool.to_string())
        }
    }

    fn generate<'a>(
        gateway: &'a dyn AiGateway,
        answers: &'a Self::Answers,
    ) -> BoxFuture<'a, Result<ActionPlan, GatewayError>> {
        gateway.generate_ai_trust_snapshot(answers)
    }
}
