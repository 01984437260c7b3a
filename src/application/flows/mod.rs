//! Plan flows - one controller per questionnaire view.

mod plan_flow;
mod questionnaire;

pub use plan_flow::{PlanFlow, SubmitOutcome};
pub use questionnaire::{
    AiTrustQuestionnaire, BackupQuestionnaire, CryptoQuestionnaire, Questionnaire,
};

/// "Secure My Crypto" flow.
pub type CryptoFlow = PlanFlow<CryptoQuestionnaire>;

/// "Back Up My Accounts" flow.
pub type BackupFlow = PlanFlow<BackupQuestionnaire>;

/// "AI Trust Check" flow.
pub type AiTrustFlow = PlanFlow<AiTrustQuestionnaire>;
