//! Application layer - controllers driving the views.
//!
//! Each controller owns its own state and talks to the gateway port:
//! - `flows` - questionnaire → plan controllers
//! - `explainer` - step drill-down panel
//! - `chat` - assistant widget and its open-with-prefill channel

pub mod chat;
pub mod explainer;
pub mod flows;
mod guard;

pub use chat::{ChatLauncher, ChatSnapshot, ChatWidget, OpenChatRequest, SendOutcome};
pub use explainer::{ExplainerView, StepExplainer, EXPLAINER_DISCLAIMER, EXPLAINER_ERROR};
pub use flows::{
    AiTrustFlow, AiTrustQuestionnaire, BackupFlow, BackupQuestionnaire, CryptoFlow,
    CryptoQuestionnaire, PlanFlow, Questionnaire, SubmitOutcome,
};
