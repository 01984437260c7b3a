//! AI Gateway Port - Interface to the generative inference provider.
//!
//! The gateway turns domain requests (questionnaire answers, a plan step, a
//! chat turn) into model calls and hands back validated domain values.
//!
//! # Design
//!
//! - Three structured operations return an [`ActionPlan`]
//! - One free-text operation returns a plain explanation
//! - Chat sessions are created per topic context and stream their replies
//! - Two implementations exist: a live provider and an offline stub. The
//!   choice is made once at startup from credential presence.
//!
//! # Example
//!
//! ```ignore
//! let gateway: Arc<dyn AiGateway> = select_gateway(&config.ai);
//! let plan = gateway
//!     .generate_crypto_plan(CryptoExperience::Never, CryptoUrgency::High)
//!     .await?;
//! ```

use async_trait::async_trait;
use futures::Stream;
use std::fmt;
use std::pin::Pin;

use crate::domain::foundation::TopicContext;
use crate::domain::plan::{
    ActionPlan, BackupSecurity, BackupStorage, CryptoExperience, CryptoUrgency,
};

/// Incremental text chunks of a chat reply, in arrival order.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<String, GatewayError>> + Send>>;

/// Port for plan generation, step explanations and chat sessions.
#[async_trait]
pub trait AiGateway: Send + Sync {
    /// Crypto self-custody plan for the given experience and urgency.
    async fn generate_crypto_plan(
        &self,
        experience: CryptoExperience,
        urgency: CryptoUrgency,
    ) -> Result<ActionPlan, GatewayError>;

    /// Password/identity backup plan for the given storage and preference.
    async fn generate_backup_plan(
        &self,
        storage: BackupStorage,
        security: BackupSecurity,
    ) -> Result<ActionPlan, GatewayError>;

    /// Trust snapshot for an AI tool name or URL.
    ///
    /// The title ends in "Trust Snapshot" and the notes point the user to
    /// the tool's privacy policy.
    async fn generate_ai_trust_snapshot(&self, tool: &str) -> Result<ActionPlan, GatewayError>;

    /// Plain-text, beginner-level explanation of one plan step.
    async fn generate_step_explanation(
        &self,
        step: &str,
        context: TopicContext,
    ) -> Result<String, GatewayError>;

    /// Opens a multi-turn session framed for `context`.
    fn create_chat_session(&self, context: TopicContext) -> Box<dyn ChatSession>;

    /// Which implementation is serving requests.
    fn mode(&self) -> GatewayMode;
}

/// A multi-turn conversation bound to one topic context.
#[async_trait]
pub trait ChatSession: Send + Sync {
    /// Context this session was framed for.
    fn context(&self) -> TopicContext;

    /// Sends one user turn and returns the reply as a stream of text chunks.
    async fn send_message_stream(&self, text: &str) -> Result<ChunkStream, GatewayError>;
}

/// Operating mode of the gateway, fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayMode {
    /// Real calls to the inference provider.
    Live,
    /// Deterministic local content, no network access.
    Offline,
}

impl fmt::Display for GatewayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayMode::Live => write!(f, "live"),
            GatewayMode::Offline => write!(f, "offline"),
        }
    }
}

/// Gateway errors.
///
/// The message is for logs only; callers show their own generic text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// Credential missing or rejected by the provider.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The call succeeded but returned empty or non-conforming content.
    #[error("generation error: {0}")]
    Generation(String),

    /// Network or HTTP failure.
    #[error("transport error: {0}")]
    Transport(String),
}

impl GatewayError {
    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates a generation error.
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }

    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Short category name for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::Configuration(_) => "configuration",
            GatewayError::Generation(_) => "generation",
            GatewayError::Transport(_) => "transport",
        }
    }
}
