//! Mock AI Gateway for testing.
//!
//! Provides a configurable implementation of the `AiGateway` port so
//! controller tests run without network access.
//!
//! # Features
//!
//! - Pre-configured responses, consumed in order across all operations
//! - Simulated latency per request and per streamed chunk
//! - Error injection, including failures part-way through a stream
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let gateway = MockAiGateway::new()
//!     .with_chunks(["Use a ", "password manager."])
//!     .with_delay(Duration::from_millis(50));
//!
//! let session = gateway.create_chat_session(TopicContext::BackupAccounts);
//! let stream = session.send_message_stream("help").await?;
//! ```
//!
//! When the queue is empty, plan operations fall back to the offline
//! content and chat replies echo the user's text.

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::sleep;

use super::OfflineGateway;
use crate::domain::foundation::TopicContext;
use crate::domain::plan::{
    ActionPlan, BackupSecurity, BackupStorage, CryptoExperience, CryptoUrgency,
};
use crate::ports::{AiGateway, ChatSession, ChunkStream, GatewayError, GatewayMode};

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Returned by plan operations.
    Plan(ActionPlan),
    /// Returned by the explanation call, or as a one-chunk chat reply.
    Text(String),
    /// Streamed chat reply.
    Chunks(Vec<String>),
    /// Streams `chunks`, then fails with `error`.
    StreamError {
        chunks: Vec<String>,
        error: GatewayError,
    },
    /// Fails the call outright.
    Error(GatewayError),
}

/// A recorded gateway call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    CryptoPlan {
        experience: CryptoExperience,
        urgency: CryptoUrgency,
    },
    BackupPlan {
        storage: BackupStorage,
        security: BackupSecurity,
    },
    AiTrustSnapshot {
        tool: String,
    },
    StepExplanation {
        step: String,
        context: TopicContext,
    },
    ChatSessionCreated {
        context: TopicContext,
    },
    ChatMessage {
        context: TopicContext,
        text: String,
    },
}

#[derive(Debug, Default)]
struct MockState {
    responses: Mutex<VecDeque<MockResponse>>,
    calls: Mutex<Vec<MockCall>>,
}

/// Mock gateway for testing.
#[derive(Debug, Clone)]
pub struct MockAiGateway {
    state: Arc<MockState>,
    delay: Duration,
    chunk_delay: Duration,
    mode: GatewayMode,
}

impl Default for MockAiGateway {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockAiGateway {
    /// Creates a new mock gateway with an empty queue and no latency.
    pub fn new() -> Self {
        Self {
            state: Arc::new(MockState::default()),
            delay: Duration::ZERO,
            chunk_delay: Duration::ZERO,
            mode: GatewayMode::Live,
        }
    }

    /// Queues an arbitrary response.
    pub fn with_response(self, response: MockResponse) -> Self {
        lock(&self.state.responses).push_back(response);
        self
    }

    /// Queues a plan.
    pub fn with_plan(self, plan: ActionPlan) -> Self {
        self.with_response(MockResponse::Plan(plan))
    }

    /// Queues a text response.
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_response(MockResponse::Text(text.into()))
    }

    /// Queues a streamed chat reply.
    pub fn with_chunks<I, S>(self, chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_response(MockResponse::Chunks(chunks.into_iter().map(Into::into).collect()))
    }

    /// Queues an error.
    pub fn with_error(self, error: GatewayError) -> Self {
        self.with_response(MockResponse::Error(error))
    }

    /// Sets simulated latency before each call answers.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Sets simulated latency before each streamed chunk.
    pub fn with_chunk_delay(mut self, delay: Duration) -> Self {
        self.chunk_delay = delay;
        self
    }

    /// Sets the mode reported by `mode()`.
    pub fn with_mode(mut self, mode: GatewayMode) -> Self {
        self.mode = mode;
        self
    }

    /// Returns the number of calls recorded so far.
    pub fn call_count(&self) -> usize {
        lock(&self.state.calls).len()
    }

    /// Returns all recorded calls.
    pub fn calls(&self) -> Vec<MockCall> {
        lock(&self.state.calls).clone()
    }

    /// Clears the call history.
    pub fn clear_calls(&self) {
        lock(&self.state.calls).clear();
    }

    fn record(&self, call: MockCall) {
        lock(&self.state.calls).push(call);
    }

    fn next_response(&self) -> Option<MockResponse> {
        lock(&self.state.responses).pop_front()
    }

    async fn simulate_latency(&self) {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
    }

    async fn plan_or(
        &self,
        fallback: impl FnOnce() -> Result<ActionPlan, GatewayError>,
    ) -> Result<ActionPlan, GatewayError> {
        self.simulate_latency().await;
        match self.next_response() {
            Some(MockResponse::Plan(plan)) => Ok(plan),
            Some(MockResponse::Error(err)) => Err(err),
            Some(other) => Err(GatewayError::generation(format!(
                "Mock queued {:?} for a plan request",
                other
            ))),
            None => fallback(),
        }
    }
}

#[async_trait]
impl AiGateway for MockAiGateway {
    async fn generate_crypto_plan(
        &self,
        experience: CryptoExperience,
        urgency: CryptoUrgency,
    ) -> Result<ActionPlan, GatewayError> {
        self.record(MockCall::CryptoPlan { experience, urgency });
        self.plan_or(|| OfflineGateway::crypto_plan(experience, urgency)).await
    }

    async fn generate_backup_plan(
        &self,
        storage: BackupStorage,
        security: BackupSecurity,
    ) -> Result<ActionPlan, GatewayError> {
        self.record(MockCall::BackupPlan { storage, security });
        self.plan_or(|| OfflineGateway::backup_plan(storage, security)).await
    }

    async fn generate_ai_trust_snapshot(&self, tool: &str) -> Result<ActionPlan, GatewayError> {
        self.record(MockCall::AiTrustSnapshot {
            tool: tool.to_string(),
        });
        self.plan_or(|| OfflineGateway::ai_trust_snapshot(tool)).await
    }

    async fn generate_step_explanation(
        &self,
        step: &str,
        context: TopicContext,
    ) -> Result<String, GatewayError> {
        self.record(MockCall::StepExplanation {
            step: step.to_string(),
            context,
        });
        self.simulate_latency().await;
        match self.next_response() {
            Some(MockResponse::Text(text)) => Ok(text),
            Some(MockResponse::Error(err)) => Err(err),
            Some(other) => Err(GatewayError::generation(format!(
                "Mock queued {:?} for an explanation request",
                other
            ))),
            None => Ok(OfflineGateway::step_explanation(step, context)),
        }
    }

    fn create_chat_session(&self, context: TopicContext) -> Box<dyn ChatSession> {
        self.record(MockCall::ChatSessionCreated { context });
        Box::new(MockChatSession {
            gateway: self.clone(),
            context,
        })
    }

    fn mode(&self) -> GatewayMode {
        self.mode
    }
}

/// Chat session drawing replies from the owning gateway's queue.
#[derive(Debug, Clone)]
pub struct MockChatSession {
    gateway: MockAiGateway,
    context: TopicContext,
}

#[async_trait]
impl ChatSession for MockChatSession {
    fn context(&self) -> TopicContext {
        self.context
    }

    async fn send_message_stream(&self, text: &str) -> Result<ChunkStream, GatewayError> {
        self.gateway.record(MockCall::ChatMessage {
            context: self.context,
            text: text.to_string(),
        });
        self.gateway.simulate_latency().await;

        let items: Vec<Result<String, GatewayError>> = match self.gateway.next_response() {
            Some(MockResponse::Chunks(chunks)) => chunks.into_iter().map(Ok).collect(),
            Some(MockResponse::Text(text)) => vec![Ok(text)],
            Some(MockResponse::StreamError { chunks, error }) => chunks
                .into_iter()
                .map(Ok)
                .chain(std::iter::once(Err(error)))
                .collect(),
            Some(MockResponse::Error(err)) => return Err(err),
            Some(MockResponse::Plan(_)) => {
                return Err(GatewayError::generation("Mock queued a plan for a chat turn"))
            }
            None => vec![Ok(format!("Mock reply to: {}", text))],
        };

        let chunk_delay = self.gateway.chunk_delay;
        let stream = stream::iter(items).then(move |item| async move {
            if !chunk_delay.is_zero() {
                sleep(chunk_delay).await;
            }
            item
        });
        Ok(Box::pin(stream))
    }
}
