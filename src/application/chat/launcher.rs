//! ChatLauncher - explicit "open chat with prefill" signalling.
//!
//! The plan display surface holds a cloned launcher; the chat widget owns
//! the receiving end and applies each request in order.

use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::foundation::TopicContext;

/// Pending requests before `open` starts failing with `Full`.
const LAUNCH_QUEUE_CAPACITY: usize = 8;

/// Ask the widget to open, optionally switching context and filling the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenChatRequest {
    pub prefill: String,
    pub context: Option<TopicContext>,
}

impl OpenChatRequest {
    pub fn new(prefill: impl Into<String>, context: Option<TopicContext>) -> Self {
        Self {
            prefill: prefill.into(),
            context,
        }
    }

    /// Question about one plan step, asked from that plan's context.
    pub fn about_step(step: &str, context: TopicContext) -> Self {
        Self::new(
            format!("Can you help me with this step: \"{}\"?", step.trim()),
            Some(context),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LaunchError {
    #[error("Chat widget is not listening")]
    Closed,

    #[error("Too many pending chat requests")]
    Full,
}

/// Sending half handed to surfaces that can open the chat.
#[derive(Debug, Clone)]
pub struct ChatLauncher {
    tx: mpsc::Sender<OpenChatRequest>,
}

impl ChatLauncher {
    /// Creates a launcher and the receiver the widget listens on.
    pub fn channel() -> (Self, mpsc::Receiver<OpenChatRequest>) {
        let (tx, rx) = mpsc::channel(LAUNCH_QUEUE_CAPACITY);
        (Self { tx }, rx)
    }

    /// Sends a request without waiting.
    pub fn open(&self, request: OpenChatRequest) -> Result<(), LaunchError> {
        self.tx.try_send(request).map_err(|err| match err {
            mpsc::error::TrySendError::Full(_) => LaunchError::Full,
            mpsc::error::TrySendError::Closed(_) => LaunchError::Closed,
        })
    }

    /// Opens the chat prefilled with a question about `step`.
    pub fn ask_about_step(&self, step: &str, context: TopicContext) -> Result<(), LaunchError> {
        self.open(OpenChatRequest::about_step(step, context))
    }
}
