//! StepExplainer - drill-down panel for a single plan step.
//!
//! Opening a step resolves its video link immediately and fetches a
//! beginner-level explanation. A failure is shown inline in the panel.
//! Reopening with another step, closing, or detaching makes any pending
//! explanation stale; stale results are dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::application::guard::{lock, Attachment};
use crate::domain::flow::ExplainerStatus;
use crate::domain::foundation::{StateMachine, TopicContext};
use crate::domain::guidance::video_url_for_step;
use crate::ports::AiGateway;

/// Inline message shown when an explanation cannot be loaded.
pub const EXPLAINER_ERROR: &str = "We couldn't load this explainer. Please try again.";

/// Footer shown under every explanation.
pub const EXPLAINER_DISCLAIMER: &str =
    "This is general education only. Always keep your keys and passwords private.";

/// What the panel currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExplainerView {
    pub status: ExplainerStatus,
    pub step: Option<String>,
    pub context: TopicContext,
    pub video_url: Option<&'static str>,
    pub explanation: Option<String>,
    pub error: Option<&'static str>,
}

pub struct StepExplainer {
    gateway: Arc<dyn AiGateway>,
    view: Mutex<ExplainerView>,
    request: AtomicU64,
    attachment: Attachment,
}

impl StepExplainer {
    pub fn new(gateway: Arc<dyn AiGateway>) -> Self {
        Self {
            gateway,
            view: Mutex::new(ExplainerView::default()),
            request: AtomicU64::new(0),
            attachment: Attachment::default(),
        }
    }

    pub fn view(&self) -> ExplainerView {
        lock(&self.view).clone()
    }

    pub fn status(&self) -> ExplainerStatus {
        lock(&self.view).status
    }

    /// Opens the panel for `step` and loads its explanation.
    ///
    /// Returns the status once this request settles, or the current status
    /// if the request went stale meanwhile.
    pub async fn open(&self, step: &str, context: TopicContext) -> ExplainerStatus {
        let request = self.request.fetch_add(1, Ordering::AcqRel) + 1;
        {
            let mut view = lock(&self.view);
            *view = ExplainerView {
                status: ExplainerStatus::Loading,
                step: Some(step.to_string()),
                context,
                video_url: video_url_for_step(step, context),
                explanation: None,
                error: None,
            };
        }

        let result = self.gateway.generate_step_explanation(step, context).await;

        let mut view = lock(&self.view);
        if !self.attachment.is_attached() || self.request.load(Ordering::Acquire) != request {
            tracing::debug!(%context, "Dropping stale step explanation");
            return view.status;
        }

        match result {
            Ok(text) => {
                view.status = transition(view.status, ExplainerStatus::Loaded);
                view.explanation = Some(text.trim().to_string());
            }
            Err(err) => {
                tracing::error!(%context, kind = err.kind(), error = %err, "Step explanation failed");
                view.status = transition(view.status, ExplainerStatus::Failed);
                view.error = Some(EXPLAINER_ERROR);
            }
        }
        view.status
    }

    /// Closes the panel; a pending explanation is discarded.
    pub fn close(&self) {
        self.request.fetch_add(1, Ordering::AcqRel);
        *lock(&self.view) = ExplainerView::default();
    }

    /// Marks the panel as torn down.
    pub fn detach(&self) {
        self.attachment.detach();
    }
}

fn transition(from: ExplainerStatus, to: ExplainerStatus) -> ExplainerStatus {
    from.transition_to(to).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "Unexpected explainer transition");
        to
    })
}
