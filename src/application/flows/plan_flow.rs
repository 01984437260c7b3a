//! PlanFlow - the questionnaire → generate → display controller.
//!
//! One instance per flow view. The status follows [`FlowStatus`]:
//!
//! ```text
//! Collecting ──submit──▶ Generating ──ok──▶ Displaying
//!     ▲                      │                  │
//!     └──────── failure ─────┘                  │
//!     └──────────────────── reset ──────────────┘
//! ```
//!
//! A submit while another is in flight is ignored rather than queued.
//! After `detach()` a settling request no longer touches the state.

use std::sync::{Arc, Mutex};

use super::questionnaire::Questionnaire;
use crate::application::guard::{lock, Attachment, BusyFlag};
use crate::domain::flow::FlowStatus;
use crate::domain::foundation::{StateMachine, TopicContext};
use crate::domain::plan::ActionPlan;
use crate::ports::AiGateway;

/// What a call to [`PlanFlow::submit`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A plan is now displayed.
    Displayed,
    /// Generation failed; the flow is collecting again with an alert set.
    Failed,
    /// Required selections are missing; nothing was sent.
    Incomplete,
    /// Another submit is in flight or a plan is already displayed.
    Ignored,
    /// The flow was detached before the request settled.
    Detached,
}

#[derive(Debug, Default)]
struct FlowState<Q> {
    status: FlowStatus,
    questionnaire: Q,
    plan: Option<ActionPlan>,
    alert: Option<&'static str>,
}

/// Controller for one plan flow.
pub struct PlanFlow<Q: Questionnaire> {
    gateway: Arc<dyn AiGateway>,
    state: Mutex<FlowState<Q>>,
    busy: BusyFlag,
    attachment: Attachment,
}

impl<Q: Questionnaire> PlanFlow<Q> {
    pub fn new(gateway: Arc<dyn AiGateway>) -> Self {
        Self {
            gateway,
            state: Mutex::new(FlowState::default()),
            busy: BusyFlag::default(),
            attachment: Attachment::default(),
        }
    }

    /// Topic of this flow, used for explanations and chat prefill.
    pub fn context(&self) -> TopicContext {
        Q::CONTEXT
    }

    pub fn status(&self) -> FlowStatus {
        lock(&self.state).status
    }

    /// The displayed plan, if any.
    pub fn plan(&self) -> Option<ActionPlan> {
        lock(&self.state).plan.clone()
    }

    /// Pending failure alert.
    pub fn alert(&self) -> Option<&'static str> {
        lock(&self.state).alert
    }

    /// Returns and clears the pending alert.
    pub fn take_alert(&self) -> Option<&'static str> {
        lock(&self.state).alert.take()
    }

    /// Copy of the current selections.
    pub fn questionnaire(&self) -> Q
    where
        Q: Clone,
    {
        lock(&self.state).questionnaire.clone()
    }

    /// Applies a selection change. Refused outside `Collecting`.
    pub fn edit(&self, change: impl FnOnce(&mut Q)) -> bool {
        let mut state = lock(&self.state);
        if !state.status.accepts_input() || self.busy.is_set() {
            tracing::warn!(context = %Q::CONTEXT, status = ?state.status, "Selection change refused");
            return false;
        }
        change(&mut state.questionnaire);
        true
    }

    /// Whether the submit control should be enabled.
    pub fn can_submit(&self) -> bool {
        let state = lock(&self.state);
        state.status.accepts_input() && state.questionnaire.is_complete() && !self.busy.is_set()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_set()
    }

    /// Generates a plan from the current selections.
    pub async fn submit(&self) -> SubmitOutcome {
        let Some(_busy) = self.busy.try_acquire() else {
            tracing::debug!(context = %Q::CONTEXT, "Submit ignored, generation already in flight");
            return SubmitOutcome::Ignored;
        };

        let answers = {
            let mut state = lock(&self.state);
            if !state.status.accepts_input() {
                return SubmitOutcome::Ignored;
            }
            let Some(answers) = state.questionnaire.answers() else {
                tracing::warn!(context = %Q::CONTEXT, "Submit with incomplete selections");
                return SubmitOutcome::Incomplete;
            };
            match state.status.transition_to(FlowStatus::Generating) {
                Ok(next) => state.status = next,
                Err(err) => {
                    tracing::warn!(error = %err, "Flow refused to start generating");
                    return SubmitOutcome::Ignored;
                }
            }
            state.alert = None;
            answers
        };

        tracing::debug!(context = %Q::CONTEXT, ?answers, "Generating plan");
        let result = Q::generate(self.gateway.as_ref(), &answers).await;

        if !self.attachment.is_attached() {
            tracing::debug!(context = %Q::CONTEXT, "Flow detached, dropping generation result");
            return SubmitOutcome::Detached;
        }

        let mut state = lock(&self.state);
        match result {
            Ok(plan) => {
                state.status = FlowStatus::Displaying;
                state.plan = Some(plan);
                SubmitOutcome::Displayed
            }
            Err(err) => {
                tracing::error!(
                    context = %Q::CONTEXT,
                    kind = err.kind(),
                    error = %err,
                    "Plan generation failed"
                );
                state.status = FlowStatus::Collecting;
                state.alert = Some(Q::FAILURE_ALERT);
                SubmitOutcome::Failed
            }
        }
    }

    /// Drops the displayed plan and returns to the questionnaire.
    ///
    /// Selections are kept. Returns `false` when no plan was displayed.
    pub fn reset(&self) -> bool {
        let mut state = lock(&self.state);
        match state.status.transition_to(FlowStatus::Collecting) {
            Ok(next) if state.status == FlowStatus::Displaying => {
                state.status = next;
                state.plan = None;
                true
            }
            _ => false,
        }
    }

    /// Marks the view as torn down.
    pub fn detach(&self) {
        self.attachment.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAiGateway, MockCall};
    use crate::application::flows::{AiTrustQuestionnaire, BackupQuestionnaire, CryptoQuestionnaire};
    use crate::domain::plan::{BackupSecurity, BackupStorage, CryptoExperience, CryptoUrgency};
    use crate::ports::GatewayError;
    use std::time::Duration;

    fn crypto_flow(gateway: &MockAiGateway) -> PlanFlow<CryptoQuestionnaire> {
        let flow: PlanFlow<CryptoQuestionnaire> = PlanFlow::new(Arc::new(gateway.clone()));
        flow.edit(|q| {
            q.select_experience(CryptoExperience::Never);
            q.select_urgency(CryptoUrgency::High);
        });
        flow
    }

    #[tokio::test]
    async fn successful_submit_displays_plan() {
        let gateway = MockAiGateway::new();
        let flow = crypto_flow(&gateway);
        assert!(flow.can_submit());

        assert_eq!(flow.submit().await, SubmitOutcome::Displayed);
        assert_eq!(flow.status(), FlowStatus::Displaying);
        assert_eq!(flow.plan().unwrap().steps().len(), 3);
        assert_eq!(
            gateway.calls(),
            vec![MockCall::CryptoPlan {
                experience: CryptoExperience::Never,
                urgency: CryptoUrgency::High
            }]
        );
    }

    #[tokio::test]
    async fn incomplete_selection_sends_nothing() {
        let gateway = MockAiGateway::new();
        let flow: PlanFlow<BackupQuestionnaire> = PlanFlow::new(Arc::new(gateway.clone()));
        flow.edit(|q| q.select_storage(BackupStorage::Browser));

        assert!(!flow.can_submit());
        assert_eq!(flow.submit().await, SubmitOutcome::Incomplete);
        assert_eq!(flow.status(), FlowStatus::Collecting);
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn blank_tool_is_incomplete() {
        let gateway = MockAiGateway::new();
        let flow: PlanFlow<AiTrustQuestionnaire> = PlanFlow::new(Arc::new(gateway.clone()));
        flow.edit(|q| q.set_tool("  "));

        assert_eq!(flow.submit().await, SubmitOutcome::Incomplete);
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn failure_returns_to_collecting_with_flow_alert() {
        let gateway = MockAiGateway::new().with_error(GatewayError::transport("connection reset"));
        let flow = crypto_flow(&gateway);

        assert_eq!(flow.submit().await, SubmitOutcome::Failed);
        assert_eq!(flow.status(), FlowStatus::Collecting);
        assert!(flow.plan().is_none());
        assert_eq!(flow.take_alert(), Some(CryptoQuestionnaire::FAILURE_ALERT));
        assert_eq!(flow.alert(), None);

        // selections survive, so the user can simply retry
        assert_eq!(flow.submit().await, SubmitOutcome::Displayed);
    }

    #[tokio::test]
    async fn alert_never_contains_provider_text() {
        let gateway = MockAiGateway::new().with_error(GatewayError::generation("RAW PROVIDER BODY"));
        let flow: PlanFlow<AiTrustQuestionnaire> = PlanFlow::new(Arc::new(gateway.clone()));
        flow.edit(|q| q.set_tool("Claude"));

        flow.submit().await;
        let alert = flow.alert().unwrap();
        assert!(!alert.contains("RAW PROVIDER BODY"));
        assert_eq!(alert, "Could not generate snapshot. Please try again.");
    }

    #[tokio::test]
    async fn concurrent_submit_is_ignored() {
        let gateway = MockAiGateway::new().with_delay(Duration::from_millis(50));
        let flow = crypto_flow(&gateway);

        let (first, second) = tokio::join!(flow.submit(), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            assert!(flow.is_busy());
            assert!(!flow.can_submit());
            flow.submit().await
        });

        assert_eq!(first, SubmitOutcome::Displayed);
        assert_eq!(second, SubmitOutcome::Ignored);
        assert_eq!(gateway.call_count(), 1);
        assert!(!flow.is_busy());
    }

    #[tokio::test]
    async fn selections_are_locked_while_generating() {
        let gateway = MockAiGateway::new().with_delay(Duration::from_millis(50));
        let flow = crypto_flow(&gateway);

        let (_, edited) = tokio::join!(flow.submit(), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            flow.edit(|q| q.select_urgency(CryptoUrgency::Low))
        });

        assert!(!edited);
        assert_eq!(flow.questionnaire().urgency, Some(CryptoUrgency::High));
    }

    #[tokio::test]
    async fn submit_while_displaying_is_ignored() {
        let gateway = MockAiGateway::new();
        let flow = crypto_flow(&gateway);
        flow.submit().await;

        assert_eq!(flow.submit().await, SubmitOutcome::Ignored);
        assert_eq!(gateway.call_count(), 1);
    }

    #[tokio::test]
    async fn reset_keeps_selections() {
        let gateway = MockAiGateway::new();
        let flow: PlanFlow<BackupQuestionnaire> = PlanFlow::new(Arc::new(gateway));
        flow.edit(|q| {
            q.select_storage(BackupStorage::Notes);
            q.select_security(BackupSecurity::Balanced);
        });

        assert!(!flow.reset());
        flow.submit().await;
        assert!(flow.reset());
        assert_eq!(flow.status(), FlowStatus::Collecting);
        assert!(flow.plan().is_none());
        assert!(flow.can_submit());
    }

    #[tokio::test]
    async fn detached_flow_drops_late_result() {
        let gateway = MockAiGateway::new().with_delay(Duration::from_millis(30));
        let flow = crypto_flow(&gateway);

        let (outcome, _) = tokio::join!(flow.submit(), async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            flow.detach();
        });

        assert_eq!(outcome, SubmitOutcome::Detached);
        assert!(flow.plan().is_none());
        assert_eq!(flow.status(), FlowStatus::Generating);
    }

    #[test]
    fn flow_reports_its_context() {
        let flow: PlanFlow<AiTrustQuestionnaire> = PlanFlow::new(Arc::new(MockAiGateway::new()));
        assert_eq!(flow.context(), TopicContext::AiTrust);
    }
}
