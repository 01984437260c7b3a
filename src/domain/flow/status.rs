//! Lifecycle states of the plan flows and the step explainer.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Status of a questionnaire flow.
///
/// `Collecting → Generating → Displaying → Collecting` on reset, and
/// `Generating → Collecting` when generation fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowStatus {
    #[default]
    Collecting,
    Generating,
    Displaying,
}

impl FlowStatus {
    /// Input is accepted only while collecting.
    pub fn accepts_input(&self) -> bool {
        matches!(self, FlowStatus::Collecting)
    }
}

impl StateMachine for FlowStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use FlowStatus::*;
        matches!(
            (self, target),
            (Collecting, Generating)
                | (Generating, Displaying)
                | (Generating, Collecting)
                | (Displaying, Collecting)
        )
    }
}

/// Status of the step explainer panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplainerStatus {
    #[default]
    Closed,
    Loading,
    Loaded,
    Failed,
}

impl StateMachine for ExplainerStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ExplainerStatus::*;
        match (self, target) {
            (_, Closed) => true,
            (_, Loading) => true,
            (Loading, Loaded) | (Loading, Failed) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flow_starts_collecting() {
        assert_eq!(FlowStatus::default(), FlowStatus::Collecting);
        assert!(FlowStatus::Collecting.accepts_input());
        assert!(!FlowStatus::Generating.accepts_input());
    }

    #[test]
    fn flow_happy_path_is_valid() {
        let status = FlowStatus::Collecting
            .transition_to(FlowStatus::Generating)
            .and_then(|s| s.transition_to(FlowStatus::Displaying))
            .and_then(|s| s.transition_to(FlowStatus::Collecting));
        assert_eq!(status, Ok(FlowStatus::Collecting));
    }

    #[test]
    fn flow_failure_returns_to_collecting() {
        assert!(FlowStatus::Generating.can_transition_to(&FlowStatus::Collecting));
    }

    #[test]
    fn flow_cannot_skip_generation() {
        assert!(FlowStatus::Collecting.transition_to(FlowStatus::Displaying).is_err());
        assert!(FlowStatus::Displaying.transition_to(FlowStatus::Generating).is_err());
    }

    #[test]
    fn every_flow_state_can_leave() {
        use FlowStatus::*;
        for status in [Collecting, Generating, Displaying] {
            assert!([Collecting, Generating, Displaying]
                .iter()
                .any(|target| status.can_transition_to(target)));
        }
    }

    #[test]
    fn explainer_only_settles_from_loading() {
        assert!(ExplainerStatus::Loading.can_transition_to(&ExplainerStatus::Loaded));
        assert!(!ExplainerStatus::Closed.can_transition_to(&ExplainerStatus::Loaded));
        assert!(!ExplainerStatus::Failed.can_transition_to(&ExplainerStatus::Loaded));
    }

    #[test]
    fn explainer_can_always_close_or_reload() {
        use ExplainerStatus::*;
        for status in [Closed, Loading, Loaded, Failed] {
            assert!(status.can_transition_to(&Closed));
            assert!(status.can_transition_to(&Loading));
        }
    }
}
