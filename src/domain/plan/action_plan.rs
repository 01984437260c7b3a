//! ActionPlan - the Plan Schema returned by every plan-generation operation.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Number of steps the prompts ask for. Convention only; not enforced.
pub const EXPECTED_STEP_COUNT: usize = 3;

/// A generated security action plan.
///
/// Immutable once built: every field is checked on construction and only
/// exposed through accessors. Deserialization goes through the same checks,
/// so a model reply that parses as JSON but has an empty field is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ActionPlanData")]
pub struct ActionPlan {
    title: String,
    timeframe: String,
    steps: Vec<String>,
    notes: String,
}

/// Unchecked wire shape of an [`ActionPlan`].
#[derive(Debug, Clone, Deserialize)]
struct ActionPlanData {
    title: String,
    timeframe: String,
    steps: Vec<String>,
    notes: String,
}

impl TryFrom<ActionPlanData> for ActionPlan {
    type Error = ValidationError;

    fn try_from(data: ActionPlanData) -> Result<Self, Self::Error> {
        ActionPlan::new(data.title, data.timeframe, data.steps, data.notes)
    }
}

impl ActionPlan {
    /// Builds a plan, rejecting blank fields and an empty step list.
    pub fn new(
        title: impl Into<String>,
        timeframe: impl Into<String>,
        steps: Vec<String>,
        notes: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let plan = Self {
            title: title.into(),
            timeframe: timeframe.into(),
            steps,
            notes: notes.into(),
        };
        plan.validate()?;
        Ok(plan)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        require_text("timeframe", &self.timeframe)?;
        require_text("notes", &self.notes)?;

        if self.steps.is_empty() {
            return Err(ValidationError::empty_field("steps"));
        }
        for (index, step) in self.steps.iter().enumerate() {
            require_text(format!("steps[{}]", index), step)?;
        }
        Ok(())
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn timeframe(&self) -> &str {
        &self.timeframe
    }

    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// True when the plan carries the conventional three steps.
    pub fn has_expected_step_count(&self) -> bool {
        self.steps.len() == EXPECTED_STEP_COUNT
    }
}

fn require_text(field: impl Into<String>, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::empty_field(field))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps() -> Vec<String> {
        vec![
            "Write down your recovery phrase on paper".to_string(),
            "Store it somewhere fireproof".to_string(),
            "Send a small test amount first".to_string(),
        ]
    }

    #[test]
    fn new_accepts_complete_plan() {
        let plan = ActionPlan::new("Starter Plan", "Today", steps(), "Never share keys.").unwrap();
        assert_eq!(plan.title(), "Starter Plan");
        assert_eq!(plan.timeframe(), "Today");
        assert_eq!(plan.steps().len(), 3);
        assert!(plan.has_expected_step_count());
        assert_eq!(plan.notes(), "Never share keys.");
    }

    #[test]
    fn new_rejects_blank_title() {
        let err = ActionPlan::new("  ", "Today", steps(), "notes").unwrap_err();
        assert_eq!(err, ValidationError::empty_field("title"));
    }

    #[test]
    fn new_rejects_empty_step_list() {
        let err = ActionPlan::new("Plan", "Today", vec![], "notes").unwrap_err();
        assert_eq!(err, ValidationError::empty_field("steps"));
    }

    #[test]
    fn new_rejects_blank_step() {
        let err = ActionPlan::new("Plan", "Today", vec!["ok".into(), "".into()], "notes")
            .unwrap_err();
        assert_eq!(err.field(), Some("steps[1]"));
    }

    #[test]
    fn two_steps_are_allowed_but_unconventional() {
        let plan = ActionPlan::new("Plan", "Today", vec!["a".into(), "b".into()], "n").unwrap();
        assert!(!plan.has_expected_step_count());
    }

    #[test]
    fn deserializes_valid_json() {
        let json = r#"{"title":"T","timeframe":"This weekend","steps":["a","b","c"],"notes":"N"}"#;
        let plan: ActionPlan = serde_json::from_str(json).unwrap();
        assert_eq!(plan.timeframe(), "This weekend");
        assert_eq!(plan.steps(), &["a", "b", "c"]);
    }

    #[test]
    fn deserialization_rejects_missing_field() {
        let json = r#"{"title":"T","steps":["a"],"notes":"N"}"#;
        assert!(serde_json::from_str::<ActionPlan>(json).is_err());
    }

    #[test]
    fn deserialization_rejects_blank_notes() {
        let json = r#"{"title":"T","timeframe":"now","steps":["a"],"notes":""}"#;
        let err = serde_json::from_str::<ActionPlan>(json).unwrap_err();
        assert!(err.to_string().contains("notes"));
    }

    #[test]
    fn serializes_plain_fields() {
        let plan = ActionPlan::new("T", "now", vec!["a".into()], "N").unwrap();
        let value = serde_json::to_value(&plan).unwrap();
        assert_eq!(value["title"], "T");
        assert_eq!(value["steps"][0], "a");
    }
}
