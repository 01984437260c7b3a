//! Plan module - the Plan Schema and the questionnaire answers that shape it.

mod action_plan;
mod export;
mod questionnaire;

pub use action_plan::{ActionPlan, EXPECTED_STEP_COUNT};
pub use export::EXPORT_FILE_NAME;
pub use questionnaire::{
    BackupSecurity, BackupStorage, CryptoExperience, CryptoUrgency, AI_TOOL_PRESETS,
};
