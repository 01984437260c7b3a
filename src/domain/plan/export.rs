//! Plain-text export of an [`ActionPlan`].
//!
//! Layout:
//!
//! ```text
//! <title>
//!
//! <timeframe>
//!
//! Steps:
//! 1. <step>
//! 2. <step>
//!
//! Notes:
//! <notes>
//! ```
//!
//! Reading it back is exact as long as title and timeframe contain no blank
//! line and steps are single-line, which is what the generators produce.

use super::ActionPlan;
use crate::domain::foundation::ValidationError;

/// File name used when the plan is downloaded.
pub const EXPORT_FILE_NAME: &str = "my-security-plan.txt";

const STEPS_HEADER: &str = "Steps:\n";
const NOTES_SEPARATOR: &str = "\n\nNotes:\n";

impl ActionPlan {
    /// Renders the plan as copy/download text.
    pub fn to_export_text(&self) -> String {
        let steps = self
            .steps()
            .iter()
            .enumerate()
            .map(|(i, step)| format!("{}. {}", i + 1, step))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "{}\n\n{}\n\n{}{}{}{}",
            self.title(),
            self.timeframe(),
            STEPS_HEADER,
            steps,
            NOTES_SEPARATOR,
            self.notes()
        )
    }

    /// Reads back text produced by [`ActionPlan::to_export_text`].
    pub fn parse_export(text: &str) -> Result<ActionPlan, ValidationError> {
        let (title, rest) = text
            .split_once("\n\n")
            .ok_or_else(|| ValidationError::invalid_format("title", "missing blank line after title"))?;
        let (timeframe, rest) = rest.split_once("\n\n").ok_or_else(|| {
            ValidationError::invalid_format("timeframe", "missing blank line after timeframe")
        })?;
        let rest = rest
            .strip_prefix(STEPS_HEADER)
            .ok_or_else(|| ValidationError::invalid_format("steps", "missing 'Steps:' header"))?;
        let (steps_block, notes) = rest
            .split_once(NOTES_SEPARATOR)
            .ok_or_else(|| ValidationError::invalid_format("notes", "missing 'Notes:' header"))?;

        let steps = steps_block
            .lines()
            .enumerate()
            .map(|(i, line)| {
                let prefix = format!("{}. ", i + 1);
                line.strip_prefix(prefix.as_str())
                    .map(str::to_string)
                    .ok_or_else(|| {
                        ValidationError::invalid_format(
                            "steps",
                            format!("line {} is not numbered '{}'", i + 1, prefix.trim_end()),
                        )
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        ActionPlan::new(title, timeframe, steps, notes)
    }
}
