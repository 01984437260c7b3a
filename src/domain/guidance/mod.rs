//! Guidance module - prompt templates and the local helpers that enrich answers.
//!
//! - `prompts` - instructions sent to the inference provider
//! - `pro_tips` - keyword heuristics appended to chat replies
//! - `video` - explainer video lookup for plan steps

pub mod prompts;
mod pro_tips;
mod video;

pub use pro_tips::{format_tip_suffix, matched_categories, pro_tips, TipCategory};
pub use video::{video_url_for_step, INTRO_VIDEO_URL};
