//! Flow module - lifecycle states driven by the application controllers.

mod status;

pub use status::{ExplainerStatus, FlowStatus};
