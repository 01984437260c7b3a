//! Chat - the assistant widget and the channel that opens it.

mod launcher;
mod widget;

pub use launcher::{ChatLauncher, LaunchError, OpenChatRequest};
pub use widget::{ChatSnapshot, ChatWidget, SendOutcome, SendRejection, CHAT_ERROR_REPLY};
