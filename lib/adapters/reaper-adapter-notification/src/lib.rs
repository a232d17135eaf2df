//! Notification transports for kill reports.

pub mod dingtalk;
pub mod service;
pub mod signer;

pub use dingtalk::{DingTalkNotifier, RobotCredentials};
pub use service::NullNotifier;
pub use signer::sign;
