//! Domain models and invariants.

pub mod config;
pub mod kill;
pub mod notification;
pub mod operation;

pub use config::{
    MongoConfig, NotificationsConfig, ReaperConfig, ScanConfig, ScheduleConfig,
    DEFAULT_DINGTALK_ENDPOINT, DEFAULT_MAX_RUNNING_SECS, DEFAULT_MONGODB_URI,
};
pub use kill::{BatchResult, FailedKill, KillAttempt, KillOutcome};
pub use notification::NotificationMessage;
pub use operation::{OpId, OpKind, Operation};
