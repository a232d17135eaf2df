//! Port traits the watchdog core is written against.

use anyhow::Result;
use async_trait::async_trait;

use reaper_domain::{NotificationMessage, OpId, Operation};

/// Administrative command surface of the database.
///
/// Implementations must accept concurrent `kill_operation` calls on a
/// shared reference.
#[async_trait]
pub trait AdminCommandPort: Send + Sync {
    async fn list_active_operations(&self) -> Result<Vec<Operation>>;

    async fn kill_operation(&self, opid: &OpId) -> Result<()>;
}

/// Outbound delivery of a composed report.
#[async_trait]
pub trait NotificationPort: Send + Sync {
    async fn send_notification(&self, message: &NotificationMessage) -> Result<()>;
}
