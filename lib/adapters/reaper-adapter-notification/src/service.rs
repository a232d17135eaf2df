use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use reaper_domain::NotificationMessage;
use reaper_ports::NotificationPort;

/// Accepts every report and drops it. Wired in when notifications are
/// switched off.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

#[async_trait]
impl NotificationPort for NullNotifier {
    async fn send_notification(&self, message: &NotificationMessage) -> Result<()> {
        debug!(title = %message.title, "dropping report");
        Ok(())
    }
}
