use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use reaper_adapter_notification::NullNotifier;
use reaper_domain::{OpId, Operation};

pub use reaper_ports::{AdminCommandPort, NotificationPort};

#[derive(Clone)]
pub struct PortSet {
    pub admin: Arc<dyn AdminCommandPort>,
    pub notifier: Arc<dyn NotificationPort>,
}

impl PortSet {
    /// Ports that see no operations and drop every report.
    pub fn empty() -> Self {
        Self {
            admin: Arc::new(NullAdminPort),
            notifier: Arc::new(NullNotifier),
        }
    }
}

#[derive(Clone, Default)]
struct NullAdminPort;

#[async_trait]
impl AdminCommandPort for NullAdminPort {
    async fn list_active_operations(&self) -> Result<Vec<Operation>> {
        Ok(Vec::new())
    }

    async fn kill_operation(&self, opid: &OpId) -> Result<()> {
        anyhow::bail!("no database attached, cannot kill {opid}")
    }
}
