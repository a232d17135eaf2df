use std::sync::Arc;

use tracing::{debug, info};

use reaper_domain::{BatchResult, ReaperConfig};
use reaper_ports::{AdminCommandPort, NotificationPort};

use crate::error::InvocationError;
use crate::executor::kill_operations;
use crate::report::compose_report;
use crate::scanner::scan_slow_operations;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaperSettings {
    pub threshold_secs: u64,
    pub notifications_enabled: bool,
}

impl From<&ReaperConfig> for ReaperSettings {
    fn from(config: &ReaperConfig) -> Self {
        Self {
            threshold_secs: config.scan.max_running_secs,
            notifications_enabled: config.notifications.enabled,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InvocationOutcome {
    /// Nothing was over the threshold.
    Idle,
    Completed { batch: BatchResult, notified: bool },
}

/// One scan-kill-report cycle per call. Holds no state between calls
/// beyond the ports it was built with.
#[derive(Clone)]
pub struct Reaper {
    admin: Arc<dyn AdminCommandPort>,
    notifier: Arc<dyn NotificationPort>,
    settings: ReaperSettings,
}

impl Reaper {
    pub fn new(
        admin: Arc<dyn AdminCommandPort>,
        notifier: Arc<dyn NotificationPort>,
        settings: ReaperSettings,
    ) -> Self {
        Self {
            admin,
            notifier,
            settings,
        }
    }

    pub async fn run_once(&self) -> Result<InvocationOutcome, InvocationError> {
        let slow = scan_slow_operations(self.admin.as_ref(), self.settings.threshold_secs)
            .await
            .map_err(InvocationError::Scan)?;
        if slow.is_empty() {
            debug!("no slow operations");
            return Ok(InvocationOutcome::Idle);
        }
        info!(count = slow.len(), "found slow operations");

        let attempts = kill_operations(self.admin.as_ref(), slow).await;
        let batch = BatchResult::classify(&attempts);
        info!(
            succeeded = batch.succeeded.len(),
            failed = batch.failed.len(),
            "kill batch finished"
        );

        if !self.settings.notifications_enabled {
            debug!("notifications disabled, skipping report");
            return Ok(InvocationOutcome::Completed {
                batch,
                notified: false,
            });
        }

        let message = compose_report(&batch);
        self.notifier
            .send_notification(&message)
            .await
            .map_err(|cause| InvocationError::Notify {
                killed: batch.succeeded.len(),
                failed: batch.failed.len(),
                cause,
            })?;
        info!("report delivered");

        Ok(InvocationOutcome::Completed {
            batch,
            notified: true,
        })
    }
}
