use tracing::{error, info};

use reaper_application::{InvocationError, InvocationOutcome, Reaper, ReaperSettings};

use crate::ports::PortSet;

/// What one invocation did, in counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InvocationReport {
    pub killed: usize,
    pub failed: usize,
    pub notified: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeTotals {
    pub invocations: u64,
    pub failed_invocations: u64,
    pub killed: u64,
    pub kill_failures: u64,
}

/// Process-level wrapper around the reaper. Each `invoke` is one
/// independent cycle; only counters carry over between them.
pub struct Runtime {
    reaper: Reaper,
    totals: RuntimeTotals,
    last_error: Option<String>,
}

impl Runtime {
    pub fn new(ports: PortSet, settings: ReaperSettings) -> Self {
        Self {
            reaper: Reaper::new(ports.admin, ports.notifier, settings),
            totals: RuntimeTotals::default(),
            last_error: None,
        }
    }

    pub fn totals(&self) -> RuntimeTotals {
        self.totals
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub async fn invoke(&mut self) -> Result<InvocationReport, InvocationError> {
        self.totals.invocations = self.totals.invocations.saturating_add(1);
        match self.reaper.run_once().await {
            Ok(outcome) => {
                let report = match outcome {
                    InvocationOutcome::Idle => InvocationReport::default(),
                    InvocationOutcome::Completed { batch, notified } => InvocationReport {
                        killed: batch.succeeded.len(),
                        failed: batch.failed.len(),
                        notified,
                    },
                };
                self.record_kills(report.killed, report.failed);
                self.last_error = None;
                if report.killed + report.failed > 0 {
                    info!(
                        killed = report.killed,
                        failed = report.failed,
                        notified = report.notified,
                        "invocation finished"
                    );
                }
                Ok(report)
            }
            Err(e) => {
                if let InvocationError::Notify { killed, failed, .. } = &e {
                    self.record_kills(*killed, *failed);
                }
                self.totals.failed_invocations = self.totals.failed_invocations.saturating_add(1);
                error!(error = %e, after_kills = e.after_kills(), "invocation failed");
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn record_kills(&mut self, killed: usize, failed: usize) {
        self.totals.killed = self.totals.killed.saturating_add(killed as u64);
        self.totals.kill_failures = self.totals.kill_failures.saturating_add(failed as u64);
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new(
            PortSet::empty(),
            ReaperSettings {
                threshold_secs: reaper_domain::DEFAULT_MAX_RUNNING_SECS,
                notifications_enabled: false,
            },
        )
    }
}
