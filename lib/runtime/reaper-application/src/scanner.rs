use anyhow::{Context, Result};
use tracing::debug;

use reaper_domain::Operation;
use reaper_ports::AdminCommandPort;

/// Lists active operations and keeps the ones past `threshold_secs`.
pub async fn scan_slow_operations(
    admin: &dyn AdminCommandPort,
    threshold_secs: u64,
) -> Result<Vec<Operation>> {
    let operations = admin
        .list_active_operations()
        .await
        .context("failed to list active operations")?;
    let total = operations.len();
    let slow: Vec<Operation> = operations
        .into_iter()
        .filter(|op| op.is_eligible(threshold_secs))
        .collect();
    debug!(total, slow = slow.len(), threshold_secs, "scanned active operations");
    Ok(slow)
}
