use futures::StreamExt;
use futures::stream::FuturesUnordered;
use tracing::{debug, info, warn};

use reaper_domain::{KillAttempt, Operation};
use reaper_ports::AdminCommandPort;

/// Issues one kill per operation concurrently and waits for all of them.
///
/// Attempts are returned in completion order. A failed kill is recorded
/// on its own attempt and never affects the others.
pub async fn kill_operations(
    admin: &dyn AdminCommandPort,
    operations: Vec<Operation>,
) -> Vec<KillAttempt> {
    debug!(count = operations.len(), "killing slow operations");
    operations
        .into_iter()
        .map(|operation| attempt_kill(admin, operation))
        .collect::<FuturesUnordered<_>>()
        .collect()
        .await
}

async fn attempt_kill(admin: &dyn AdminCommandPort, operation: Operation) -> KillAttempt {
    match admin.kill_operation(&operation.opid).await {
        Ok(()) => {
            info!(
                opid = %operation.opid,
                client = %operation.client,
                secs_running = operation.secs_running,
                "killed operation"
            );
            KillAttempt::succeeded(operation)
        }
        Err(e) => {
            let cause = format!("{e:#}");
            warn!(
                opid = %operation.opid,
                client = %operation.client,
                error = %cause,
                "failed to kill operation"
            );
            KillAttempt::failed(operation, cause)
        }
    }
}
