use std::future::Future;
use std::time::Duration;

use tokio::time::{MissedTickBehavior, interval};
use tracing::{info, warn};

use super::Runtime;

/// Fires one invocation per tick until `shutdown` resolves. The first
/// invocation runs immediately. A failed invocation is already logged by
/// the runtime and does not stop the loop.
pub async fn run_scheduler_loop<F>(runtime: &mut Runtime, period: Duration, shutdown: F)
where
    F: Future<Output = ()>,
{
    let mut timer = interval(period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    info!(interval_secs = period.as_secs(), "entering scheduler loop");
    loop {
        tokio::select! {
            _ = timer.tick() => {
                // Errors were logged inside the runtime.
                let _ = runtime.invoke().await;
            }
            () = &mut shutdown => {
                info!("shutdown requested, leaving scheduler loop");
                break;
            }
        }
    }
}

pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
