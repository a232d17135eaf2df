pub mod runtime;
pub mod scheduler;

pub use runtime::{InvocationReport, Runtime, RuntimeTotals};
pub use scheduler::{run_scheduler_loop, shutdown_signal};

#[cfg(test)]
mod testing;
