//! Scan, kill, report and notify: one watchdog invocation.

pub mod error;
pub mod executor;
pub mod reaper;
pub mod report;
pub mod scanner;

pub use error::InvocationError;
pub use executor::kill_operations;
pub use reaper::{InvocationOutcome, Reaper, ReaperSettings};
pub use report::compose_report;
pub use scanner::scan_slow_operations;

#[cfg(test)]
mod testing;
