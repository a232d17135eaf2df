//! Slow operation watchdog: port wiring, invocation runtime and scheduling.

pub mod adapters;
pub mod ports;
pub mod runtime;

pub use runtime::{InvocationReport, Runtime};
