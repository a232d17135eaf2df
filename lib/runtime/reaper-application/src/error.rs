/// Failure surfaced to whoever triggered the invocation.
///
/// Per-operation kill failures never appear here; they are part of a
/// successful invocation's batch.
#[derive(thiserror::Error, Debug)]
pub enum InvocationError {
    #[error("failed to scan active operations: {0:#}")]
    Scan(anyhow::Error),
    #[error("failed to deliver report after {killed} kills ({failed} failed): {cause:#}")]
    Notify {
        killed: usize,
        failed: usize,
        cause: anyhow::Error,
    },
}

impl InvocationError {
    /// Whether the database side effects already happened.
    pub fn after_kills(&self) -> bool {
        matches!(self, InvocationError::Notify { .. })
    }
}
