use serde::{Deserialize, Serialize};

use crate::operation::{OpId, Operation};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum KillOutcome {
    Succeeded,
    Failed { cause: String },
}

/// Result of one termination request. Built by the attempt that issued
/// it and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KillAttempt {
    pub operation: Operation,
    pub outcome: KillOutcome,
}

impl KillAttempt {
    pub fn succeeded(operation: Operation) -> Self {
        Self {
            operation,
            outcome: KillOutcome::Succeeded,
        }
    }

    pub fn failed(operation: Operation, cause: impl Into<String>) -> Self {
        Self {
            operation,
            outcome: KillOutcome::Failed {
                cause: cause.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, KillOutcome::Succeeded)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedKill {
    pub operation: Operation,
    pub cause: String,
}

/// Kill attempts of one invocation, split by outcome. Both sides keep
/// the order in which attempts completed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub succeeded: Vec<Operation>,
    pub failed: Vec<FailedKill>,
}

impl BatchResult {
    pub fn classify(attempts: &[KillAttempt]) -> Self {
        let mut batch = Self::default();
        for attempt in attempts {
            match &attempt.outcome {
                KillOutcome::Succeeded => batch.succeeded.push(attempt.operation.clone()),
                KillOutcome::Failed { cause } => batch.failed.push(FailedKill {
                    operation: attempt.operation.clone(),
                    cause: cause.clone(),
                }),
            }
        }
        batch
    }

    pub fn is_empty(&self) -> bool {
        self.succeeded.is_empty() && self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn succeeded_ids(&self) -> Vec<&OpId> {
        self.succeeded.iter().map(|op| &op.opid).collect()
    }

    pub fn failed_ids(&self) -> Vec<&OpId> {
        self.failed.iter().map(|kill| &kill.operation.opid).collect()
    }
}
