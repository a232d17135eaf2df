use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use async_trait::async_trait;

use reaper_domain::{OpId, OpKind, Operation};
use reaper_ports::AdminCommandPort;

pub fn op(id: i64, secs_running: u64) -> Operation {
    Operation {
        opid: OpId::Int(id),
        kind: OpKind::Query,
        client: format!("10.0.0.{id}:50000"),
        secs_running,
        command: serde_json::json!({ "count": "sessions" }),
        active: true,
    }
}

/// Returns the same operations on every scan.
#[derive(Default)]
pub struct ScriptedAdmin {
    operations: Vec<Operation>,
    failing: Option<OpId>,
    unreachable: bool,
    kill_calls: AtomicUsize,
}

impl ScriptedAdmin {
    pub fn new(operations: Vec<Operation>) -> Self {
        Self {
            operations,
            ..Default::default()
        }
    }

    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Default::default()
        }
    }

    pub fn failing(mut self, id: i64) -> Self {
        self.failing = Some(OpId::Int(id));
        self
    }

    pub fn kill_calls(&self) -> usize {
        self.kill_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AdminCommandPort for ScriptedAdmin {
    async fn list_active_operations(&self) -> Result<Vec<Operation>> {
        if self.unreachable {
            anyhow::bail!("server selection timeout");
        }
        Ok(self.operations.clone())
    }

    async fn kill_operation(&self, opid: &OpId) -> Result<()> {
        self.kill_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.as_ref() == Some(opid) {
            anyhow::bail!("op {opid} not found");
        }
        Ok(())
    }
}
