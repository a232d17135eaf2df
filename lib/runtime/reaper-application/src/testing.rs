//! In-memory ports for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Barrier;

use reaper_domain::{NotificationMessage, OpId, OpKind, Operation};
use reaper_ports::{AdminCommandPort, NotificationPort};

pub fn op(id: i64, client: &str, secs_running: u64) -> Operation {
    op_of_kind(id, client, secs_running, OpKind::Query)
}

pub fn op_of_kind(id: i64, client: &str, secs_running: u64, kind: OpKind) -> Operation {
    Operation {
        opid: OpId::Int(id),
        kind,
        client: client.to_string(),
        secs_running,
        command: serde_json::json!({ "find": "orders", "filter": { "status": "open" } }),
        active: true,
    }
}

#[derive(Default)]
pub struct FakeAdmin {
    operations: Vec<Operation>,
    unreachable: bool,
    failing: HashSet<OpId>,
    delays: HashMap<OpId, Duration>,
    barrier: Option<Arc<Barrier>>,
    killed: Mutex<Vec<OpId>>,
}

impl FakeAdmin {
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

    pub fn failing(mut self, ids: &[i64]) -> Self {
        self.failing.extend(ids.iter().map(|id| OpId::Int(*id)));
        self
    }

    pub fn with_delay(mut self, id: OpId, delay: Duration) -> Self {
        self.delays.insert(id, delay);
        self
    }

    pub fn with_barrier(mut self, barrier: Arc<Barrier>) -> Self {
        self.barrier = Some(barrier);
        self
    }

    pub fn killed(&self) -> Vec<OpId> {
        self.killed.lock().unwrap().clone()
    }
}

#[async_trait]
impl AdminCommandPort for FakeAdmin {
    async fn list_active_operations(&self) -> Result<Vec<Operation>> {
        if self.unreachable {
            anyhow::bail!("connection refused");
        }
        Ok(self.operations.clone())
    }

    async fn kill_operation(&self, opid: &OpId) -> Result<()> {
        if self.unreachable {
            anyhow::bail!("connection refused");
        }
        self.killed.lock().unwrap().push(opid.clone());
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        if let Some(delay) = self.delays.get(opid) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.contains(opid) {
            anyhow::bail!("not authorized on admin to execute command killOp");
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    fail: bool,
    sent: Mutex<Vec<NotificationMessage>>,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<NotificationMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationPort for RecordingNotifier {
    async fn send_notification(&self, message: &NotificationMessage) -> Result<()> {
        self.sent.lock().unwrap().push(message.clone());
        if self.fail {
            anyhow::bail!("robot endpoint returned 503");
        }
        Ok(())
    }
}
