use anyhow::{Context, Result};
use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::{Client, Database};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use reaper_domain::{OpId, Operation};
use reaper_ports::AdminCommandPort;

use crate::mapping;

const ADMIN_DB: &str = "admin";

/// Admin command surface backed by a lazily created client.
///
/// The client is created on first use and reused for the lifetime of
/// this value. A failed connect is not remembered, so the next call
/// tries again.
#[derive(Debug)]
pub struct MongoAdmin {
    uri: String,
    client: OnceCell<Client>,
}

impl MongoAdmin {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            client: OnceCell::new(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.client.initialized()
    }

    async fn admin_db(&self) -> Result<Database> {
        let client = self
            .client
            .get_or_try_init(|| async {
                let client = Client::with_uri_str(&self.uri)
                    .await
                    .context("failed to create mongodb client")?;
                info!("mongodb client created");
                Ok::<_, anyhow::Error>(client)
            })
            .await?;
        Ok(client.database(ADMIN_DB))
    }
}

#[async_trait]
impl AdminCommandPort for MongoAdmin {
    async fn list_active_operations(&self) -> Result<Vec<Operation>> {
        let db = self.admin_db().await?;
        let reply = db
            .run_command(doc! { "currentOp": 1 })
            .await
            .context("currentOp failed")?;
        let operations = mapping::operations_from_reply(&reply)?;
        debug!(count = operations.len(), "currentOp returned");
        Ok(operations)
    }

    async fn kill_operation(&self, opid: &OpId) -> Result<()> {
        let db = self.admin_db().await?;
        let reply = db
            .run_command(doc! { "killOp": 1, "op": mapping::opid_to_bson(opid) })
            .await
            .with_context(|| format!("killOp failed for opid {opid}"))?;
        debug!(opid = %opid, reply = %reply, "killOp reply");
        if !mapping::reply_ok(&reply) {
            anyhow::bail!("killOp rejected for opid {opid}: {reply}");
        }
        Ok(())
    }
}
