use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use reaper_adapter_mongodb::MongoAdmin;
use reaper_adapter_notification::{DingTalkNotifier, NullNotifier};
use reaper_domain::ReaperConfig;

use crate::ports::{NotificationPort, PortSet};

/// Builds the live ports. Nothing connects here; the database client is
/// created on the first invocation and reused afterwards.
pub fn ports_from_config(config: &ReaperConfig) -> Result<PortSet> {
    let admin = Arc::new(MongoAdmin::new(config.mongodb.uri.clone()));

    let notifications = &config.notifications;
    let notifier: Arc<dyn NotificationPort> = if notifications.enabled {
        if notifications.access_token.is_none() || notifications.secret.is_none() {
            warn!("robot webhook credentials incomplete, sending with what is configured");
        }
        info!(endpoint = %notifications.endpoint, "robot webhook notifications enabled");
        Arc::new(
            DingTalkNotifier::from_config(notifications)
                .context("failed to set up robot webhook notifier")?,
        )
    } else {
        info!("notifications disabled");
        Arc::new(NullNotifier)
    };

    Ok(PortSet { admin, notifier })
}
