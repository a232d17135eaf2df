use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MONGODB_URI: &str = "mongodb://127.0.0.1:27017";
pub const DEFAULT_MAX_RUNNING_SECS: u64 = 10;
pub const DEFAULT_DINGTALK_ENDPOINT: &str = "https://oapi.dingtalk.com/robot/send";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaperConfig {
    pub mongodb: MongoConfig,
    pub scan: ScanConfig,
    pub notifications: NotificationsConfig,
    pub schedule: ScheduleConfig,
    pub debug: bool,
}

impl Default for ReaperConfig {
    fn default() -> Self {
        Self {
            mongodb: MongoConfig::default(),
            scan: ScanConfig::default(),
            notifications: NotificationsConfig::default(),
            schedule: ScheduleConfig::default(),
            debug: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MongoConfig {
    pub uri: String,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            uri: DEFAULT_MONGODB_URI.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub max_running_secs: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_running_secs: DEFAULT_MAX_RUNNING_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationsConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub access_token: Option<String>,
    pub secret: Option<String>,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: DEFAULT_DINGTALK_ENDPOINT.to_string(),
            access_token: None,
            secret: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub interval_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self { interval_secs: 60 }
    }
}

impl ReaperConfig {
    /// Reads the YAML file at `path`. A missing file yields the defaults.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        serde_yaml::from_str(&raw)
            .with_context(|| format!("failed to parse config at {}", path.display()))
    }

    /// Loads `path` and layers the process environment on top.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = Self::load_from_path(path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(uri) = lookup("MONGODB_URI") {
            self.mongodb.uri = uri;
        }
        if let Some(raw) = lookup("MAX_QUERY_RUNNING_SECONDS") {
            self.scan.max_running_secs = raw
                .trim()
                .parse()
                .with_context(|| format!("MAX_QUERY_RUNNING_SECONDS is not a number: {raw}"))?;
        }
        if let Some(raw) = lookup("DEBUG") {
            self.debug = parse_flag("DEBUG", &raw)?;
        }
        if let Some(raw) = lookup("DINGTALK_ENABLED") {
            self.notifications.enabled = parse_flag("DINGTALK_ENABLED", &raw)?;
        }
        if let Some(endpoint) = lookup("DINGTALK_ENDPOINT") {
            self.notifications.endpoint = endpoint;
        }
        if let Some(token) = lookup("DINGTALK_ACCESS_TOKEN") {
            self.notifications.access_token = Some(token);
        }
        if let Some(secret) = lookup("DINGTALK_SECRET") {
            self.notifications.secret = Some(secret);
        }
        if let Some(raw) = lookup("REAPER_INTERVAL_SECS") {
            self.schedule.interval_secs = raw
                .trim()
                .parse()
                .with_context(|| format!("REAPER_INTERVAL_SECS is not a number: {raw}"))?;
        }
        Ok(())
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("{key} is not a boolean: {other}"),
    }
}
