//! Notification store configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::toast::MAX_DURATION_MS;

/// Longest accepted retention, one hundred years.
pub const MAX_RETENTION_DAYS: i64 = 36_500;

/// Persistence, retention, and auto-read settings for the notification store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Directory holding the persisted notification slot.
    #[serde(default = "default_storage_dir")]
    pub storage_dir: String,
    /// Name of the persisted slot (file stem).
    #[serde(default = "default_storage_name")]
    pub storage_name: String,
    /// Notifications older than this many days are swept.
    #[serde(default = "default_retention_days")]
    pub retention_days: i64,
    /// Interval in seconds between retention sweeps.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
    /// Delay after the last user activity before info/success entries are auto-read.
    #[serde(default = "default_auto_read_delay")]
    pub auto_read_delay_ms: u64,
}

impl NotificationsConfig {
    /// Retention clamped to `1..=MAX_RETENTION_DAYS`.
    pub fn effective_retention_days(&self) -> i64 {
        self.retention_days.clamp(1, MAX_RETENTION_DAYS)
    }

    /// Auto-read delay capped at `MAX_DURATION_MS`.
    pub fn effective_auto_read_delay_ms(&self) -> i64 {
        self.auto_read_delay_ms.min(MAX_DURATION_MS) as i64
    }

    /// Full path of the persisted slot.
    pub fn storage_path(&self) -> PathBuf {
        PathBuf::from(&self.storage_dir).join(format!("{}.json", self.storage_name))
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            storage_dir: default_storage_dir(),
            storage_name: default_storage_name(),
            retention_days: default_retention_days(),
            sweep_interval_seconds: default_sweep_interval(),
            auto_read_delay_ms: default_auto_read_delay(),
        }
    }
}

fn default_storage_dir() -> String {
    "data".to_string()
}

fn default_storage_name() -> String {
    "notifications-storage".to_string()
}

fn default_retention_days() -> i64 {
    7
}

fn default_sweep_interval() -> u64 {
    3600
}

fn default_auto_read_delay() -> u64 {
    5000
}
