//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from an
//! optional TOML file plus `ROLLCALL__*` environment variables. Every field
//! carries a default, so an empty source produces a usable configuration.

pub mod api;
pub mod logging;
pub mod notifications;
pub mod toast;
pub mod upload;
pub mod worker;

use serde::{Deserialize, Serialize};

use self::api::ApiConfig;
use self::logging::LoggingConfig;
use self::notifications::{MAX_RETENTION_DAYS, NotificationsConfig};
use self::toast::{MAX_DURATION_MS, ToastConfig};
use self::upload::UploadConfig;
use self::worker::WorkerConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Remote REST API settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Notification store settings.
    #[serde(default)]
    pub notifications: NotificationsConfig,
    /// Toast presentation settings.
    #[serde(default)]
    pub toast: ToastConfig,
    /// Background worker settings.
    #[serde(default)]
    pub worker: WorkerConfig,
    /// Bulk upload validation settings.
    #[serde(default)]
    pub upload: UploadConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration.
    ///
    /// Merges `config/default.toml` (if present), the optional file at
    /// `path`, and environment variables prefixed with `ROLLCALL__`.
    pub fn load(path: Option<&str>) -> Result<Self, AppError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false));

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("ROLLCALL")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would turn into nonsensical or unrepresentable
    /// durations.
    pub fn validate(&self) -> Result<(), AppError> {
        let retention = self.notifications.retention_days;
        if !(1..=MAX_RETENTION_DAYS).contains(&retention) {
            return Err(AppError::configuration(format!(
                "notifications.retention_days must be between 1 and {MAX_RETENTION_DAYS}, got {retention}"
            )));
        }

        let display = self.toast.display_ms;
        if !(1..=MAX_DURATION_MS).contains(&display) {
            return Err(AppError::configuration(format!(
                "toast.display_ms must be between 1 and {MAX_DURATION_MS}, got {display}"
            )));
        }
        if self.toast.fade_ms > display {
            return Err(AppError::configuration(format!(
                "toast.fade_ms ({}) must not exceed toast.display_ms ({display})",
                self.toast.fade_ms
            )));
        }

        let auto_read = self.notifications.auto_read_delay_ms;
        if auto_read > MAX_DURATION_MS {
            return Err(AppError::configuration(format!(
                "notifications.auto_read_delay_ms must be at most {MAX_DURATION_MS}, got {auto_read}"
            )));
        }
        if self.notifications.sweep_interval_seconds == 0 {
            return Err(AppError::configuration(
                "notifications.sweep_interval_seconds must be positive",
            ));
        }
        Ok(())
    }
}
