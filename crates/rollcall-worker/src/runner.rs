//! Background runtime: the maintenance scheduler plus the timer driver.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use rollcall_core::config::AppConfig;
use rollcall_core::error::AppError;
use rollcall_core::time::SharedClock;
use rollcall_notify::SharedStore;
use rollcall_notify::retention::RetentionSweep;

use crate::driver::{SharedActivity, SharedToasts, TimerDriver};
use crate::scheduler::MaintenanceScheduler;

/// Handle to the running background tasks.
#[derive(Debug)]
pub struct BackgroundRunner {
    scheduler: MaintenanceScheduler,
    cancel: CancellationToken,
    driver: Option<JoinHandle<()>>,
}

impl BackgroundRunner {
    /// Start the retention schedule and, when enabled, the timer driver.
    pub async fn start(
        config: &AppConfig,
        store: SharedStore,
        toasts: SharedToasts,
        activity: SharedActivity,
        clock: SharedClock,
    ) -> Result<Self, AppError> {
        let scheduler = MaintenanceScheduler::new(
            store.clone(),
            clock.clone(),
            RetentionSweep::from_config(&config.notifications),
            Duration::from_secs(config.notifications.sweep_interval_seconds.max(1)),
        )
        .await?;
        scheduler.register_retention_sweep().await?;
        scheduler.start().await?;

        let cancel = CancellationToken::new();
        let driver = if config.worker.enabled {
            let tick = Duration::from_millis(config.worker.tick_interval_ms.max(1));
            Some(TimerDriver::new(store, toasts, activity, clock, tick).spawn(cancel.clone()))
        } else {
            tracing::info!("Timer driver disabled by configuration");
            None
        };

        Ok(Self {
            scheduler,
            cancel,
            driver,
        })
    }

    /// Stop the driver and the scheduler.
    pub async fn shutdown(mut self) -> Result<(), AppError> {
        self.cancel.cancel();
        if let Some(handle) = self.driver.take() {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "Timer driver task ended abnormally");
            }
        }
        self.scheduler.shutdown().await
    }
}
