//! Scheduler for the periodic retention sweep.

use std::time::Duration;

use tokio_cron_scheduler::{Job, JobScheduler};

use rollcall_core::error::AppError;
use rollcall_core::time::SharedClock;
use rollcall_notify::SharedStore;
use rollcall_notify::retention::RetentionSweep;

/// Runs the retention sweep at startup and then on a fixed interval.
pub struct MaintenanceScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    store: SharedStore,
    clock: SharedClock,
    sweep: RetentionSweep,
    interval: Duration,
}

impl std::fmt::Debug for MaintenanceScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaintenanceScheduler")
            .field("interval", &self.interval)
            .finish()
    }
}

impl MaintenanceScheduler {
    /// Create a scheduler sweeping `store` every `interval`.
    pub async fn new(
        store: SharedStore,
        clock: SharedClock,
        sweep: RetentionSweep,
        interval: Duration,
    ) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self {
            scheduler,
            store,
            clock,
            sweep,
            interval,
        })
    }

    /// Sweep once, now.
    pub fn run_sweep(&self) -> usize {
        self.sweep.run(&self.store, self.clock.now())
    }

    /// Register the repeating sweep.
    pub async fn register_retention_sweep(&self) -> Result<(), AppError> {
        let store = self.store.clone();
        let clock = self.clock.clone();
        let sweep = self.sweep;
        let job = Job::new_repeated_async(self.interval, move |_uuid, _lock| {
            let store = store.clone();
            let clock = clock.clone();
            Box::pin(async move {
                tracing::debug!("Running scheduled retention sweep");
                sweep.run(&store, clock.now());
            })
        })
        .map_err(|e| {
            AppError::internal(format!("Failed to create retention_sweep schedule: {}", e))
        })?;

        self.scheduler.add(job).await.map_err(|e| {
            AppError::internal(format!("Failed to add retention_sweep schedule: {}", e))
        })?;

        tracing::info!(
            interval_secs = self.interval.as_secs(),
            max_age_days = self.sweep.max_age().num_days(),
            "Registered: retention_sweep"
        );
        Ok(())
    }

    /// Sweep immediately, then start the schedule.
    pub async fn start(&self) -> Result<(), AppError> {
        self.run_sweep();
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {}", e)))?;

        tracing::info!("Maintenance scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {}", e)))?;

        tracing::info!("Maintenance scheduler shut down");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Duration as ChronoDuration;
    use rollcall_core::time::ManualClock;
    use rollcall_entity::notification::{NotificationDraft, NotificationKind};
    use rollcall_notify::NotificationStore;
    use rollcall_notify::persistence::NoopPersistence;

    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_start_sweeps_immediately() {
        let clock = Arc::new(ManualClock::starting_now());
        let store = SharedStore::new(NotificationStore::hydrate(
            clock.clone(),
            Arc::new(NoopPersistence),
        ));
        store.add_notification(NotificationDraft::new(NotificationKind::Info, "old", "m"));
        clock.advance(ChronoDuration::days(8));
        store.add_notification(NotificationDraft::new(NotificationKind::Info, "new", "m"));

        let mut scheduler = MaintenanceScheduler::new(
            store.clone(),
            clock,
            RetentionSweep::new(ChronoDuration::days(7)),
            Duration::from_secs(3600),
        )
        .await
        .unwrap();
        scheduler.register_retention_sweep().await.unwrap();
        scheduler.start().await.unwrap();

        assert_eq!(store.snapshot().len(), 1);
        assert_eq!(store.snapshot()[0].title, "new");

        scheduler.shutdown().await.unwrap();
    }
}
