//! Advances toast and activity timers on real time.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio::time;
use tokio_util::sync::CancellationToken;

use rollcall_core::time::SharedClock;
use rollcall_notify::SharedStore;
use rollcall_notify::activity::ActivityMonitor;
use rollcall_notify::toast::ToastManager;

/// Toast manager shared between the driver and the console.
pub type SharedToasts = Arc<Mutex<ToastManager>>;

/// Activity monitor shared between the driver and the console.
pub type SharedActivity = Arc<Mutex<ActivityMonitor>>;

/// Periodically pumps the toast manager and the activity monitor.
#[derive(Debug, Clone)]
pub struct TimerDriver {
    store: SharedStore,
    toasts: SharedToasts,
    activity: SharedActivity,
    clock: SharedClock,
    tick: Duration,
}

impl TimerDriver {
    pub fn new(
        store: SharedStore,
        toasts: SharedToasts,
        activity: SharedActivity,
        clock: SharedClock,
        tick: Duration,
    ) -> Self {
        Self {
            store,
            toasts,
            activity,
            clock,
            tick,
        }
    }

    /// Advance every timer to `now`.
    pub fn tick_once(&self, now: DateTime<Utc>) {
        self.toasts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pump(now);

        let marked = self
            .activity
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .tick(&self.store, now);
        if marked > 0 {
            tracing::trace!(marked, "Activity sweep applied");
        }
    }

    /// Tick until `cancel` fires.
    pub async fn run(self, cancel: CancellationToken) {
        tracing::info!(tick_ms = self.tick.as_millis() as u64, "Timer driver started");
        let mut interval = time::interval(self.tick);
        interval.set_missed_tick_behavior(time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Timer driver received shutdown signal");
                    break;
                }
                _ = interval.tick() => {
                    self.tick_once(self.clock.now());
                }
            }
        }
    }

    /// Run on a background task.
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(cancel))
    }
}
