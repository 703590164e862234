//! Read-after-activity sweep.
//!
//! Any user input restarts a quiet-period timer. When the timer fires,
//! unread `info` and `success` notifications are marked as read; `warning`
//! and `error` stay unread until acknowledged.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, trace};

use rollcall_core::config::notifications::NotificationsConfig;
use rollcall_core::time::{TimerQueue, TimerToken};

use crate::shared::SharedStore;

/// Source of a user input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Mouse,
    Keyboard,
    Scroll,
    Touch,
}

/// Debounces user activity into auto-read sweeps.
#[derive(Debug)]
pub struct ActivityMonitor {
    delay: Duration,
    timers: TimerQueue<()>,
    pending: Option<TimerToken>,
}

impl ActivityMonitor {
    /// Auto-read `delay` after the most recent activity.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            timers: TimerQueue::new(),
            pending: None,
        }
    }

    /// Use `auto_read_delay_ms` from configuration.
    pub fn from_config(config: &NotificationsConfig) -> Self {
        Self::new(Duration::milliseconds(config.effective_auto_read_delay_ms()))
    }

    /// Record an input event, restarting the quiet period.
    pub fn record(&mut self, kind: ActivityKind, now: DateTime<Utc>) {
        if let Some(token) = self.pending.take() {
            self.timers.cancel(token);
        }
        self.pending = Some(self.timers.schedule(now + self.delay, ()));
        trace!(?kind, "User activity recorded");
    }

    /// Fire the sweep if the quiet period has elapsed.
    ///
    /// Returns the number of notifications marked as read.
    pub fn tick(&mut self, store: &SharedStore, now: DateTime<Utc>) -> usize {
        let mut marked = 0;
        while self.timers.pop_due(now).is_some() {
            self.pending = None;
            marked += store.with(|s| s.mark_read_where(|n| n.kind.is_auto_readable()));
        }
        if marked > 0 {
            debug!(marked, "Auto-marked notifications as read after activity");
        }
        marked
    }

    /// When the pending sweep is due, if any.
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        self.timers.next_deadline()
    }

    /// Drop the pending sweep.
    pub fn cancel(&mut self) {
        self.timers.clear();
        self.pending = None;
    }
}
