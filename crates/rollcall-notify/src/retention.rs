//! Age-based retention sweep.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use rollcall_core::config::notifications::NotificationsConfig;

use crate::shared::SharedStore;

/// Removes notifications older than a fixed age.
#[derive(Debug, Clone, Copy)]
pub struct RetentionSweep {
    max_age: Duration,
}

impl RetentionSweep {
    /// Sweep entries older than `max_age`.
    pub fn new(max_age: Duration) -> Self {
        Self { max_age }
    }

    /// Sweep using `retention_days` from configuration.
    pub fn from_config(config: &NotificationsConfig) -> Self {
        Self::new(Duration::days(config.effective_retention_days()))
    }

    /// Maximum age a notification may reach.
    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Remove every notification whose timestamp is before `now - max_age`.
    ///
    /// Returns the number removed.
    pub fn run(&self, store: &SharedStore, now: DateTime<Utc>) -> usize {
        let cutoff = now - self.max_age;
        let removed = store.with(|s| s.remove_older_than(cutoff));

        if removed > 0 {
            info!(removed, cutoff = %cutoff, "Retention sweep removed old notifications");
        } else {
            debug!(cutoff = %cutoff, "Retention sweep found nothing to remove");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rollcall_core::time::{Clock, ManualClock};
    use rollcall_entity::notification::{NotificationDraft, NotificationKind};

    use super::*;
    use crate::persistence::NoopPersistence;
    use crate::store::NotificationStore;

    #[test]
    fn test_removes_eight_day_old_and_keeps_six_day_old() {
        let clock = Arc::new(ManualClock::starting_now());
        let store = SharedStore::new(NotificationStore::hydrate(
            clock.clone(),
            Arc::new(NoopPersistence),
        ));

        let old = store.add_notification(NotificationDraft::new(NotificationKind::Info, "old", "m"));
        clock.advance(Duration::days(2));
        let recent =
            store.add_notification(NotificationDraft::new(NotificationKind::Error, "recent", "m"));
        clock.advance(Duration::days(6));

        let sweep = RetentionSweep::from_config(&NotificationsConfig::default());
        assert_eq!(sweep.run(&store, clock.now()), 1);

        assert!(store.get(&old.id).is_none());
        assert!(store.get(&recent.id).is_some());
        assert_eq!(store.unread_count(), 1);

        assert_eq!(sweep.run(&store, clock.now()), 0);
    }

    #[test]
    fn test_out_of_range_retention_is_clamped() {
        let clock = Arc::new(ManualClock::starting_now());
        let store = SharedStore::new(NotificationStore::hydrate(
            clock.clone(),
            Arc::new(NoopPersistence),
        ));
        store.add_notification(NotificationDraft::new(NotificationKind::Info, "fresh", "m"));

        let negative = NotificationsConfig {
            retention_days: -5,
            ..NotificationsConfig::default()
        };
        assert_eq!(RetentionSweep::from_config(&negative).max_age(), Duration::days(1));
        assert_eq!(RetentionSweep::from_config(&negative).run(&store, clock.now()), 0);

        let huge = NotificationsConfig {
            retention_days: i64::MAX,
            ..NotificationsConfig::default()
        };
        assert_eq!(RetentionSweep::from_config(&huge).run(&store, clock.now()), 0);
        assert_eq!(store.snapshot().len(), 1);
    }
}
