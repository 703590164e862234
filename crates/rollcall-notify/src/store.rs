//! The notification store.
//!
//! Holds notifications most-recent-first, an incrementally maintained
//! unread count, and the dropdown visibility flag. Every operation is
//! total: unknown ids and empty collections are no-ops, and a failing
//! persistence write is logged without undoing the mutation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use rollcall_core::time::SharedClock;
use rollcall_core::types::NotificationId;
use rollcall_entity::notification::{Notification, NotificationDraft};

use crate::persistence::{PersistedState, StatePersistence};

/// A change to the store, delivered to subscribers in mutation order.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// A notification was prepended.
    Added(Notification),
    /// A notification switched from unread to read.
    Read(NotificationId),
    /// Every notification was marked as read.
    AllRead,
    /// A notification was removed.
    Removed(NotificationId),
    /// The collection was emptied.
    Cleared,
}

/// Notification state container.
#[derive(Debug)]
pub struct NotificationStore {
    notifications: Vec<Notification>,
    unread_count: usize,
    is_open: bool,
    clock: SharedClock,
    persistence: Arc<dyn StatePersistence>,
    subscribers: Vec<mpsc::UnboundedSender<StoreEvent>>,
}

impl NotificationStore {
    /// Create a store, hydrating from `persistence` when it holds state.
    ///
    /// An unreadable slot starts the store empty; the failure is logged.
    pub fn hydrate(clock: SharedClock, persistence: Arc<dyn StatePersistence>) -> Self {
        let mut store = Self {
            notifications: Vec::new(),
            unread_count: 0,
            is_open: false,
            clock,
            persistence,
            subscribers: Vec::new(),
        };

        match store.persistence.load() {
            Ok(Some(state)) => {
                let actual = count_unread(&state.notifications);
                if actual != state.unread_count {
                    warn!(
                        stored = state.unread_count,
                        actual, "Persisted unread count disagrees with notifications; recomputing"
                    );
                }
                debug!(count = state.notifications.len(), "Hydrated notification store");
                store.notifications = state.notifications;
                store.unread_count = actual;
            }
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "Failed to hydrate notification store; starting empty");
            }
        }

        store
    }

    /// Notifications, most recent first.
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// The newest notification.
    pub fn latest(&self) -> Option<&Notification> {
        self.notifications.first()
    }

    /// Look up a notification by id.
    pub fn get(&self, id: &NotificationId) -> Option<&Notification> {
        self.notifications.iter().find(|n| &n.id == id)
    }

    /// Number of unread notifications.
    pub fn unread_count(&self) -> usize {
        self.unread_count
    }

    /// Whether the dropdown is open.
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Number of notifications.
    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    /// Whether the store holds no notifications.
    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    /// Receive every subsequent [`StoreEvent`].
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<StoreEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    /// Build a notification from `draft` and prepend it.
    pub fn add_notification(&mut self, draft: NotificationDraft) -> Notification {
        let now = self.clock.now();
        let notification = Notification::from_draft(draft, NotificationId::generate(now), now);

        self.notifications.insert(0, notification.clone());
        self.unread_count += 1;

        debug!(
            notification_id = %notification.id,
            kind = %notification.kind,
            "Notification added"
        );

        self.persist();
        self.emit(StoreEvent::Added(notification.clone()));
        notification
    }

    /// Mark one notification as read. Returns whether anything changed.
    pub fn mark_as_read(&mut self, id: &NotificationId) -> bool {
        let Some(notification) = self.notifications.iter_mut().find(|n| &n.id == id) else {
            return false;
        };
        if notification.read {
            return false;
        }
        notification.read = true;
        self.unread_count = count_unread(&self.notifications);

        self.persist();
        self.emit(StoreEvent::Read(id.clone()));
        true
    }

    /// Mark every unread notification matching `predicate` as read, with a
    /// single persistence write. Returns how many changed.
    pub fn mark_read_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&Notification) -> bool,
    {
        let mut changed = Vec::new();
        for notification in self.notifications.iter_mut() {
            if !notification.read && predicate(notification) {
                notification.read = true;
                changed.push(notification.id.clone());
            }
        }
        if changed.is_empty() {
            return 0;
        }
        self.unread_count = count_unread(&self.notifications);

        self.persist();
        for id in &changed {
            self.emit(StoreEvent::Read(id.clone()));
        }
        changed.len()
    }

    /// Mark every notification as read.
    pub fn mark_all_as_read(&mut self) {
        for notification in self.notifications.iter_mut() {
            notification.read = true;
        }
        self.unread_count = 0;

        self.persist();
        self.emit(StoreEvent::AllRead);
    }

    /// Remove one notification. Returns it if it existed.
    pub fn remove_notification(&mut self, id: &NotificationId) -> Option<Notification> {
        let index = self.notifications.iter().position(|n| &n.id == id)?;
        let removed = self.notifications.remove(index);
        if removed.is_unread() {
            self.unread_count -= 1;
        }

        debug!(notification_id = %id, "Notification removed");

        self.persist();
        self.emit(StoreEvent::Removed(id.clone()));
        Some(removed)
    }

    /// Remove every notification created strictly before `cutoff`,
    /// one at a time with [`Self::remove_notification`] semantics.
    pub fn remove_older_than(&mut self, cutoff: DateTime<Utc>) -> usize {
        let stale: Vec<NotificationId> = self
            .notifications
            .iter()
            .filter(|n| n.timestamp < cutoff)
            .map(|n| n.id.clone())
            .collect();

        stale
            .iter()
            .filter(|id| self.remove_notification(id).is_some())
            .count()
    }

    /// Remove every notification.
    pub fn clear_all(&mut self) {
        self.notifications.clear();
        self.unread_count = 0;

        self.persist();
        self.emit(StoreEvent::Cleared);
    }

    /// Flip dropdown visibility.
    pub fn toggle_dropdown(&mut self) -> bool {
        self.is_open = !self.is_open;
        self.is_open
    }

    /// Close the dropdown.
    pub fn close_dropdown(&mut self) {
        self.is_open = false;
    }

    fn persist(&self) {
        let state = PersistedState {
            notifications: self.notifications.clone(),
            unread_count: self.unread_count,
        };
        if let Err(e) = self.persistence.save(&state) {
            warn!(error = %e, "Failed to persist notifications");
        }
    }

    fn emit(&mut self, event: StoreEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

fn count_unread(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|n| n.is_unread()).count()
}
