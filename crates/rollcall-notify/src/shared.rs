//! Process-wide handle to the notification store.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use rollcall_core::types::NotificationId;
use rollcall_entity::notification::{Notification, NotificationDraft};

use crate::store::{NotificationStore, StoreEvent};

/// Cloneable handle to the one [`NotificationStore`] of a process.
///
/// Every reader and writer goes through these methods; each call holds the
/// lock for a single store operation, so operations are atomic with
/// respect to each other.
#[derive(Debug, Clone)]
pub struct SharedStore {
    inner: Arc<Mutex<NotificationStore>>,
}

impl SharedStore {
    /// Wrap a store.
    pub fn new(store: NotificationStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Run `f` with exclusive access to the store.
    pub fn with<R>(&self, f: impl FnOnce(&mut NotificationStore) -> R) -> R {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }

    /// See [`NotificationStore::add_notification`].
    pub fn add_notification(&self, draft: NotificationDraft) -> Notification {
        self.with(|s| s.add_notification(draft))
    }

    /// See [`NotificationStore::mark_as_read`].
    pub fn mark_as_read(&self, id: &NotificationId) -> bool {
        self.with(|s| s.mark_as_read(id))
    }

    /// See [`NotificationStore::mark_all_as_read`].
    pub fn mark_all_as_read(&self) {
        self.with(|s| s.mark_all_as_read())
    }

    /// See [`NotificationStore::remove_notification`].
    pub fn remove_notification(&self, id: &NotificationId) -> Option<Notification> {
        self.with(|s| s.remove_notification(id))
    }

    /// See [`NotificationStore::clear_all`].
    pub fn clear_all(&self) {
        self.with(|s| s.clear_all())
    }

    /// See [`NotificationStore::toggle_dropdown`].
    pub fn toggle_dropdown(&self) -> bool {
        self.with(|s| s.toggle_dropdown())
    }

    /// See [`NotificationStore::close_dropdown`].
    pub fn close_dropdown(&self) {
        self.with(|s| s.close_dropdown())
    }

    /// See [`NotificationStore::subscribe`].
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<StoreEvent> {
        self.with(|s| s.subscribe())
    }

    /// Copy of the current notifications, most recent first.
    pub fn snapshot(&self) -> Vec<Notification> {
        self.with(|s| s.notifications().to_vec())
    }

    /// Copy of one notification.
    pub fn get(&self, id: &NotificationId) -> Option<Notification> {
        self.with(|s| s.get(id).cloned())
    }

    /// Current unread count.
    pub fn unread_count(&self) -> usize {
        self.with(|s| s.unread_count())
    }

    /// Whether the dropdown is open.
    pub fn is_open(&self) -> bool {
        self.with(|s| s.is_open())
    }
}
