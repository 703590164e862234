//! Toast lifecycle.
//!
//! A toast is spawned when a notification that opted in with
//! `showAsToast: true` becomes the newest entry of the store. Each toast
//! walks `Mounting -> Visible -> FadingOut -> removed` exactly once:
//!
//! - an untouched toast starts fading so that it is gone exactly
//!   `display_ms` after it was mounted;
//! - a dismissed or clicked toast fades for `fade_ms` from the moment of
//!   dismissal.
//!
//! Removal is idempotent, and cancelled timers never fire.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::mpsc;
use tracing::{debug, trace};

use rollcall_core::config::toast::ToastConfig;
use rollcall_core::time::{TimerQueue, TimerToken};
use rollcall_core::types::NotificationId;
use rollcall_entity::notification::Notification;

use crate::shared::SharedStore;
use crate::store::{NotificationStore, StoreEvent};

/// Where a toast is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    /// Just created, not yet rendered.
    Mounting,
    /// On screen.
    Visible,
    /// Animating out; cannot become visible again.
    FadingOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ToastTimer {
    BeginFade,
    Remove,
}

#[derive(Debug)]
struct ActiveToast {
    id: NotificationId,
    phase: ToastPhase,
    mounted_at: DateTime<Utc>,
    timer: Option<TimerToken>,
}

/// Layout of one toast in the stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastSlot {
    /// Notification the toast presents.
    pub id: NotificationId,
    /// Lifecycle phase.
    pub phase: ToastPhase,
    /// Vertical offset from the anchor corner.
    pub offset_px: u32,
    /// Stacking order; the newest toast is on top.
    pub z_index: i32,
    /// When the toast was mounted.
    pub mounted_at: DateTime<Utc>,
}

/// A toast ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct ToastView {
    /// Position and phase.
    pub slot: ToastSlot,
    /// The notification shown.
    pub notification: Notification,
}

/// Manages the ordered set of visible toasts.
#[derive(Debug)]
pub struct ToastManager {
    config: ToastConfig,
    toasts: Vec<ActiveToast>,
    presented: HashSet<NotificationId>,
    timers: TimerQueue<(NotificationId, ToastTimer)>,
    events: Option<mpsc::UnboundedReceiver<StoreEvent>>,
}

impl ToastManager {
    /// Create a manager that is not yet watching any store.
    pub fn new(config: ToastConfig) -> Self {
        Self {
            config,
            toasts: Vec::new(),
            presented: HashSet::new(),
            timers: TimerQueue::new(),
            events: None,
        }
    }

    /// Create a manager that watches `store`.
    pub fn watching(config: ToastConfig, store: &SharedStore) -> Self {
        let mut manager = Self::new(config);
        manager.events = Some(store.subscribe());
        manager
    }

    /// Consume store events and advance timers to `now`.
    ///
    /// Every `Added` event is looked at on its own, so several
    /// notifications added in one burst each get their own toast. An entry
    /// that left the store before this pump never mounts, and ids that left
    /// the store are forgotten.
    pub fn pump(&mut self, now: DateTime<Utc>) {
        let mut added: Vec<Notification> = Vec::new();
        if let Some(rx) = self.events.as_mut() {
            while let Ok(event) = rx.try_recv() {
                match event {
                    StoreEvent::Added(notification) => added.push(notification),
                    StoreEvent::Removed(id) => {
                        added.retain(|n| n.id != id);
                        self.presented.remove(&id);
                    }
                    StoreEvent::Cleared => {
                        added.clear();
                        self.presented.clear();
                    }
                    StoreEvent::Read(_) | StoreEvent::AllRead => {}
                }
            }
        }
        for notification in &added {
            self.offer(notification, now);
        }
        self.tick(now);
    }

    /// Inspect the head of a notification list, as a re-render would.
    pub fn observe_head(&mut self, notifications: &[Notification], now: DateTime<Utc>) -> bool {
        match notifications.first() {
            Some(newest) => self.offer(newest, now),
            None => false,
        }
    }

    /// Offer the newest notification for presentation.
    ///
    /// Returns `true` when a toast was spawned. Notifications that did not
    /// opt in, or that were already presented once, are ignored.
    pub fn offer(&mut self, newest: &Notification, now: DateTime<Utc>) -> bool {
        if !newest.wants_toast()
            || self.presented.contains(&newest.id)
            || self.contains(&newest.id)
        {
            return false;
        }

        let lifetime = Duration::milliseconds(self.config.effective_display_ms());
        let fade = Duration::milliseconds(self.config.effective_fade_ms());
        let timer = self
            .timers
            .schedule(now + lifetime - fade, (newest.id.clone(), ToastTimer::BeginFade));

        self.toasts.insert(
            0,
            ActiveToast {
                id: newest.id.clone(),
                phase: ToastPhase::Mounting,
                mounted_at: now,
                timer: Some(timer),
            },
        );
        self.presented.insert(newest.id.clone());

        debug!(notification_id = %newest.id, active = self.toasts.len(), "Toast mounted");
        true
    }

    /// Render pass: mounting toasts become visible, due timers fire.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        for toast in self.toasts.iter_mut() {
            if toast.phase == ToastPhase::Mounting {
                toast.phase = ToastPhase::Visible;
            }
        }

        while let Some(due) = self.timers.pop_due(now) {
            let (id, timer) = due.event;
            match timer {
                ToastTimer::BeginFade => {
                    self.begin_fade(&id, due.deadline);
                }
                ToastTimer::Remove => {
                    self.remove(&id);
                }
            }
        }
    }

    /// Dismiss a toast early. No-op if it is unknown or already fading.
    pub fn dismiss(&mut self, id: &NotificationId, now: DateTime<Utc>) -> bool {
        let pending = match self.toasts.iter().find(|t| &t.id == id) {
            Some(toast) if toast.phase != ToastPhase::FadingOut => toast.timer,
            _ => return false,
        };
        if let Some(token) = pending {
            self.timers.cancel(token);
        }
        self.begin_fade(id, now)
    }

    /// Click on a toast: mark its notification as read, then dismiss it.
    pub fn click(&mut self, id: &NotificationId, store: &SharedStore, now: DateTime<Utc>) -> bool {
        if !self.contains(id) {
            return false;
        }
        store.mark_as_read(id);
        self.dismiss(id, now);
        true
    }

    /// Drop a toast immediately. Removing an absent id is a no-op.
    pub fn remove(&mut self, id: &NotificationId) -> bool {
        let Some(index) = self.toasts.iter().position(|t| &t.id == id) else {
            return false;
        };
        let toast = self.toasts.remove(index);
        if let Some(token) = toast.timer {
            self.timers.cancel(token);
        }
        debug!(notification_id = %id, active = self.toasts.len(), "Toast removed");
        true
    }

    /// Tear down: cancel every timer and drop every toast.
    pub fn unmount(&mut self) {
        self.timers.clear();
        self.toasts.clear();
        self.presented.clear();
        self.events = None;
    }

    /// Ids of mounted toasts, newest first.
    pub fn active_ids(&self) -> Vec<NotificationId> {
        self.toasts.iter().map(|t| t.id.clone()).collect()
    }

    /// Whether a toast for `id` is mounted.
    pub fn contains(&self, id: &NotificationId) -> bool {
        self.toasts.iter().any(|t| &t.id == id)
    }

    /// Phase of the toast for `id`.
    pub fn phase(&self, id: &NotificationId) -> Option<ToastPhase> {
        self.toasts.iter().find(|t| &t.id == id).map(|t| t.phase)
    }

    /// Number of mounted toasts.
    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    /// Whether no toast is mounted.
    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    /// Number of ids remembered as already presented.
    pub fn presented_len(&self) -> usize {
        self.presented.len()
    }

    /// Earliest pending timer, for drivers that sleep until then.
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        self.timers.next_deadline()
    }

    /// Stack layout, newest first.
    pub fn layout(&self) -> Vec<ToastSlot> {
        self.toasts
            .iter()
            .enumerate()
            .map(|(index, toast)| ToastSlot {
                id: toast.id.clone(),
                phase: toast.phase,
                offset_px: index as u32 * self.config.stack_offset_px,
                z_index: self.config.base_z_index - index as i32,
                mounted_at: toast.mounted_at,
            })
            .collect()
    }

    /// Layout joined with notification content. Toasts whose notification
    /// has left the store render nothing but keep their slot.
    pub fn render(&self, store: &NotificationStore) -> Vec<ToastView> {
        self.layout()
            .into_iter()
            .filter_map(|slot| {
                store.get(&slot.id).cloned().map(|notification| ToastView { slot, notification })
            })
            .collect()
    }

    fn begin_fade(&mut self, id: &NotificationId, at: DateTime<Utc>) -> bool {
        let fade = Duration::milliseconds(self.config.effective_fade_ms());
        let Some(toast) = self.toasts.iter_mut().find(|t| &t.id == id) else {
            return false;
        };
        if toast.phase == ToastPhase::FadingOut {
            return false;
        }
        toast.phase = ToastPhase::FadingOut;
        toast.timer = Some(self.timers.schedule(at + fade, (id.clone(), ToastTimer::Remove)));
        trace!(notification_id = %id, "Toast fading out");
        true
    }
}
