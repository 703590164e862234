//! Everything a console command can reach.

use chrono::{DateTime, Utc};

use rollcall_client::{AttendanceWorkflow, AuthWorkflow, BulkUploadWorkflow, PromotionWorkflow};
use rollcall_core::error::AppError;
use rollcall_core::time::SharedClock;
use rollcall_core::types::NotificationId;
use rollcall_notify::activity::ActivityKind;
use rollcall_notify::{NotificationService, SharedStore};
use rollcall_worker::{SharedActivity, SharedToasts};

use crate::output::OutputFormat;

/// Shared state behind the interactive console.
#[derive(Debug)]
pub struct Console {
    /// Output format for listings
    pub format: OutputFormat,
    /// Time source shared with the background driver
    pub clock: SharedClock,
    /// Notification store
    pub store: SharedStore,
    /// Semantic notification helpers
    pub notifications: NotificationService,
    /// Visible toasts
    pub toasts: SharedToasts,
    /// Read-after-activity debounce
    pub activity: SharedActivity,
    /// Sign-in state
    pub auth: AuthWorkflow,
    /// Attendance marking
    pub attendance: AttendanceWorkflow,
    /// Bulk student upload
    pub uploads: BulkUploadWorkflow,
    /// Level promotion
    pub promotions: PromotionWorkflow,
}

impl Console {
    /// Current time on the shared clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Bring the toast manager up to date with the store.
    pub fn pump_toasts(&self) {
        let now = self.now();
        self.toasts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pump(now);
    }

    /// Record one input event.
    pub fn record_activity(&self, kind: ActivityKind) {
        let now = self.now();
        self.activity
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .record(kind, now);
    }

    /// Resolve a full notification id or a unique prefix of one.
    pub fn resolve_notification(&self, input: &str) -> Result<NotificationId, AppError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(AppError::validation("Notification id is required"));
        }

        let matches: Vec<NotificationId> = self
            .store
            .snapshot()
            .into_iter()
            .map(|n| n.id)
            .filter(|id| id.as_str().starts_with(input))
            .collect();

        if let Some(exact) = matches.iter().find(|id| id.as_str() == input) {
            return Ok(exact.clone());
        }
        match matches.len() {
            0 => Err(AppError::not_found(format!("No notification matches '{input}'"))),
            1 => Ok(matches[0].clone()),
            n => Err(AppError::validation(format!(
                "'{input}' is ambiguous ({n} notifications match)"
            ))),
        }
    }
}
