//! Use cases that combine API calls, the undo ledger, and notifications.
//!
//! Each workflow reports successes and failures through the notification
//! store and keeps its ledger in step with the responses it receives.

pub mod attendance;
pub mod auth;
pub mod bulk_upload;
pub mod promotion;

pub use attendance::AttendanceWorkflow;
pub use auth::AuthWorkflow;
pub use bulk_upload::BulkUploadWorkflow;
pub use promotion::PromotionWorkflow;

use serde_json::json;
use tracing::error;

use rollcall_core::error::AppError;
use rollcall_core::types::ActionId;
use rollcall_entity::action::ActionKind;
use rollcall_notify::NotificationService;

/// Result of an undo request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoOutcome {
    /// The server reverted the action.
    Undone {
        /// Action kind reverted.
        kind: ActionKind,
        /// Records the server reports as reverted.
        reverted: u64,
    },
    /// No record existed for the context.
    NothingToUndo,
}

impl UndoOutcome {
    /// Whether a compensating request was made and succeeded.
    pub fn is_undone(&self) -> bool {
        matches!(self, Self::Undone { .. })
    }
}

/// Surface a failed compensating request as a toast-worthy error.
fn report_undo_failure(
    notifications: &NotificationService,
    kind: ActionKind,
    action_id: Option<&ActionId>,
    err: &AppError,
) {
    error!(kind = %kind, action_id = ?action_id, error = %err, "Undo request failed");
    notifications.critical_error(
        "Undo Failed",
        &format!("Failed to undo {}: {}", kind.label(), err.message),
        Some(json!({
            "kind": kind.as_str(),
            "actionId": action_id.map(|id| id.as_str()),
        })),
    );
}

#[cfg(test)]
pub(crate) mod fakes {
    //! In-memory API fakes shared by workflow tests.

    use std::sync::{Arc, Mutex};

    use rollcall_core::time::ManualClock;
    use rollcall_notify::persistence::NoopPersistence;
    use rollcall_notify::{NotificationService, NotificationStore, SharedStore};

    /// Calls made against a fake, in order.
    #[derive(Debug, Default)]
    pub struct CallLog(Mutex<Vec<String>>);

    impl CallLog {
        pub fn push(&self, call: impl Into<String>) {
            self.0.lock().unwrap().push(call.into());
        }

        pub fn calls(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    pub fn notifications() -> NotificationService {
        NotificationService::new(SharedStore::new(NotificationStore::hydrate(
            Arc::new(ManualClock::starting_now()),
            Arc::new(NoopPersistence),
        )))
    }
}
