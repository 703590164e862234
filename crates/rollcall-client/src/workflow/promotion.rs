//! Batch level promotion, with undo.

use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use rollcall_core::error::AppError;
use rollcall_core::result::AppResult;
use rollcall_entity::action::{ActionKind, UndoHandle};
use rollcall_notify::NotificationService;

use super::{UndoOutcome, report_undo_failure};
use crate::api::PromotionApi;
use crate::dto::{PromoteRequest, PromoteResponse};
use crate::tracker::OptimisticActionTracker;

/// Promotes students between levels and remembers the last promotion.
#[derive(Debug)]
pub struct PromotionWorkflow {
    api: Arc<dyn PromotionApi>,
    notifications: NotificationService,
    ledger: Mutex<OptimisticActionTracker<()>>,
}

impl PromotionWorkflow {
    pub fn new(api: Arc<dyn PromotionApi>, notifications: NotificationService) -> Self {
        Self {
            api,
            notifications,
            ledger: Mutex::new(OptimisticActionTracker::new()),
        }
    }

    fn with_ledger<R>(&self, f: impl FnOnce(&mut OptimisticActionTracker<()>) -> R) -> R {
        let mut guard = self.ledger.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }

    /// Move every student at `from_level` to `to_level`.
    pub async fn promote(&self, from_level: &str, to_level: &str) -> AppResult<PromoteResponse> {
        if from_level == to_level {
            return Err(AppError::validation(
                "Please select different levels for promotion",
            ));
        }

        let request = PromoteRequest {
            from_level: from_level.to_string(),
            to_level: to_level.to_string(),
        };
        let response = match self.api.promote(&request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(from_level, to_level, error = %e, "Promotion failed");
                self.notifications.system_error(&e.message);
                return Err(e);
            }
        };

        if let Some(action_id) = &response.action_id {
            self.with_ledger(|l| l.record((), UndoHandle::Tracked(action_id.clone())));
        }
        self.notifications
            .batch_promotion_completed(from_level, to_level, response.promoted_count);

        info!(from_level, to_level, promoted = response.promoted_count, "Promotion finished");
        Ok(response)
    }

    /// Reverse the last promotion.
    pub async fn undo(&self) -> AppResult<UndoOutcome> {
        let Some(UndoHandle::Tracked(action_id)) = self.with_ledger(|l| l.take(&())) else {
            return Ok(UndoOutcome::NothingToUndo);
        };

        match self.api.undo_promotion(&action_id).await {
            Ok(response) => {
                self.notifications.undo_completed(
                    "Promotion Undone",
                    &format!(
                        "Successfully undone promotion. {} students reverted.",
                        response.undone
                    ),
                );
                Ok(UndoOutcome::Undone {
                    kind: ActionKind::Promotion,
                    reverted: response.undone,
                })
            }
            Err(e) => {
                report_undo_failure(&self.notifications, ActionKind::Promotion, Some(&action_id), &e);
                Err(e)
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        self.with_ledger(|l| l.is_available(&()))
    }
}
