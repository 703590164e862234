//! Spreadsheet upload of students, with undo.

use std::path::Path;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use tracing::{info, warn};

use rollcall_core::config::upload::UploadConfig;
use rollcall_core::error::AppError;
use rollcall_core::result::AppResult;
use rollcall_entity::action::{ActionKind, UndoHandle};
use rollcall_entity::notification::NotificationKind;
use rollcall_notify::NotificationService;

use super::{UndoOutcome, report_undo_failure};
use crate::api::StudentApi;
use crate::dto::BulkUploadResponse;
use crate::tracker::OptimisticActionTracker;

/// Uploads student spreadsheets and remembers the last one for undo.
#[derive(Debug)]
pub struct BulkUploadWorkflow {
    api: Arc<dyn StudentApi>,
    notifications: NotificationService,
    config: UploadConfig,
    ledger: Mutex<OptimisticActionTracker<()>>,
}

impl BulkUploadWorkflow {
    pub fn new(api: Arc<dyn StudentApi>, notifications: NotificationService, config: UploadConfig) -> Self {
        Self {
            api,
            notifications,
            config,
            ledger: Mutex::new(OptimisticActionTracker::new()),
        }
    }

    fn with_ledger<R>(&self, f: impl FnOnce(&mut OptimisticActionTracker<()>) -> R) -> R {
        let mut guard = self.ledger.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }

    /// Check the file name and size against the upload limits.
    pub fn validate(&self, file_name: &str, size_bytes: u64) -> AppResult<()> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        let allowed = extension.as_deref().is_some_and(|ext| {
            self.config
                .allowed_extensions
                .iter()
                .any(|a| a.trim_start_matches('.').eq_ignore_ascii_case(ext))
        });
        if !allowed {
            let list = self
                .config
                .allowed_extensions
                .iter()
                .map(|e| format!(".{}", e.trim_start_matches('.')))
                .collect::<Vec<_>>()
                .join(", ");
            return Err(AppError::validation(format!(
                "Please select a CSV or Excel file ({list})"
            )));
        }

        if size_bytes > self.config.max_file_size_bytes {
            return Err(AppError::validation(format!(
                "File size must be less than {}MB",
                self.config.max_file_size_bytes / (1024 * 1024)
            )));
        }
        Ok(())
    }

    /// Validate and upload the file at `path`.
    pub async fn upload_file(&self, path: &Path) -> AppResult<BulkUploadResponse> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| AppError::validation(format!("Not a file: {}", path.display())))?
            .to_string();
        let metadata = tokio::fs::metadata(path).await?;
        self.validate(&file_name, metadata.len())?;

        let data = tokio::fs::read(path).await?;
        self.upload(&file_name, Bytes::from(data)).await
    }

    /// Validate and upload an in-memory file.
    pub async fn upload(&self, file_name: &str, data: Bytes) -> AppResult<BulkUploadResponse> {
        self.validate(file_name, data.len() as u64)?;

        let response = match self.api.bulk_upload(file_name, data).await {
            Ok(response) => response,
            Err(e) => {
                warn!(file_name, error = %e, "Bulk upload failed");
                self.notifications.system_error(&e.message);
                return Err(e);
            }
        };

        if response.success {
            if let Some(action_id) = &response.action_id {
                self.with_ledger(|l| l.record((), UndoHandle::Tracked(action_id.clone())));
            }
            self.notifications.bulk_upload_completed(
                response.successful_rows,
                response.failed_rows,
                response.total_rows,
            );
        } else {
            self.notifications.custom(
                NotificationKind::Error,
                "Bulk Upload Failed",
                &format!(
                    "Upload completed with errors: {} of {} rows failed",
                    response.failed_rows, response.total_rows
                ),
                None,
            );
        }

        info!(
            file_name,
            success = response.success,
            total = response.total_rows,
            failed = response.failed_rows,
            "Bulk upload finished"
        );
        Ok(response)
    }

    /// Reverse the last successful upload.
    pub async fn undo(&self) -> AppResult<UndoOutcome> {
        let Some(UndoHandle::Tracked(action_id)) = self.with_ledger(|l| l.take(&())) else {
            return Ok(UndoOutcome::NothingToUndo);
        };

        match self.api.undo_bulk_upload(&action_id).await {
            Ok(response) => {
                self.notifications.undo_completed(
                    "Bulk Upload Undone",
                    &format!(
                        "Successfully removed {} students from the previous upload",
                        response.undone
                    ),
                );
                Ok(UndoOutcome::Undone {
                    kind: ActionKind::BulkUpload,
                    reverted: response.undone,
                })
            }
            Err(e) => {
                report_undo_failure(&self.notifications, ActionKind::BulkUpload, Some(&action_id), &e);
                Err(e)
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        self.with_ledger(|l| l.is_available(&()))
    }
}
