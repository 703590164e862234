//! Semantic notification helpers.
//!
//! Flows call these as side effects of API calls instead of building
//! drafts by hand, so wording and navigation targets stay consistent.

use chrono::NaiveDate;
use serde_json::{Value, json};

use rollcall_core::types::StudentId;
use rollcall_entity::attendance::AttendeeKind;
use rollcall_entity::notification::{Notification, NotificationDraft, NotificationKind};

use crate::shared::SharedStore;

const STUDENTS_URL: &str = "/secretary/students";
const ATTENDANCE_URL: &str = "/secretary/attendance";

/// Which kind of email was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailKind {
    /// Sent when a student joins.
    Welcome,
    /// Attendance summary.
    Attendance,
}

impl EmailKind {
    fn label(&self) -> &'static str {
        match self {
            Self::Welcome => "Welcome",
            Self::Attendance => "Attendance",
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::Attendance => "attendance",
        }
    }
}

/// Adds well-known notifications to the shared store.
#[derive(Debug, Clone)]
pub struct NotificationService {
    store: SharedStore,
}

impl NotificationService {
    /// Create a service writing into `store`.
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// The store this service writes into.
    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn student_added(&self, student_name: &str, student_id: StudentId) -> Notification {
        self.add(
            NotificationDraft::new(
                NotificationKind::Success,
                "New Student Added",
                format!("{student_name} has been successfully added to the system."),
            )
            .with_action(STUDENTS_URL, "View Students")
            .with_metadata(json!({ "studentId": student_id.0, "studentName": student_name })),
        )
    }

    pub fn student_updated(&self, student_name: &str, student_id: StudentId) -> Notification {
        self.add(
            NotificationDraft::new(
                NotificationKind::Info,
                "Student Updated",
                format!("{student_name}'s information has been updated."),
            )
            .with_action(STUDENTS_URL, "View Students")
            .with_metadata(json!({ "studentId": student_id.0, "studentName": student_name })),
        )
    }

    pub fn attendance_marked(
        &self,
        student_name: &str,
        date: NaiveDate,
        kind: AttendeeKind,
    ) -> Notification {
        let kind_str = match kind {
            AttendeeKind::Member => "member",
            AttendeeKind::Visitor => "visitor",
        };
        self.add(
            NotificationDraft::new(
                NotificationKind::Success,
                format!("{} Attendance Marked", kind.label()),
                format!("{student_name} has been marked as present for {date}."),
            )
            .with_action(ATTENDANCE_URL, "View Attendance")
            .with_metadata(json!({
                "studentName": student_name,
                "date": date.to_string(),
                "type": kind_str,
            })),
        )
    }

    pub fn attendance_closed(&self, date: NaiveDate) -> Notification {
        self.add(
            NotificationDraft::new(
                NotificationKind::Info,
                "Attendance Closed",
                format!("Attendance marking has been closed for {date}."),
            )
            .with_action(ATTENDANCE_URL, "View Attendance")
            .with_metadata(json!({ "date": date.to_string() })),
        )
    }

    pub fn attendance_reminder(&self, date: NaiveDate, unmarked_count: usize) -> Notification {
        self.add(
            NotificationDraft::new(
                NotificationKind::Warning,
                "Attendance Reminder",
                format!("{unmarked_count} members still need to be marked for {date}."),
            )
            .with_action(ATTENDANCE_URL, "Mark Attendance")
            .with_metadata(json!({ "date": date.to_string(), "unmarkedCount": unmarked_count })),
        )
    }

    pub fn system_maintenance(&self, scheduled_time: &str) -> Notification {
        self.add(
            NotificationDraft::new(
                NotificationKind::Warning,
                "System Maintenance",
                format!(
                    "Scheduled maintenance will occur at {scheduled_time}. Please save your work."
                ),
            )
            .with_metadata(json!({ "scheduledTime": scheduled_time })),
        )
    }

    pub fn system_error(&self, error: &str) -> Notification {
        self.add(
            NotificationDraft::new(
                NotificationKind::Error,
                "System Error",
                format!("An error occurred: {error}"),
            )
            .with_metadata(json!({ "error": error })),
        )
    }

    pub fn email_sent(&self, recipient: &str, kind: EmailKind) -> Notification {
        self.add(
            NotificationDraft::new(
                NotificationKind::Success,
                "Email Sent",
                format!("{} email sent to {recipient}.", kind.label()),
            )
            .with_metadata(json!({ "recipient": recipient, "type": kind.as_str() })),
        )
    }

    pub fn email_failed(&self, recipient: &str, error: &str) -> Notification {
        self.add(
            NotificationDraft::new(
                NotificationKind::Error,
                "Email Failed",
                format!("Failed to send email to {recipient}: {error}"),
            )
            .with_metadata(json!({ "recipient": recipient, "error": error })),
        )
    }

    pub fn data_exported(&self, format: &str, record_count: usize) -> Notification {
        self.add(
            NotificationDraft::new(
                NotificationKind::Success,
                "Data Export Complete",
                format!("{record_count} records exported in {format} format."),
            )
            .with_metadata(json!({ "format": format, "recordCount": record_count })),
        )
    }

    pub fn batch_promotion_completed(
        &self,
        from_level: &str,
        to_level: &str,
        student_count: u64,
    ) -> Notification {
        self.add(
            NotificationDraft::new(
                NotificationKind::Success,
                "Batch Promotion Complete",
                format!("{student_count} students promoted from {from_level} to {to_level}."),
            )
            .with_metadata(json!({
                "fromLevel": from_level,
                "toLevel": to_level,
                "studentCount": student_count,
            })),
        )
    }

    /// Bulk upload finished; any failed row turns it into a warning.
    pub fn bulk_upload_completed(&self, successful: u64, failed: u64, total: u64) -> Notification {
        let draft = if failed == 0 {
            NotificationDraft::new(
                NotificationKind::Success,
                "Bulk Upload Complete",
                format!("Successfully uploaded {successful} out of {total} students"),
            )
        } else {
            NotificationDraft::new(
                NotificationKind::Warning,
                "Bulk Upload Completed With Errors",
                format!("Uploaded {successful} out of {total} students; {failed} rows failed"),
            )
        };
        self.add(
            draft
                .with_action(STUDENTS_URL, "View Students")
                .with_metadata(json!({
                    "successfulRows": successful,
                    "failedRows": failed,
                    "totalRows": total,
                })),
        )
    }

    /// A compensating request succeeded.
    pub fn undo_completed(&self, title: &str, message: &str) -> Notification {
        self.add(NotificationDraft::new(NotificationKind::Success, title, message))
    }

    /// The only helper that interrupts the user with a toast.
    pub fn critical_error(&self, title: &str, message: &str, metadata: Option<Value>) -> Notification {
        let mut draft =
            NotificationDraft::new(NotificationKind::Error, title, message).with_toast(true);
        if let Some(metadata) = metadata {
            draft = draft.with_metadata(metadata);
        }
        self.add(draft)
    }

    pub fn custom(
        &self,
        kind: NotificationKind,
        title: &str,
        message: &str,
        metadata: Option<Value>,
    ) -> Notification {
        let mut draft = NotificationDraft::new(kind, title, message);
        if let Some(metadata) = metadata {
            draft = draft.with_metadata(metadata);
        }
        self.add(draft)
    }

    fn add(&self, draft: NotificationDraft) -> Notification {
        self.store.add_notification(draft)
    }
}
