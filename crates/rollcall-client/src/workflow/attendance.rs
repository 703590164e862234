//! Attendance marking with undo.

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use rollcall_core::result::AppResult;
use rollcall_core::types::StudentId;
use rollcall_entity::action::{ActionKind, UndoHandle};
use rollcall_entity::attendance::{AttendanceKey, AttendanceTarget, AttendeeKind, StudentRef};
use rollcall_entity::notification::NotificationKind;
use rollcall_notify::NotificationService;

use super::{UndoOutcome, report_undo_failure};
use crate::api::AttendanceApi;
use crate::dto::{MarkAllResponse, MarkMemberRequest};
use crate::tracker::OptimisticActionTracker;

/// Marks attendance for the selected date and keeps the undo ledger for it.
#[derive(Debug)]
pub struct AttendanceWorkflow {
    api: Arc<dyn AttendanceApi>,
    notifications: NotificationService,
    ledger: Mutex<OptimisticActionTracker<AttendanceKey>>,
}

impl AttendanceWorkflow {
    /// Create a workflow working on `date`.
    pub fn new(
        api: Arc<dyn AttendanceApi>,
        notifications: NotificationService,
        date: NaiveDate,
    ) -> Self {
        Self {
            api,
            notifications,
            ledger: Mutex::new(OptimisticActionTracker::scoped(date)),
        }
    }

    fn with_ledger<R>(&self, f: impl FnOnce(&mut OptimisticActionTracker<AttendanceKey>) -> R) -> R {
        let mut guard = self.ledger.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }

    /// The date actions apply to.
    pub fn selected_date(&self) -> NaiveDate {
        self.with_ledger(|l| l.scope().copied())
            .unwrap_or_else(|| chrono::Utc::now().date_naive())
    }

    /// Move to another date. Undo records of the previous date are dropped.
    pub fn select_date(&self, date: NaiveDate) -> usize {
        let dropped = self.with_ledger(|l| l.set_scope(date));
        info!(date = %date, dropped, "Selected attendance date");
        dropped
    }

    /// Mark one member present or absent on the selected date.
    pub async fn mark_member(&self, student: &StudentRef, is_present: bool) -> AppResult<UndoHandle> {
        let date = self.selected_date();
        let request = MarkMemberRequest {
            student_id: student.id,
            is_present,
        };

        let response = match self.api.mark_member(date, &request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(date = %date, student_id = %student.id, error = %e, "Failed to mark attendance");
                self.notifications.system_error(&e.message);
                return Err(e);
            }
        };

        let handle = UndoHandle::from_response(response.action_id);
        self.with_ledger(|l| l.record(AttendanceKey::member(date, student.id), handle.clone()));

        if is_present {
            self.notifications
                .attendance_marked(&student.full_name, date, AttendeeKind::Member);
        } else {
            self.notifications.custom(
                NotificationKind::Info,
                "Member Attendance Marked",
                &format!("{} has been marked as absent for {date}.", student.full_name),
                None,
            );
        }

        debug!(date = %date, student_id = %student.id, ?handle, "Marked member");
        Ok(handle)
    }

    /// Mark every member present on the selected date.
    pub async fn mark_all_present(&self) -> AppResult<MarkAllResponse> {
        let date = self.selected_date();

        let response = match self.api.mark_all(date).await {
            Ok(response) => response,
            Err(e) => {
                warn!(date = %date, error = %e, "Failed to mark all present");
                self.notifications.system_error(&e.message);
                return Err(e);
            }
        };

        if let Some(action_id) = &response.action_id {
            self.with_ledger(|l| {
                l.record(AttendanceKey::all(date), UndoHandle::Tracked(action_id.clone()))
            });
        }

        self.notifications.custom(
            NotificationKind::Success,
            "Attendance Marked",
            &format!("{} members marked present for {date}.", response.created),
            None,
        );
        info!(date = %date, created = response.created, "Marked all members present");
        Ok(response)
    }

    /// Reverse the last mark of `student_id` on the selected date.
    ///
    /// Members adopted from the present listing have no action id and are
    /// unmarked by identity instead.
    pub async fn undo_member(&self, student_id: StudentId) -> AppResult<UndoOutcome> {
        let date = self.selected_date();
        let Some(handle) = self.with_ledger(|l| l.take(&AttendanceKey::member(date, student_id)))
        else {
            return Ok(UndoOutcome::NothingToUndo);
        };

        let result = match &handle {
            UndoHandle::Tracked(action_id) => {
                self.api.undo_member(action_id).await.map(|r| r.undone.max(1))
            }
            UndoHandle::NoActionAvailable => {
                self.api.unmark_member(date, student_id).await.map(|_| 1)
            }
        };

        match result {
            Ok(reverted) => {
                self.notifications.undo_completed(
                    "Attendance Undone",
                    &format!("Attendance for student {student_id} on {date} was reverted."),
                );
                Ok(UndoOutcome::Undone {
                    kind: ActionKind::MarkMember,
                    reverted,
                })
            }
            Err(e) => {
                report_undo_failure(&self.notifications, ActionKind::MarkMember, handle.action_id(), &e);
                Err(e)
            }
        }
    }

    /// Reverse the last mark-all on the selected date.
    pub async fn undo_mark_all(&self) -> AppResult<UndoOutcome> {
        let date = self.selected_date();
        let Some(UndoHandle::Tracked(action_id)) =
            self.with_ledger(|l| l.take(&AttendanceKey::all(date)))
        else {
            return Ok(UndoOutcome::NothingToUndo);
        };

        match self.api.undo_mark_all(&action_id).await {
            Ok(response) => {
                self.notifications.undo_completed(
                    "Mark All Undone",
                    &format!("{} attendance records removed for {date}.", response.undone),
                );
                Ok(UndoOutcome::Undone {
                    kind: ActionKind::MarkAll,
                    reverted: response.undone,
                })
            }
            Err(e) => {
                report_undo_failure(&self.notifications, ActionKind::MarkAll, Some(&action_id), &e);
                Err(e)
            }
        }
    }

    /// Adopt members already marked present on the selected date so they
    /// can be unmarked. Returns how many were adopted.
    pub async fn adopt_marked(&self) -> AppResult<usize> {
        let date = self.selected_date();
        let present = self.api.members_present(date).await?;

        let adopted = self.with_ledger(|l| {
            present
                .iter()
                .filter(|m| l.adopt(AttendanceKey::member(date, m.id)))
                .count()
        });
        debug!(date = %date, listed = present.len(), adopted, "Adopted existing marks");
        Ok(adopted)
    }

    /// Whether the last mark of `student_id` can be undone.
    pub fn can_undo_member(&self, student_id: StudentId) -> bool {
        let date = self.selected_date();
        self.with_ledger(|l| l.is_available(&AttendanceKey::member(date, student_id)))
    }

    /// Whether the last mark-all can be undone.
    pub fn can_undo_mark_all(&self) -> bool {
        let date = self.selected_date();
        self.with_ledger(|l| l.is_available(&AttendanceKey::all(date)))
    }

    /// Live undo records, members sorted by id.
    pub fn pending(&self) -> Vec<(AttendanceKey, UndoHandle)> {
        let mut records: Vec<_> =
            self.with_ledger(|l| l.iter().map(|(k, h)| (*k, h.clone())).collect());
        records.sort_by_key(|(k, _)| match k.target {
            AttendanceTarget::AllMembers => (0, 0),
            AttendanceTarget::Member(id) => (1, id.0),
        });
        records
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use rollcall_core::error::{AppError, ErrorKind};
    use rollcall_core::types::ActionId;

    use super::*;
    use crate::dto::{MarkMemberResponse, PresentMember, UndoResponse};
    use crate::workflow::fakes::{CallLog, notifications};

    #[derive(Debug, Default)]
    struct FakeAttendance {
        log: CallLog,
        fail_marks: bool,
        fail_undo: bool,
        omit_action_id: bool,
        present: Vec<PresentMember>,
    }

    #[async_trait]
    impl AttendanceApi for FakeAttendance {
        async fn mark_member(
            &self,
            date: NaiveDate,
            request: &MarkMemberRequest,
        ) -> AppResult<MarkMemberResponse> {
            self.log.push(format!("mark {date} {} {}", request.student_id, request.is_present));
            if self.fail_marks {
                return Err(AppError::network("connection reset"));
            }
            Ok(MarkMemberResponse {
                action_id: (!self.omit_action_id)
                    .then(|| ActionId::new(format!("m-{date}-{}", request.student_id))),
                message: None,
            })
        }

        async fn mark_all(&self, date: NaiveDate) -> AppResult<MarkAllResponse> {
            self.log.push(format!("mark-all {date}"));
            Ok(MarkAllResponse {
                created: 12,
                action_id: Some(ActionId::new(format!("all-{date}"))),
            })
        }

        async fn undo_member(&self, action_id: &ActionId) -> AppResult<UndoResponse> {
            self.log.push(format!("undo-member {action_id}"));
            if self.fail_undo {
                return Err(AppError::external_service("Action already undone"));
            }
            Ok(UndoResponse { undone: 1 })
        }

        async fn undo_mark_all(&self, action_id: &ActionId) -> AppResult<UndoResponse> {
            self.log.push(format!("undo-all {action_id}"));
            if self.fail_undo {
                return Err(AppError::external_service("Action already undone"));
            }
            Ok(UndoResponse { undone: 12 })
        }

        async fn unmark_member(&self, date: NaiveDate, student_id: StudentId) -> AppResult<()> {
            self.log.push(format!("unmark {date} {student_id}"));
            Ok(())
        }

        async fn members_present(&self, date: NaiveDate) -> AppResult<Vec<PresentMember>> {
            self.log.push(format!("present {date}"));
            Ok(self.present.clone())
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn ada() -> StudentRef {
        StudentRef::new(StudentId(7), "Ada Obi")
    }

    fn workflow(api: FakeAttendance) -> (AttendanceWorkflow, Arc<FakeAttendance>) {
        let api = Arc::new(api);
        let wf = AttendanceWorkflow::new(api.clone(), notifications(), day(1));
        (wf, api)
    }

    #[tokio::test]
    async fn test_mark_then_undo_uses_action_id() {
        let (wf, api) = workflow(FakeAttendance::default());

        let handle = wf.mark_member(&ada(), true).await.unwrap();
        assert_eq!(handle, UndoHandle::Tracked(ActionId::new("m-2025-01-01-7")));
        assert!(wf.can_undo_member(StudentId(7)));

        let outcome = wf.undo_member(StudentId(7)).await.unwrap();
        assert!(outcome.is_undone());
        assert!(!wf.can_undo_member(StudentId(7)));
        assert_eq!(
            api.log.calls(),
            vec!["mark 2025-01-01 7 true", "undo-member m-2025-01-01-7"]
        );

        let titles: Vec<_> = wf.notifications.store().snapshot().into_iter().map(|n| n.title).collect();
        assert_eq!(titles, vec!["Attendance Undone", "Member Attendance Marked"]);
    }

    #[tokio::test]
    async fn test_failed_mark_creates_no_record() {
        let (wf, _) = workflow(FakeAttendance {
            fail_marks: true,
            ..Default::default()
        });

        let err = wf.mark_member(&ada(), true).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Network);
        assert!(!wf.can_undo_member(StudentId(7)));

        let latest = wf.notifications.store().snapshot().remove(0);
        assert_eq!(latest.title, "System Error");
    }

    #[tokio::test]
    async fn test_undo_clears_record_even_when_server_fails() {
        let (wf, api) = workflow(FakeAttendance {
            fail_undo: true,
            ..Default::default()
        });
        wf.mark_all_present().await.unwrap();
        assert!(wf.can_undo_mark_all());

        let err = wf.undo_mark_all().await.unwrap_err();
        assert_eq!(err.message, "Action already undone");
        assert!(!wf.can_undo_mark_all());

        let latest = wf.notifications.store().snapshot().remove(0);
        assert_eq!(latest.title, "Undo Failed");
        assert!(latest.wants_toast());

        assert_eq!(wf.undo_mark_all().await.unwrap(), UndoOutcome::NothingToUndo);
        assert_eq!(api.log.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_switching_date_drops_records() {
        let (wf, _) = workflow(FakeAttendance::default());
        wf.mark_member(&ada(), true).await.unwrap();
        wf.mark_all_present().await.unwrap();

        assert_eq!(wf.select_date(day(2)), 2);
        assert!(!wf.can_undo_member(StudentId(7)));
        assert!(!wf.can_undo_mark_all());
        assert_eq!(wf.undo_member(StudentId(7)).await.unwrap(), UndoOutcome::NothingToUndo);

        wf.select_date(day(1));
        assert!(!wf.can_undo_member(StudentId(7)));
    }

    #[tokio::test]
    async fn test_adopted_members_unmark_by_identity() {
        let (wf, api) = workflow(FakeAttendance {
            present: vec![
                PresentMember {
                    id: StudentId(7),
                    full_name: "Ada Obi".into(),
                    code: None,
                    level: None,
                },
                PresentMember {
                    id: StudentId(8),
                    full_name: "Bo Eze".into(),
                    code: None,
                    level: None,
                },
            ],
            ..Default::default()
        });
        wf.mark_member(&ada(), true).await.unwrap();

        assert_eq!(wf.adopt_marked().await.unwrap(), 1);
        assert_eq!(wf.pending().len(), 2);

        wf.undo_member(StudentId(8)).await.unwrap();
        wf.undo_member(StudentId(7)).await.unwrap();
        let calls = api.log.calls();
        assert!(calls.contains(&"unmark 2025-01-01 8".to_string()));
        assert!(calls.contains(&"undo-member m-2025-01-01-7".to_string()));
    }

    #[tokio::test]
    async fn test_mark_without_action_id_falls_back_to_unmark() {
        let (wf, api) = workflow(FakeAttendance {
            omit_action_id: true,
            ..Default::default()
        });
        let handle = wf.mark_member(&ada(), false).await.unwrap();
        assert_eq!(handle, UndoHandle::NoActionAvailable);

        wf.undo_member(StudentId(7)).await.unwrap();
        assert_eq!(api.log.calls().last().unwrap(), "unmark 2025-01-01 7");
    }
}
