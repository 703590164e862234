//! Attendance marking and attendance undo commands.

use chrono::NaiveDate;

use rollcall_client::UndoOutcome;
use rollcall_core::error::AppError;
use rollcall_core::types::StudentId;
use rollcall_entity::action::UndoHandle;
use rollcall_entity::attendance::StudentRef;

use crate::console::Console;
use crate::output;

/// Switch the attendance date.
pub fn select_date(console: &Console, date: NaiveDate) {
    let dropped = console.attendance.select_date(date);
    output::print_success(&format!("Attendance date set to {date}"));
    if dropped > 0 {
        output::print_warning(&format!("{dropped} undo record(s) for the previous date discarded"));
    }
}

/// Mark one member.
pub async fn mark(
    console: &Console,
    student_id: StudentId,
    name: Option<String>,
    is_present: bool,
) -> Result<(), AppError> {
    let name = name.unwrap_or_else(|| format!("Student {student_id}"));
    let student = StudentRef::new(student_id, name);
    let handle = console.attendance.mark_member(&student, is_present).await?;

    let state = if is_present { "present" } else { "absent" };
    output::print_success(&format!(
        "{} marked {state} for {}",
        student.full_name,
        console.attendance.selected_date()
    ));
    if let UndoHandle::NoActionAvailable = handle {
        output::print_warning("The server returned no action id; undo will unmark by identity");
    }
    Ok(())
}

/// Mark every member present.
pub async fn mark_all(console: &Console) -> Result<(), AppError> {
    let response = console.attendance.mark_all_present().await?;
    output::print_success(&format!("{} members marked present", response.created));
    Ok(())
}

/// Adopt members the server already lists as present.
pub async fn adopt(console: &Console) -> Result<(), AppError> {
    let adopted = console.attendance.adopt_marked().await?;
    output::print_success(&format!("{adopted} existing mark(s) can now be undone"));
    Ok(())
}

/// Undo the last mark of one member.
pub async fn undo_member(console: &Console, student_id: StudentId) -> Result<(), AppError> {
    let outcome = console.attendance.undo_member(student_id).await?;
    report(outcome, &format!("No undoable mark for student {student_id}"));
    Ok(())
}

/// Undo the last mark-all.
pub async fn undo_all(console: &Console) -> Result<(), AppError> {
    let outcome = console.attendance.undo_mark_all().await?;
    report(outcome, "No mark-all to undo for this date");
    Ok(())
}

/// Print the result of an undo.
pub(crate) fn report(outcome: UndoOutcome, nothing: &str) {
    match outcome {
        UndoOutcome::Undone { kind, reverted } => {
            output::print_success(&format!("Undid {} ({reverted} reverted)", kind.label()));
        }
        UndoOutcome::NothingToUndo => output::print_warning(nothing),
    }
}
