//! Sign-in and status commands.

use dialoguer::Password;
use serde::Serialize;

use rollcall_core::error::AppError;
use rollcall_entity::action::UndoHandle;
use rollcall_entity::attendance::AttendanceTarget;
use rollcall_entity::auth::Role;

use crate::console::Console;
use crate::output::{self, OutputFormat};

/// Sign in, prompting for the password when it was not given.
pub async fn login(
    console: &Console,
    email: &str,
    role: Option<Role>,
    password: Option<String>,
) -> Result<(), AppError> {
    let password = match password {
        Some(password) => password,
        None => prompt_password().await?,
    };

    let user = console.auth.login(email, &password, role).await?;
    let name = user.full_name.as_deref().unwrap_or(&user.email);
    output::print_success(&format!("Signed in as {} ({})", name, user.role.label()));
    Ok(())
}

async fn prompt_password() -> Result<String, AppError> {
    tokio::task::spawn_blocking(|| Password::new().with_prompt("Password").interact())
        .await
        .map_err(|e| AppError::internal(format!("Password prompt task failed: {}", e)))?
        .map_err(|e| AppError::internal(format!("Failed to read password: {}", e)))
}

/// Sign out.
pub fn logout(console: &Console) {
    console.auth.logout();
    output::print_success("Signed out");
}

/// Console state summary
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusReport {
    signed_in_as: Option<String>,
    date: String,
    notifications: usize,
    unread: usize,
    dropdown_open: bool,
    toasts: usize,
    undo_mark_all: bool,
    undo_members: Vec<String>,
    undo_upload: bool,
    undo_promotion: bool,
}

/// Print session, store, and undo state.
pub fn status(console: &Console, format: OutputFormat) {
    let undo_members = console
        .attendance
        .pending()
        .into_iter()
        .filter_map(|(key, handle)| match key.target {
            AttendanceTarget::Member(id) => Some(match handle {
                UndoHandle::Tracked(_) => id.to_string(),
                UndoHandle::NoActionAvailable => format!("{id} (unmark)"),
            }),
            AttendanceTarget::AllMembers => None,
        })
        .collect();

    let report = StatusReport {
        signed_in_as: console
            .auth
            .current_user()
            .map(|u| format!("{} ({})", u.email, u.role.label())),
        date: console.attendance.selected_date().to_string(),
        notifications: console.store.snapshot().len(),
        unread: console.store.unread_count(),
        dropdown_open: console.store.is_open(),
        toasts: console.toasts.lock().unwrap_or_else(|e| e.into_inner()).len(),
        undo_mark_all: console.attendance.can_undo_mark_all(),
        undo_members,
        undo_upload: console.uploads.can_undo(),
        undo_promotion: console.promotions.can_undo(),
    };

    match format {
        OutputFormat::Json => output::print_item(&report, format),
        OutputFormat::Table => {
            println!("Session:");
            output::print_kv(
                "Signed in as",
                report.signed_in_as.as_deref().unwrap_or("(not signed in)"),
            );
            output::print_kv("Attendance date", &report.date);
            println!("Notifications:");
            output::print_kv("Total", &report.notifications.to_string());
            output::print_kv("Unread", &report.unread.to_string());
            output::print_kv("Dropdown", if report.dropdown_open { "open" } else { "closed" });
            output::print_kv("Active toasts", &report.toasts.to_string());
            println!("Undo available:");
            output::print_kv("Mark all", yes_no(report.undo_mark_all));
            output::print_kv(
                "Members",
                &if report.undo_members.is_empty() {
                    "none".to_string()
                } else {
                    report.undo_members.join(", ")
                },
            );
            output::print_kv("Bulk upload", yes_no(report.undo_upload));
            output::print_kv("Promotion", yes_no(report.undo_promotion));
        }
    }
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
