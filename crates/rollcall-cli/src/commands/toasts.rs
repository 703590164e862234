//! Toast and activity commands.

use serde::Serialize;
use tabled::Tabled;

use rollcall_core::error::AppError;
use rollcall_core::types::NotificationId;
use rollcall_notify::activity::ActivityKind;
use rollcall_notify::toast::ToastView;

use crate::console::Console;
use crate::output::{self, OutputFormat};

/// Toast display row for table output
#[derive(Debug, Serialize, Tabled)]
struct ToastRow {
    /// Notification ID
    id: String,
    /// Lifecycle phase
    phase: String,
    /// Vertical offset in pixels
    offset: u32,
    /// Stacking order
    z: i32,
    /// Severity and title
    title: String,
    /// Message
    message: String,
}

impl From<ToastView> for ToastRow {
    fn from(view: ToastView) -> Self {
        Self {
            id: view.slot.id.to_string(),
            phase: format!("{:?}", view.slot.phase),
            offset: view.slot.offset_px,
            z: view.slot.z_index,
            title: format!("{} {}", view.notification.kind.icon(), view.notification.title),
            message: view.notification.message,
        }
    }
}

/// Render the current toast stack.
pub fn render(console: &Console) -> Vec<ToastView> {
    console.pump_toasts();
    let toasts = console.toasts.lock().unwrap_or_else(|e| e.into_inner());
    console.store.with(|store| toasts.render(store))
}

/// List mounted toasts, newest first.
pub fn list(console: &Console, format: OutputFormat) {
    let rows: Vec<ToastRow> = render(console).into_iter().map(ToastRow::from).collect();
    output::print_list(&rows, format, "No active toasts.");
}

fn resolve_toast(console: &Console, input: &str) -> Result<NotificationId, AppError> {
    let active = console
        .toasts
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .active_ids();
    let matches: Vec<NotificationId> = active
        .into_iter()
        .filter(|id| id.as_str().starts_with(input.trim()))
        .collect();

    match matches.as_slice() {
        [] => Err(AppError::not_found(format!("No active toast matches '{input}'"))),
        [only] => Ok(only.clone()),
        _ => Err(AppError::validation(format!("'{input}' matches several toasts"))),
    }
}

/// Dismiss a toast early.
pub fn dismiss(console: &Console, id: &str) -> Result<(), AppError> {
    let id = resolve_toast(console, id)?;
    let now = console.now();
    let dismissed = console
        .toasts
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .dismiss(&id, now);

    if dismissed {
        output::print_success(&format!("Dismissed toast {id}"));
    } else {
        output::print_warning(&format!("Toast {id} is already closing"));
    }
    Ok(())
}

/// Click a toast: its notification becomes read and the toast closes.
pub fn click(console: &Console, id: &str) -> Result<(), AppError> {
    let id = resolve_toast(console, id)?;
    let now = console.now();
    console
        .toasts
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .click(&id, &console.store, now);

    output::print_success(&format!("Opened {id}"));
    Ok(())
}

/// Report an input event to the activity monitor.
pub fn activity(console: &Console, kind: ActivityKind) {
    console.record_activity(kind);
    output::print_success(&format!("Recorded {kind:?} activity"));
}
