//! Notification dropdown commands and keyboard shortcuts.

use clap::Subcommand;
use serde::Serialize;
use tabled::Tabled;

use rollcall_core::error::AppError;
use rollcall_entity::notification::Notification;
use rollcall_notify::shortcuts::{FocusTarget, KeyChord, ShortcutAction};

use super::FocusArg;
use crate::console::Console;
use crate::output::{self, OutputFormat};

/// Notification subcommands
#[derive(Debug, Subcommand)]
pub enum NotificationCommand {
    /// List notifications, newest first
    List {
        /// Only unread notifications
        #[arg(short, long)]
        unread: bool,
    },
    /// Mark one notification as read
    Read {
        /// Notification id or unique prefix
        id: String,
    },
    /// Mark every notification as read
    ReadAll,
    /// Remove one notification
    Remove {
        /// Notification id or unique prefix
        id: String,
    },
    /// Remove every notification
    Clear,
    /// Open or close the dropdown
    Toggle,
    /// Close the dropdown
    Close,
}

/// Notification display row for table output
#[derive(Debug, Serialize, Tabled)]
struct NotificationRow {
    /// Unread marker
    #[serde(skip)]
    #[tabled(rename = "")]
    marker: String,
    /// Notification ID
    id: String,
    /// Severity
    #[serde(rename = "type")]
    #[tabled(rename = "type")]
    kind: String,
    /// Title
    title: String,
    /// Message
    message: String,
    /// Age
    age: String,
    /// Read flag
    #[tabled(skip)]
    read: bool,
    /// Action affordance
    action: String,
}

impl NotificationRow {
    fn from_notification(n: &Notification, console: &Console) -> Self {
        Self {
            marker: if n.read { String::new() } else { "●".to_string() },
            id: n.id.to_string(),
            kind: format!("{} {}", n.kind.icon(), n.kind),
            title: n.title.clone(),
            message: n.message.clone(),
            age: output::relative_age(n.timestamp, console.now()),
            read: n.read,
            action: n
                .action()
                .map(|(url, text)| format!("{text} → {url}"))
                .unwrap_or_default(),
        }
    }
}

/// Execute notification commands
pub fn execute(
    console: &Console,
    command: &NotificationCommand,
    format: OutputFormat,
) -> Result<(), AppError> {
    let store = &console.store;
    match command {
        NotificationCommand::List { unread } => {
            let rows: Vec<NotificationRow> = store
                .snapshot()
                .iter()
                .filter(|n| !unread || n.is_unread())
                .map(|n| NotificationRow::from_notification(n, console))
                .collect();

            let empty = if *unread {
                "No unread notifications."
            } else {
                "No notifications yet."
            };
            output::print_list(&rows, format, empty);
            if format == OutputFormat::Table && !rows.is_empty() {
                println!("{} unread", store.unread_count());
            }
        }
        NotificationCommand::Read { id } => {
            let id = console.resolve_notification(id)?;
            if store.mark_as_read(&id) {
                output::print_success(&format!("Marked {id} as read"));
            } else {
                output::print_warning(&format!("{id} was already read"));
            }
        }
        NotificationCommand::ReadAll => {
            store.mark_all_as_read();
            output::print_success("All notifications marked as read");
        }
        NotificationCommand::Remove { id } => {
            let id = console.resolve_notification(id)?;
            store
                .remove_notification(&id)
                .ok_or_else(|| AppError::not_found(format!("Notification {id} not found")))?;
            output::print_success(&format!("Removed {id}"));
        }
        NotificationCommand::Clear => {
            store.clear_all();
            output::print_success("All notifications cleared");
        }
        NotificationCommand::Toggle => {
            let open = store.toggle_dropdown();
            output::print_success(if open { "Dropdown opened" } else { "Dropdown closed" });
        }
        NotificationCommand::Close => {
            store.close_dropdown();
            output::print_success("Dropdown closed");
        }
    }
    Ok(())
}

/// Parse a chord such as `ctrl+shift+n` or `cmd+shift+m`.
pub fn parse_chord(input: &str, focus: FocusTarget) -> Result<KeyChord, AppError> {
    let mut chord = KeyChord {
        ctrl: false,
        meta: false,
        shift: false,
        key: '\0',
        focus,
    };

    for part in input.split('+').map(str::trim) {
        match part.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => chord.ctrl = true,
            "cmd" | "meta" | "super" => chord.meta = true,
            "shift" => chord.shift = true,
            key => {
                let mut chars = key.chars();
                match (chars.next(), chars.next(), chord.key) {
                    (Some(c), None, '\0') => chord.key = c.to_ascii_uppercase(),
                    _ => {
                        return Err(AppError::validation(format!("Invalid key chord '{input}'")));
                    }
                }
            }
        }
    }

    if chord.key == '\0' {
        return Err(AppError::validation(format!("Key chord '{input}' has no key")));
    }
    Ok(chord)
}

/// Press a shortcut against the store.
pub fn press_key(console: &Console, chord: &str, focus: FocusArg) -> Result<(), AppError> {
    let focus = match focus {
        FocusArg::Document => FocusTarget::Document,
        FocusArg::Input => FocusTarget::TextInput,
        FocusArg::Textarea => FocusTarget::TextArea,
        FocusArg::Select => FocusTarget::Select,
    };
    let chord = parse_chord(chord, focus)?;

    match ShortcutAction::from_chord(&chord) {
        Some(action) => {
            action.apply(&console.store);
            output::print_success(&format!("{action:?}"));
        }
        None => output::print_warning("No shortcut bound to that key here"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chord_variants() {
        let chord = parse_chord("ctrl+shift+n", FocusTarget::Document).unwrap();
        assert_eq!(chord, KeyChord::ctrl_shift('N'));

        let chord = parse_chord("Cmd+Shift+m", FocusTarget::Document).unwrap();
        assert!(chord.meta && chord.shift && !chord.ctrl);
        assert_eq!(
            ShortcutAction::from_chord(&chord),
            Some(ShortcutAction::MarkAllAsRead)
        );

        let chord = parse_chord("ctrl+shift+c", FocusTarget::TextInput).unwrap();
        assert_eq!(ShortcutAction::from_chord(&chord), None);
    }

    #[test]
    fn test_parse_chord_rejects_garbage() {
        assert!(parse_chord("ctrl+shift", FocusTarget::Document).is_err());
        assert!(parse_chord("ctrl+nm", FocusTarget::Document).is_err());
        assert!(parse_chord("a+b", FocusTarget::Document).is_err());
    }
}
