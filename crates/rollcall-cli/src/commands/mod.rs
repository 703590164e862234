//! Console command definitions and dispatch.

pub mod admin;
pub mod attendance;
pub mod notifications;
pub mod session;
pub mod toasts;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

use rollcall_core::error::AppError;
use rollcall_core::types::StudentId;
use rollcall_entity::auth::Role;
use rollcall_notify::activity::ActivityKind;

use crate::console::Console;
use crate::output::OutputFormat;

/// Rollcall: attendance administration console
#[derive(Debug, Parser)]
#[command(name = "rollcall", version, about, long_about = None)]
pub struct Cli {
    /// Path to an additional configuration file
    #[arg(short, long, env = "ROLLCALL_CONFIG")]
    pub config: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Attendance date to start on (defaults to today)
    #[arg(short, long)]
    pub date: Option<NaiveDate>,
}

/// One line typed into the console.
#[derive(Debug, Parser)]
#[command(name = "", no_binary_name = true, disable_version_flag = true)]
pub struct ConsoleLine {
    /// Command to execute
    #[command(subcommand)]
    pub command: ConsoleCommand,
}

/// Console commands
#[derive(Debug, Subcommand)]
pub enum ConsoleCommand {
    /// Sign in to the API
    Login {
        /// Account email
        email: String,
        /// Required account role
        #[arg(short, long, value_enum)]
        role: Option<RoleArg>,
        /// Password (prompted when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Sign out
    Logout,
    /// Notification store operations
    #[command(subcommand, visible_alias = "n")]
    Notifications(notifications::NotificationCommand),
    /// Press a keyboard shortcut, e.g. `ctrl+shift+n`
    Key {
        /// Chord such as ctrl+shift+m or cmd+shift+c
        chord: String,
        /// Element holding focus
        #[arg(long, value_enum, default_value = "document")]
        focus: FocusArg,
    },
    /// Show active toasts
    Toasts,
    /// Dismiss a toast
    Dismiss {
        /// Notification id or unique prefix
        id: String,
    },
    /// Click a toast (marks its notification as read)
    Click {
        /// Notification id or unique prefix
        id: String,
    },
    /// Report user activity
    Activity {
        /// Kind of input
        #[arg(value_enum, default_value = "mouse")]
        kind: ActivityArg,
    },
    /// Select the attendance date
    Date {
        /// Date as YYYY-MM-DD
        date: NaiveDate,
    },
    /// Mark one member present (or absent)
    Mark {
        /// Student id
        student_id: StudentId,
        /// Display name used in notifications
        #[arg(short, long)]
        name: Option<String>,
        /// Mark absent instead of present
        #[arg(long)]
        absent: bool,
    },
    /// Mark every member present
    MarkAll,
    /// Adopt members already marked present so they can be unmarked
    Adopt,
    /// Undo the last action of a kind
    #[command(subcommand)]
    Undo(UndoCommand),
    /// Upload a spreadsheet of students
    Upload {
        /// Path to a .csv, .xls or .xlsx file
        path: PathBuf,
    },
    /// Promote every student from one level to another
    Promote {
        /// Current level
        from: String,
        /// Target level
        to: String,
    },
    /// Show session, store, and undo state
    Status,
    /// Leave the console
    #[command(visible_alias = "exit")]
    Quit,
}

/// Undo targets
#[derive(Debug, Subcommand)]
pub enum UndoCommand {
    /// Last mark of one member on the selected date
    Member {
        /// Student id
        student_id: StudentId,
    },
    /// Last mark-all on the selected date
    All,
    /// Last bulk upload
    Upload,
    /// Last promotion
    Promotion,
}

/// Role accepted by `login --role`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    Secretary,
    SuperAdmin,
}

impl From<RoleArg> for Role {
    fn from(value: RoleArg) -> Self {
        match value {
            RoleArg::Secretary => Role::Secretary,
            RoleArg::SuperAdmin => Role::SuperAdmin,
        }
    }
}

/// Input kind accepted by `activity`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ActivityArg {
    Mouse,
    Keyboard,
    Scroll,
    Touch,
}

impl From<ActivityArg> for ActivityKind {
    fn from(value: ActivityArg) -> Self {
        match value {
            ActivityArg::Mouse => ActivityKind::Mouse,
            ActivityArg::Keyboard => ActivityKind::Keyboard,
            ActivityArg::Scroll => ActivityKind::Scroll,
            ActivityArg::Touch => ActivityKind::Touch,
        }
    }
}

/// Focus target accepted by `key --focus`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FocusArg {
    Document,
    Input,
    Textarea,
    Select,
}

/// Whether the console keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

impl Console {
    /// Execute one console command
    pub async fn execute(&self, command: ConsoleCommand) -> Result<Flow, AppError> {
        let format = self.format;
        match command {
            ConsoleCommand::Login {
                email,
                role,
                password,
            } => session::login(self, &email, role.map(Role::from), password).await?,
            ConsoleCommand::Logout => session::logout(self),
            ConsoleCommand::Status => session::status(self, format),
            ConsoleCommand::Notifications(cmd) => notifications::execute(self, &cmd, format)?,
            ConsoleCommand::Key { chord, focus } => notifications::press_key(self, &chord, focus)?,
            ConsoleCommand::Toasts => toasts::list(self, format),
            ConsoleCommand::Dismiss { id } => toasts::dismiss(self, &id)?,
            ConsoleCommand::Click { id } => toasts::click(self, &id)?,
            ConsoleCommand::Activity { kind } => toasts::activity(self, kind.into()),
            ConsoleCommand::Date { date } => attendance::select_date(self, date),
            ConsoleCommand::Mark {
                student_id,
                name,
                absent,
            } => attendance::mark(self, student_id, name, !absent).await?,
            ConsoleCommand::MarkAll => attendance::mark_all(self).await?,
            ConsoleCommand::Adopt => attendance::adopt(self).await?,
            ConsoleCommand::Undo(target) => match target {
                UndoCommand::Member { student_id } => {
                    attendance::undo_member(self, student_id).await?
                }
                UndoCommand::All => attendance::undo_all(self).await?,
                UndoCommand::Upload => admin::undo_upload(self).await?,
                UndoCommand::Promotion => admin::undo_promotion(self).await?,
            },
            ConsoleCommand::Upload { path } => admin::upload(self, &path, format).await?,
            ConsoleCommand::Promote { from, to } => admin::promote(self, &from, &to).await?,
            ConsoleCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> ConsoleCommand {
        ConsoleLine::try_parse_from(line.split_whitespace())
            .unwrap()
            .command
    }

    #[test]
    fn test_parses_console_grammar() {
        assert!(matches!(
            parse("mark 42 --absent"),
            ConsoleCommand::Mark {
                student_id: StudentId(42),
                absent: true,
                ..
            }
        ));
        assert!(matches!(
            parse("undo member 7"),
            ConsoleCommand::Undo(UndoCommand::Member {
                student_id: StudentId(7)
            })
        ));
        assert!(matches!(
            parse("n read-all"),
            ConsoleCommand::Notifications(notifications::NotificationCommand::ReadAll)
        ));
        assert!(matches!(
            parse("login sec@example.org --role secretary"),
            ConsoleCommand::Login {
                role: Some(RoleArg::Secretary),
                password: None,
                ..
            }
        ));
        assert!(matches!(parse("exit"), ConsoleCommand::Quit));
    }

    #[test]
    fn test_rejects_bad_arguments() {
        assert!(ConsoleLine::try_parse_from(["date", "2025-13-01"]).is_err());
        assert!(ConsoleLine::try_parse_from(["mark", "abc"]).is_err());
        assert!(ConsoleLine::try_parse_from(["undo"]).is_err());
    }
}
