//! Interactive read-eval loop over stdin.

use std::collections::HashSet;
use std::io::Write;

use clap::Parser;
use clap::error::ErrorKind as ClapErrorKind;
use tokio::io::{AsyncBufReadExt, BufReader};

use rollcall_core::error::AppError;
use rollcall_core::types::NotificationId;
use rollcall_notify::activity::ActivityKind;

use crate::commands::{ConsoleLine, Flow};
use crate::console::Console;
use crate::output;

/// Errors splitting a console line into words.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LineError {
    /// A quote was opened and never closed.
    #[error("unterminated {0} quote")]
    UnterminatedQuote(char),
    /// A backslash ended the line.
    #[error("dangling escape at end of line")]
    DanglingEscape,
}

/// Split a line into words, honouring single quotes, double quotes, and
/// backslash escapes.
pub fn split_words(line: &str) -> Result<Vec<String>, LineError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some('"') | None, '\\') => {
                current.push(chars.next().ok_or(LineError::DanglingEscape)?);
                in_word = true;
            }
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if let Some(q) = quote {
        return Err(LineError::UnterminatedQuote(q));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

/// The interactive console.
#[derive(Debug)]
pub struct Shell {
    console: Console,
    announced: HashSet<NotificationId>,
}

impl Shell {
    pub fn new(console: Console) -> Self {
        Self {
            console,
            announced: HashSet::new(),
        }
    }

    /// The console behind the shell.
    pub fn console(&self) -> &Console {
        &self.console
    }

    /// Read commands from stdin until `quit`, end of input, or Ctrl+C.
    pub async fn run(&mut self) -> Result<(), AppError> {
        println!(
            "Rollcall v{}. Type `help` for commands, `quit` to leave.",
            env!("CARGO_PKG_VERSION")
        );
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            self.prompt();
            let line = tokio::select! {
                line = lines.next_line() => line?,
                _ = shutdown_signal() => {
                    println!();
                    tracing::info!("Interrupt received, leaving console");
                    break;
                }
            };
            let Some(line) = line else {
                break;
            };
            if self.handle_line(&line).await == Flow::Quit {
                break;
            }
        }
        Ok(())
    }

    /// Execute one line of input and announce any new toasts.
    pub async fn handle_line(&mut self, line: &str) -> Flow {
        self.console.record_activity(ActivityKind::Keyboard);

        let words = match split_words(line) {
            Ok(words) if words.is_empty() => return Flow::Continue,
            Ok(words) => words,
            Err(e) => {
                output::print_error(&e.to_string());
                return Flow::Continue;
            }
        };

        let command = match ConsoleLine::try_parse_from(words) {
            Ok(parsed) => parsed.command,
            Err(e) => {
                match e.kind() {
                    ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => {
                        println!("{}", e.render());
                    }
                    _ => output::print_error(e.render().to_string().trim_end()),
                }
                return Flow::Continue;
            }
        };

        let flow = match self.console.execute(command).await {
            Ok(flow) => flow,
            Err(e) => {
                tracing::debug!(kind = ?e.kind, error = %e, "Console command failed");
                output::print_error(&e.message);
                Flow::Continue
            }
        };

        self.announce_toasts();
        flow
    }

    /// Print toasts that appeared since the last command.
    fn announce_toasts(&mut self) {
        let views = crate::commands::toasts::render(&self.console);
        let active: HashSet<NotificationId> = views.iter().map(|v| v.slot.id.clone()).collect();

        for view in views.iter().rev() {
            if self.announced.insert(view.slot.id.clone()) {
                let n = &view.notification;
                println!("🔔 {} {}: {}  [{}]", n.kind.icon(), n.title, n.message, n.id);
            }
        }
        self.announced.retain(|id| active.contains(id));
    }

    fn prompt(&self) {
        let unread = self.console.store.unread_count();
        let date = self.console.attendance.selected_date();
        if unread > 0 {
            print!("rollcall {date} ({unread} unread)> ");
        } else {
            print!("rollcall {date}> ");
        }
        let _ = std::io::stdout().flush();
    }
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
