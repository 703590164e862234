//! Interactive console for Rollcall.
//!
//! - [`commands`]: the clap grammar for process arguments and console
//!   lines, plus one handler module per area.
//! - [`console::Console`]: the state every command works against.
//! - [`shell::Shell`]: the stdin loop.
//! - [`output`]: table and JSON rendering.

pub mod commands;
pub mod console;
pub mod output;
pub mod shell;

pub use commands::{Cli, ConsoleCommand, ConsoleLine, Flow};
pub use console::Console;
pub use shell::Shell;
