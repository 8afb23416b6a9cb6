//! CLI module for kbagent
//!
//! Provides the command-line interface:
//! - one-shot commands that load, act on and save a knowledge base file
//! - `shell`: an interactive session with undo, saving only on request
//!
//! Library errors are mapped to `KB_CLI_*` codes at this boundary.

mod args;
mod commands;
mod config;
mod errors;
mod io;
mod shell;

pub use args::{Cli, Command, ListTarget};
pub use commands::{open_session, run, run_command};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{load_kb, read_document, read_text, save_kb};
pub use shell::{run_shell, ShellCommand};
