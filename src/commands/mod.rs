//! Command implementations for superbeads.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. Each command resolves its project context and then calls
//! a context-taking function, which is what the tests exercise.

mod init;
mod install;
mod pack;
mod sprint;
mod status;
mod task;
mod verify;
mod versions;

use crate::cli::Command;
use crate::error::Result;
use crate::sprint::TaskStatus;
use colored::{ColoredString, Colorize};

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Init(args) => init::cmd_init(args),
        Command::Pack(pack_cmd) => pack::dispatch(pack_cmd),
        Command::Task(task_cmd) => task::dispatch(task_cmd),
        Command::Sprint(sprint_cmd) => sprint::dispatch(sprint_cmd),
        Command::Verify(args) => verify::cmd_verify(args),
        Command::Status => status::cmd_status(),
        Command::Install(args) => install::cmd_install(args),
        Command::Versions => versions::cmd_versions(),
    }
}

/// Coloured status label for terminal output.
pub(crate) fn status_label(status: TaskStatus) -> ColoredString {
    padded_status_label(status, 0)
}

/// Status label padded to `width` before colouring, for table columns.
pub(crate) fn padded_status_label(status: TaskStatus, width: usize) -> ColoredString {
    let label = format!("{:width$}", status.to_string());
    match status {
        TaskStatus::Pending => label.normal(),
        TaskStatus::InProgress => label.yellow(),
        TaskStatus::Completed => label.green(),
        TaskStatus::Blocked => label.red(),
    }
}

/// Comma-separated list, or `-` when empty.
pub(crate) fn join_or_dash<S: AsRef<str>>(items: &[S]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.iter().map(|s| s.as_ref()).collect::<Vec<_>>().join(", ")
    }
}
