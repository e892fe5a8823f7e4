//! CLI argument parsing for superbeads.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Superbeads: project scaffolding, sprint tracking and verification for
/// agent-driven coding workflows.
///
/// - Core personas and optional domain packs are installed under .claude/
/// - Sprints and tasks live in .superbeads/sprint/ as plain JSON
/// - `verify` runs the project's own lint, typecheck, test and build commands
#[derive(Parser, Debug)]
#[command(name = "superbeads")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for superbeads.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize superbeads in the current directory.
    ///
    /// Creates .superbeads/, CLAUDE.md and the four core agent personas,
    /// then installs any requested packs.
    Init(InitArgs),

    /// Manage domain packs.
    Pack(PackCommand),

    /// Manage tasks in the current sprint.
    Task(TaskCommand),

    /// Manage the current sprint.
    Sprint(SprintCommand),

    /// Run the project's verification steps.
    ///
    /// Exits 3 when any step fails.
    Verify(VerifyArgs),

    /// Show project, sprint and verification status.
    Status,

    /// Install superbeads for the current user.
    ///
    /// Copies the binary and templates into the prefix and adds
    /// `<prefix>/bin` to PATH in your shell rc file.
    Install(InstallArgs),

    /// Print versions of superbeads and the tools it works with.
    Versions,
}

/// Arguments for the `init` command.
#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Project name (defaults to the directory name).
    #[arg(long)]
    pub name: Option<String>,

    /// Pack to install (repeatable).
    #[arg(long = "pack", value_name = "PACK")]
    pub packs: Vec<String>,

    /// Also install packs detected from project files.
    #[arg(long)]
    pub detect: bool,

    /// Overwrite existing CLAUDE.md and agent files.
    #[arg(long)]
    pub force: bool,
}

/// Pack subcommands.
#[derive(Parser, Debug)]
pub struct PackCommand {
    #[command(subcommand)]
    pub action: PackAction,
}

#[derive(Subcommand, Debug)]
pub enum PackAction {
    /// List available packs and whether they are installed.
    List,

    /// Show a pack's templates and verification steps.
    Show(PackNameArgs),

    /// Install a pack into this project.
    Add(PackAddArgs),

    /// Remove a pack from this project.
    Remove(PackNameArgs),

    /// Suggest packs based on files in this project.
    Detect,
}

#[derive(Parser, Debug)]
pub struct PackNameArgs {
    /// Pack name (ios, python, web, design, pm).
    pub name: String,
}

#[derive(Parser, Debug)]
pub struct PackAddArgs {
    /// Pack name (ios, python, web, design, pm).
    pub name: String,

    /// Overwrite existing template files.
    #[arg(long)]
    pub force: bool,
}

/// Task subcommands.
#[derive(Parser, Debug)]
pub struct TaskCommand {
    #[command(subcommand)]
    pub action: TaskAction,
}

#[derive(Subcommand, Debug)]
pub enum TaskAction {
    /// Add a task to the current sprint.
    Add(TaskAddArgs),

    /// List tasks, optionally filtered by status.
    List(TaskListArgs),

    /// Show one task in full.
    Show(TaskIdArgs),

    /// Move a task from pending to in_progress.
    Start(TaskIdArgs),

    /// Mark an in-progress task as completed.
    Done(TaskIdArgs),

    /// Block a task, recording why.
    Block(TaskBlockArgs),

    /// Return a blocked task to pending.
    Unblock(TaskIdArgs),

    /// Show the next task that is ready to start.
    Next,
}

#[derive(Parser, Debug)]
pub struct TaskAddArgs {
    /// Task title.
    pub title: String,

    /// Task id (defaults to the next task-NNN).
    #[arg(long)]
    pub id: Option<String>,

    /// Task type (feature, bug, chore...).
    #[arg(long = "type", value_name = "TYPE")]
    pub task_type: Option<String>,

    /// Time estimate (free text, e.g. "2h").
    #[arg(long)]
    pub estimate: Option<String>,

    /// Task ids this task depends on.
    #[arg(long, value_delimiter = ',')]
    pub depends_on: Vec<String>,

    /// Skill to apply.
    #[arg(long)]
    pub skill: Option<String>,

    /// Input the task needs (repeatable).
    #[arg(long = "input", value_name = "INPUT")]
    pub inputs: Vec<String>,

    /// Output the task produces (repeatable).
    #[arg(long = "output", value_name = "OUTPUT")]
    pub outputs: Vec<String>,

    /// Acceptance criterion (repeatable).
    #[arg(long = "criteria", value_name = "CRITERION")]
    pub criteria: Vec<String>,

    /// How completion is signalled.
    #[arg(long)]
    pub signal: Option<String>,
}

#[derive(Parser, Debug)]
pub struct TaskListArgs {
    /// Only show tasks with this status.
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Parser, Debug)]
pub struct TaskIdArgs {
    /// Task id (e.g. task-001).
    pub task_id: String,
}

#[derive(Parser, Debug)]
pub struct TaskBlockArgs {
    /// Task id (e.g. task-001).
    pub task_id: String,

    /// Why the task is blocked (required).
    #[arg(short, long)]
    pub reason: String,
}

/// Sprint subcommands.
#[derive(Parser, Debug)]
pub struct SprintCommand {
    #[command(subcommand)]
    pub action: SprintAction,
}

#[derive(Subcommand, Debug)]
pub enum SprintAction {
    /// Start a new sprint.
    New(SprintNewArgs),

    /// Show the current sprint's goal and stats.
    Status,

    /// Print the sprint progress log.
    Progress,

    /// Close the current sprint and archive it.
    Close,
}

#[derive(Parser, Debug)]
pub struct SprintNewArgs {
    /// Sprint goal.
    pub goal: String,

    /// Sprint id (defaults to sprint-YYYYMMDD-HHMMSS).
    #[arg(long)]
    pub id: Option<String>,

    /// Replace a current sprint that still has unfinished tasks.
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `verify` command.
#[derive(Parser, Debug)]
pub struct VerifyArgs {
    /// Use this pack's steps instead of the configured ones.
    #[arg(long)]
    pub pack: Option<String>,

    /// Skip slow steps (build steps by default).
    #[arg(long)]
    pub quick: bool,

    /// Show output of passing steps too.
    #[arg(long)]
    pub verbose: bool,

    /// Stop at the first failing step.
    #[arg(long)]
    pub fail_fast: bool,
}

/// Arguments for the `install` command.
#[derive(Parser, Debug)]
pub struct InstallArgs {
    /// Install location (default: ~/.superbeads).
    #[arg(long, value_name = "PATH")]
    pub prefix: Option<PathBuf>,

    /// Do not modify any shell rc file.
    #[arg(long)]
    pub no_path: bool,

    /// Shell rc file to update (default from $SHELL).
    #[arg(long, value_name = "PATH")]
    pub rc_file: Option<PathBuf>,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
