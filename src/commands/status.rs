//! Implementation of the `superbeads status` command.
//!
//! Displays the project, its packs, the current sprint with per-status
//! counts, tasks in progress, the next ready task and the last verification.

use super::join_or_dash;
use crate::config::Settings;
use crate::context::{ProjectContext, require_initialized_project};
use crate::error::Result;
use crate::events::{EventAction, last_event};
use crate::sprint::{Sprint, TaskStatus};
use colored::Colorize;

/// Everything `status` prints, gathered up front.
#[derive(Debug)]
pub(crate) struct StatusView {
    pub project_name: String,
    pub packs: Vec<String>,
    pub sprint: Option<Sprint>,
    /// `(passed, when, summary)` of the last `verify` run.
    pub last_verify: Option<(bool, String, String)>,
}

pub fn cmd_status() -> Result<()> {
    let ctx = require_initialized_project()?;
    let view = gather(&ctx)?;

    println!("{}", "Superbeads Status".bold());
    println!("{}", "=".repeat(17));
    println!();
    println!("Project:  {} ({})", view.project_name, ctx.root.display());
    println!("Packs:    {}", join_or_dash(&view.packs));
    println!();

    let Some(sprint) = &view.sprint else {
        println!("No active sprint. Start one with `superbeads sprint new \"<goal>\"`.");
        print_verify(&view);
        return Ok(());
    };

    let stats = sprint.stats;
    println!("Sprint:   {} - {}", sprint.sprint_id.bold(), sprint.goal);
    println!(
        "Tasks:    {} total, {} pending, {} in progress, {} completed, {} blocked ({}% done)",
        stats.total,
        stats.pending,
        stats.in_progress,
        stats.completed,
        stats.blocked,
        stats.percent_complete()
    );
    println!();

    let in_progress: Vec<_> = sprint.tasks_with_status(TaskStatus::InProgress).collect();
    if !in_progress.is_empty() {
        println!("In progress:");
        for task in in_progress {
            println!("  {} {}", task.id.yellow(), task.title);
        }
        println!();
    }

    let blocked: Vec<_> = sprint.tasks_with_status(TaskStatus::Blocked).collect();
    if !blocked.is_empty() {
        println!("Blocked:");
        for task in blocked {
            println!(
                "  {} {} ({})",
                task.id.red(),
                task.title,
                task.blocked_reason.as_deref().unwrap_or("no reason recorded")
            );
        }
        println!();
    }

    match sprint.next_ready() {
        Some(task) => println!("Next:     {} {}", task.id.bold(), task.title),
        None => println!("Next:     (none ready)"),
    }

    print_verify(&view);
    Ok(())
}

fn print_verify(view: &StatusView) {
    println!();
    match &view.last_verify {
        Some((true, when, summary)) => {
            println!("Verify:   {} at {} ({})", "passed".green(), when, summary)
        }
        Some((false, when, summary)) => {
            println!("Verify:   {} at {} ({})", "failed".red(), when, summary)
        }
        None => println!("Verify:   never run"),
    }
}

pub(crate) fn gather(ctx: &ProjectContext) -> Result<StatusView> {
    let settings = Settings::load(ctx.settings_path())?;
    let sprint = Sprint::load_current(ctx)?;

    let last_verify = match last_event(ctx, EventAction::Verify) {
        Ok(event) => event.map(|e| {
            let passed = e.details["passed"].as_bool().unwrap_or(false);
            let summary = format!(
                "{} passed, {} failed, {} skipped",
                e.details["passed_count"].as_u64().unwrap_or(0),
                e.details["failed_count"].as_u64().unwrap_or(0),
                e.details["skipped_count"].as_u64().unwrap_or(0)
            );
            (passed, e.ts.format("%Y-%m-%d %H:%M UTC").to_string(), summary)
        }),
        Err(e) => {
            log::warn!("failed to read event log: {}", e);
            None
        }
    };

    Ok(StatusView {
        project_name: settings.project_name,
        packs: settings.packs,
        sprint,
        last_verify,
    })
}
