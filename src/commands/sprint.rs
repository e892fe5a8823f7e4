//! `superbeads sprint` subcommands.

use crate::cli::{SprintAction, SprintCommand, SprintNewArgs};
use crate::context::{ProjectContext, require_initialized_project};
use crate::error::{Result, SuperbeadsError};
use crate::events::{Event, EventAction, record_event};
use crate::sprint::progress::{append_progress, init_progress, read_progress, summary_block};
use crate::sprint::{Sprint, TaskStatus};
use chrono::Utc;
use colored::Colorize;
use serde_json::json;
use std::path::PathBuf;

pub fn dispatch(cmd: SprintCommand) -> Result<()> {
    match cmd.action {
        SprintAction::New(args) => cmd_new(args),
        SprintAction::Status => cmd_status(),
        SprintAction::Progress => cmd_progress(),
        SprintAction::Close => cmd_close(),
    }
}

fn cmd_new(args: SprintNewArgs) -> Result<()> {
    let ctx = require_initialized_project()?;
    let (sprint, archived) = new_sprint(&ctx, &args)?;

    if let Some(path) = archived {
        println!("Archived previous sprint to {}.", ctx.relative(&path).display());
    }
    println!("Started sprint {}: {}", sprint.sprint_id.bold(), sprint.goal);
    println!();
    println!("Add tasks with `superbeads task add \"<title>\"`.");
    Ok(())
}

/// Start a sprint. A current sprint is archived first; one with unfinished
/// tasks is only replaced with `--force`.
pub(crate) fn new_sprint(
    ctx: &ProjectContext,
    args: &SprintNewArgs,
) -> Result<(Sprint, Option<PathBuf>)> {
    let now = Utc::now();
    let mut sprint = Sprint::new(&args.goal, args.id.as_deref(), now)?;

    let archived = match Sprint::load_current(ctx)? {
        Some(mut previous) => {
            let unfinished = previous.unfinished_count();
            if unfinished > 0 && !args.force {
                return Err(SuperbeadsError::UserError(format!(
                    "sprint '{}' still has {} unfinished task(s).\n\n\
                     Close it with `superbeads sprint close`, or pass --force to archive it \
                     and start a new one.",
                    previous.sprint_id, unfinished
                )));
            }
            Some(close_sprint_inner(ctx, &mut previous)?)
        }
        None => None,
    };

    sprint.save_current(ctx)?;
    init_progress(ctx, &sprint, now)?;
    record_event(
        ctx,
        Event::new(EventAction::SprintNew).with_details(json!({
            "sprint_id": sprint.sprint_id,
            "goal": sprint.goal,
            "force": args.force,
        })),
    );

    Ok((sprint, archived))
}

fn cmd_status() -> Result<()> {
    let ctx = require_initialized_project()?;
    let sprint = Sprint::require_current(&ctx)?;
    let stats = sprint.stats;

    println!("Sprint {}", sprint.sprint_id.bold());
    println!("  Goal:        {}", sprint.goal);
    if let Some(created) = sprint.created_at {
        println!("  Started:     {}", created.format("%Y-%m-%d %H:%M UTC"));
    }
    println!(
        "  Progress:    {}/{} completed ({}%)",
        stats.completed,
        stats.total,
        stats.percent_complete()
    );
    for status in TaskStatus::ALL {
        println!("  {:12} {}", status.to_string(), stats.count(status));
    }
    Ok(())
}

fn cmd_progress() -> Result<()> {
    let ctx = require_initialized_project()?;
    match read_progress(&ctx)? {
        Some(content) => print!("{}", content),
        None => println!("No progress log yet. Start a sprint with `superbeads sprint new \"<goal>\"`."),
    }
    Ok(())
}

fn cmd_close() -> Result<()> {
    let ctx = require_initialized_project()?;
    let (sprint, path) = close_sprint(&ctx)?;
    let stats = sprint.stats;

    println!("Closed sprint {}.", sprint.sprint_id.bold());
    println!(
        "  Completed {}/{} tasks ({}%)",
        stats.completed,
        stats.total,
        stats.percent_complete()
    );
    if stats.completed < stats.total {
        println!(
            "  {} task(s) carried over; see {}",
            stats.total - stats.completed,
            ctx.relative(&ctx.progress_path()).display()
        );
    }
    println!("  Archived to {}", ctx.relative(&path).display());
    Ok(())
}

pub(crate) fn close_sprint(ctx: &ProjectContext) -> Result<(Sprint, PathBuf)> {
    let mut sprint = Sprint::require_current(ctx)?;
    let path = close_sprint_inner(ctx, &mut sprint)?;
    Ok((sprint, path))
}

fn close_sprint_inner(ctx: &ProjectContext, sprint: &mut Sprint) -> Result<PathBuf> {
    let now = Utc::now();
    sprint.recompute_stats();
    let path = sprint.archive(ctx, now)?;

    if let Err(e) = append_progress(ctx, &summary_block(sprint, now)) {
        log::warn!("failed to append sprint summary: {}", e);
    }
    // Keep the log next to the archived JSON; the next sprint starts a new one.
    let progress_copy = ctx
        .archive_dir()
        .join(format!("{}.progress.md", sprint.sprint_id));
    if ctx.progress_path().exists()
        && let Err(e) = std::fs::copy(ctx.progress_path(), &progress_copy)
    {
        log::warn!("failed to archive progress log: {}", e);
    }
    record_event(
        ctx,
        Event::new(EventAction::SprintClose).with_details(json!({
            "sprint_id": sprint.sprint_id,
            "total": sprint.stats.total,
            "completed": sprint.stats.completed,
            "archive": path.display().to_string(),
        })),
    );

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::last_event;
    use crate::exit_codes;
    use crate::sprint::Task;
    use crate::test_support::{context_for, create_test_project};

    fn new_args(goal: &str, id: &str, force: bool) -> SprintNewArgs {
        SprintNewArgs {
            goal: goal.to_string(),
            id: Some(id.to_string()),
            force,
        }
    }

    #[test]
    fn new_sprint_writes_current_and_progress() {
        let project = create_test_project();
        let ctx = context_for(&project);

        let (sprint, archived) = new_sprint(&ctx, &new_args("Ship checkout", "s1", false)).unwrap();

        assert!(archived.is_none());
        assert_eq!(sprint.sprint_id, "s1");
        assert!(ctx.current_sprint_path().is_file());
        let progress = read_progress(&ctx).unwrap().unwrap();
        assert!(progress.starts_with("# Sprint s1"));
        assert!(progress.contains("**Goal:** Ship checkout"));
        assert!(last_event(&ctx, EventAction::SprintNew).unwrap().is_some());
    }

    #[test]
    fn new_sprint_with_empty_goal_is_invalid() {
        let project = create_test_project();
        let ctx = context_for(&project);

        let err = new_sprint(&ctx, &new_args("  ", "s1", false)).unwrap_err();
        assert_eq!(err.exit_code(), exit_codes::INVALID_ARGS);
        assert!(!ctx.current_sprint_path().exists());
    }

    #[test]
    fn new_sprint_refuses_to_replace_unfinished_without_force() {
        let project = create_test_project();
        let ctx = context_for(&project);
        let (mut first, _) = new_sprint(&ctx, &new_args("First", "s1", false)).unwrap();
        first.add_task(Task::new("task-001", "Open work")).unwrap();
        first.save_current(&ctx).unwrap();

        let err = new_sprint(&ctx, &new_args("Second", "s2", false)).unwrap_err();
        assert!(err.to_string().contains("unfinished"));
        assert_eq!(Sprint::require_current(&ctx).unwrap().sprint_id, "s1");

        let (second, archived) = new_sprint(&ctx, &new_args("Second", "s2", true)).unwrap();
        assert_eq!(second.sprint_id, "s2");
        assert_eq!(archived.unwrap(), ctx.archive_dir().join("s1.json"));
    }

    #[test]
    fn finished_sprint_is_archived_automatically() {
        let project = create_test_project();
        let ctx = context_for(&project);
        new_sprint(&ctx, &new_args("First", "s1", false)).unwrap();

        let (_, archived) = new_sprint(&ctx, &new_args("Second", "s2", false)).unwrap();
        assert!(archived.unwrap().is_file());
    }

    #[test]
    fn close_archives_and_summarizes() {
        let project = create_test_project();
        let ctx = context_for(&project);
        let (mut sprint, _) = new_sprint(&ctx, &new_args("Ship", "s1", false)).unwrap();
        let now = Utc::now();
        sprint.add_task(Task::new("task-001", "Done work")).unwrap();
        sprint.add_task(Task::new("task-002", "Open work")).unwrap();
        sprint.start_task("task-001", now).unwrap();
        sprint.complete_task("task-001", now).unwrap();
        sprint.save_current(&ctx).unwrap();

        let (closed, path) = close_sprint(&ctx).unwrap();

        assert_eq!(path, ctx.archive_dir().join("s1.json"));
        assert!(!ctx.current_sprint_path().exists());
        assert!(closed.closed_at.is_some());
        assert_eq!(closed.stats.completed, 1);

        let archived = Sprint::load(&path).unwrap();
        assert_eq!(archived.stats.total, 2);
        assert!(archived.closed_at.is_some());

        let progress = read_progress(&ctx).unwrap().unwrap();
        assert!(progress.contains("## Summary"));
        assert!(progress.contains("**Completed:** 1/2 (50%)"));
        assert!(progress.contains("task-002 [pending] Open work"));
        assert_eq!(
            std::fs::read_to_string(ctx.archive_dir().join("s1.progress.md")).unwrap(),
            progress
        );
    }

    #[test]
    fn close_without_sprint_fails() {
        let project = create_test_project();
        let ctx = context_for(&project);
        assert!(close_sprint(&ctx).is_err());
    }
}
