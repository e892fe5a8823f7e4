//! `superbeads task` subcommands.
//!
//! Every mutation follows the same sequence: load `current.json`, apply the
//! change in memory, save atomically, then append to `progress.md` and the
//! event log.

use super::{join_or_dash, padded_status_label, status_label};
use crate::cli::{TaskAction, TaskAddArgs, TaskBlockArgs, TaskCommand, TaskIdArgs, TaskListArgs};
use crate::context::{ProjectContext, require_initialized_project};
use crate::error::{Result, SuperbeadsError};
use crate::events::{Event, EventAction, record_event};
use crate::sprint::progress::{added_line, append_progress, transition_line};
use crate::sprint::{Sprint, Task, TaskStatus, Transition};
use chrono::Utc;
use colored::Colorize;
use serde_json::json;

pub fn dispatch(cmd: TaskCommand) -> Result<()> {
    match cmd.action {
        TaskAction::Add(args) => cmd_add(args),
        TaskAction::List(args) => cmd_list(args),
        TaskAction::Show(args) => cmd_show(args),
        TaskAction::Start(args) => cmd_transition(&args.task_id, TransitionKind::Start),
        TaskAction::Done(args) => cmd_transition(&args.task_id, TransitionKind::Complete),
        TaskAction::Block(args) => cmd_block(args),
        TaskAction::Unblock(args) => cmd_transition(&args.task_id, TransitionKind::Unblock),
        TaskAction::Next => cmd_next(),
    }
}

fn cmd_add(args: TaskAddArgs) -> Result<()> {
    let ctx = require_initialized_project()?;
    let task = add_task(&ctx, args)?;

    println!("Added {}: {}", task.id.bold(), task.title);
    if !task.depends_on.is_empty() {
        println!("  depends on: {}", task.depends_on.join(", "));
    }
    Ok(())
}

pub(crate) fn add_task(ctx: &ProjectContext, args: TaskAddArgs) -> Result<Task> {
    let mut sprint = Sprint::require_current(ctx)?;

    let id = match args.id {
        Some(id) => id,
        None => sprint.next_task_id(),
    };
    let mut task = Task::new(id, args.title);
    if let Some(task_type) = args.task_type {
        task.task_type = task_type;
    }
    task.time_estimate = args.estimate;
    task.skill = args.skill;
    task.depends_on = args
        .depends_on
        .iter()
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .collect();
    task.context.inputs = args.inputs;
    task.context.outputs = args.outputs;
    task.context.acceptance_criteria = args.criteria;
    task.context.completion_signal = args.signal;

    sprint.add_task(task)?;
    sprint.save_current(ctx)?;

    let Some(task) = sprint.tasks.last().cloned() else {
        return Err(SuperbeadsError::UserError(
            "task was not recorded in the sprint".to_string(),
        ));
    };
    let now = Utc::now();
    if let Err(e) = append_progress(ctx, &added_line(&task.id, &task.title, now)) {
        log::warn!("failed to update progress log: {}", e);
    }
    record_event(
        ctx,
        Event::new(EventAction::TaskAdd)
            .with_task(&task.id)
            .with_details(json!({
                "title": task.title,
                "type": task.task_type,
                "depends_on": task.depends_on,
            })),
    );

    Ok(task)
}

fn parse_status(s: &str) -> Result<TaskStatus> {
    TaskStatus::from_str(s).ok_or_else(|| {
        let valid: Vec<String> = TaskStatus::ALL.iter().map(|s| s.to_string()).collect();
        SuperbeadsError::InvalidArgs(format!(
            "unknown status '{}'. Valid statuses: {}",
            s,
            valid.join(", ")
        ))
    })
}

fn cmd_list(args: TaskListArgs) -> Result<()> {
    let ctx = require_initialized_project()?;
    let sprint = Sprint::require_current(&ctx)?;
    let filter = args.status.as_deref().map(parse_status).transpose()?;

    let tasks: Vec<&Task> = sprint
        .tasks
        .iter()
        .filter(|t| filter.is_none_or(|s| t.status == s))
        .collect();

    if tasks.is_empty() {
        match filter {
            Some(status) => println!("No {} tasks in sprint {}.", status, sprint.sprint_id),
            None => println!(
                "Sprint {} has no tasks. Add one with `superbeads task add \"<title>\"`.",
                sprint.sprint_id
            ),
        }
        return Ok(());
    }

    println!("{} ({})", sprint.goal.bold(), sprint.sprint_id);
    println!();
    for task in tasks {
        let deps = if task.depends_on.is_empty() {
            String::new()
        } else {
            format!("  [after {}]", task.depends_on.join(", "))
        };
        println!(
            "  {:10} {} {}{}",
            task.id,
            padded_status_label(task.status, 12),
            task.title,
            deps.dimmed()
        );
    }
    Ok(())
}

fn cmd_show(args: TaskIdArgs) -> Result<()> {
    let ctx = require_initialized_project()?;
    let sprint = Sprint::require_current(&ctx)?;
    let task = sprint.find(&args.task_id)?;

    println!("{}: {}", task.id.bold(), task.title);
    println!();
    println!("  Status:      {}", status_label(task.status));
    println!("  Type:        {}", task.task_type);
    if let Some(estimate) = &task.time_estimate {
        println!("  Estimate:    {}", estimate);
    }
    if let Some(skill) = &task.skill {
        println!("  Skill:       {}", skill);
    }
    println!("  Depends on:  {}", join_or_dash(&task.depends_on));
    let unmet = sprint.unmet_dependencies(task);
    if task.status == TaskStatus::Pending && !unmet.is_empty() {
        println!("  Waiting on:  {}", unmet.join(", ").yellow());
    }
    if let Some(started) = task.started_at {
        println!("  Started:     {}", started.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    if let Some(completed) = task.completed_at {
        println!("  Completed:   {}", completed.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    if let Some(reason) = &task.blocked_reason {
        println!("  Blocked:     {}", reason.red());
    }

    let context = &task.context;
    print_list("Inputs", &context.inputs);
    print_list("Outputs", &context.outputs);
    print_list("Acceptance criteria", &context.acceptance_criteria);
    if let Some(signal) = &context.completion_signal {
        println!();
        println!("Completion signal: {}", signal);
    }
    Ok(())
}

fn print_list(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!();
    println!("{}:", title);
    for item in items {
        println!("  - {}", item);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TransitionKind {
    Start,
    Complete,
    Block,
    Unblock,
}

impl TransitionKind {
    fn action(self) -> EventAction {
        match self {
            TransitionKind::Start => EventAction::TaskStart,
            TransitionKind::Complete => EventAction::TaskComplete,
            TransitionKind::Block => EventAction::TaskBlock,
            TransitionKind::Unblock => EventAction::TaskUnblock,
        }
    }
}

fn cmd_block(args: TaskBlockArgs) -> Result<()> {
    let ctx = require_initialized_project()?;
    let transition = transition_task(&ctx, &args.task_id, TransitionKind::Block, Some(&args.reason))?;
    print_transition(&transition);
    Ok(())
}

fn cmd_transition(task_id: &str, kind: TransitionKind) -> Result<()> {
    let ctx = require_initialized_project()?;
    let transition = transition_task(&ctx, task_id, kind, None)?;
    print_transition(&transition);

    if kind == TransitionKind::Complete
        && let Ok(Some(sprint)) = Sprint::load_current(&ctx)
    {
        match sprint.next_ready() {
            Some(next) => println!("Next ready: {} {}", next.id.bold(), next.title),
            None if sprint.unfinished_count() == 0 => {
                println!("All tasks complete. Close the sprint with `superbeads sprint close`.")
            }
            None => {}
        }
    }
    Ok(())
}

fn print_transition(transition: &Transition) {
    print!(
        "{}: {} → {}",
        transition.task_id.bold(),
        status_label(transition.from),
        status_label(transition.to)
    );
    match &transition.reason {
        Some(reason) => println!(" ({})", reason),
        None => println!(),
    }
}

/// Apply one status transition and persist it.
pub(crate) fn transition_task(
    ctx: &ProjectContext,
    task_id: &str,
    kind: TransitionKind,
    reason: Option<&str>,
) -> Result<Transition> {
    let mut sprint = Sprint::require_current(ctx)?;
    let now = Utc::now();

    let transition = match kind {
        TransitionKind::Start => sprint.start_task(task_id, now)?,
        TransitionKind::Complete => sprint.complete_task(task_id, now)?,
        TransitionKind::Block => sprint.block_task(task_id, reason.unwrap_or_default())?,
        TransitionKind::Unblock => sprint.unblock_task(task_id)?,
    };
    sprint.save_current(ctx)?;

    if let Err(e) = append_progress(ctx, &transition_line(&transition, now)) {
        log::warn!("failed to update progress log: {}", e);
    }
    record_event(
        ctx,
        Event::new(kind.action())
            .with_task(&transition.task_id)
            .with_details(json!({
                "from": transition.from,
                "to": transition.to,
                "reason": transition.reason,
            })),
    );

    Ok(transition)
}

fn cmd_next() -> Result<()> {
    let ctx = require_initialized_project()?;
    let sprint = Sprint::require_current(&ctx)?;

    if let Some(task) = sprint.next_ready() {
        println!("{} {}", task.id.bold(), task.title);
        if let Some(skill) = &task.skill {
            println!("  skill: {}", skill);
        }
        println!();
        println!("Start it with `superbeads task start {}`.", task.id);
        return Ok(());
    }

    let in_progress: Vec<&str> = sprint
        .tasks_with_status(TaskStatus::InProgress)
        .map(|t| t.id.as_str())
        .collect();
    if sprint.unfinished_count() == 0 {
        println!("No tasks left. Close the sprint with `superbeads sprint close`.");
    } else if !in_progress.is_empty() {
        println!("No task is ready. In progress: {}", in_progress.join(", "));
    } else {
        println!("No task is ready; remaining tasks are blocked or waiting on dependencies.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{last_event, read_events};
    use crate::exit_codes;
    use crate::sprint::progress::{init_progress, read_progress};
    use crate::test_support::{context_for, create_test_project};
    use tempfile::TempDir;

    fn project_with_sprint() -> (TempDir, ProjectContext) {
        let project = create_test_project();
        let ctx = context_for(&project);
        let now = Utc::now();
        let mut sprint = Sprint::new("Ship checkout", Some("s1"), now).unwrap();
        sprint.save_current(&ctx).unwrap();
        init_progress(&ctx, &sprint, now).unwrap();
        (project, ctx)
    }

    fn add_args(title: &str) -> TaskAddArgs {
        TaskAddArgs {
            title: title.to_string(),
            id: None,
            task_type: None,
            estimate: None,
            depends_on: Vec::new(),
            skill: None,
            inputs: Vec::new(),
            outputs: Vec::new(),
            criteria: Vec::new(),
            signal: None,
        }
    }

    #[test]
    fn add_task_assigns_ids_and_persists() {
        let (_project, ctx) = project_with_sprint();

        let first = add_task(&ctx, add_args("Cart model")).unwrap();
        let mut args = add_args("Cart UI");
        args.depends_on = vec![" task-001 ".to_string()];
        args.criteria = vec!["shows total".to_string()];
        args.task_type = Some("ui".to_string());
        let second = add_task(&ctx, args).unwrap();

        assert_eq!(first.id, "task-001");
        assert_eq!(second.id, "task-002");
        assert_eq!(second.depends_on, vec!["task-001"]);

        let sprint = Sprint::require_current(&ctx).unwrap();
        assert_eq!(sprint.stats.total, 2);
        let stored = sprint.find("task-002").unwrap();
        assert_eq!(stored.task_type, "ui");
        assert_eq!(stored.context.acceptance_criteria, vec!["shows total"]);

        let progress = read_progress(&ctx).unwrap().unwrap();
        assert!(progress.contains("task-002 added: Cart UI"));
        assert_eq!(read_events(&ctx).unwrap().len(), 2);
    }

    #[test]
    fn add_task_with_unknown_dependency_leaves_sprint_unchanged() {
        let (_project, ctx) = project_with_sprint();
        add_task(&ctx, add_args("Cart model")).unwrap();
        let before = std::fs::read_to_string(ctx.current_sprint_path()).unwrap();

        let mut args = add_args("Checkout");
        args.depends_on = vec!["task-404".to_string()];
        assert!(add_task(&ctx, args).is_err());

        let after = std::fs::read_to_string(ctx.current_sprint_path()).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn add_task_without_sprint_fails() {
        let project = create_test_project();
        let ctx = context_for(&project);

        let err = add_task(&ctx, add_args("Orphan")).unwrap_err();
        assert_eq!(err.exit_code(), exit_codes::GENERAL_ERROR);
        assert!(err.to_string().contains("sprint new"));
    }

    #[test]
    fn full_lifecycle_is_logged() {
        let (_project, ctx) = project_with_sprint();
        add_task(&ctx, add_args("Cart model")).unwrap();

        transition_task(&ctx, "task-001", TransitionKind::Start, None).unwrap();
        let blocked =
            transition_task(&ctx, "task-001", TransitionKind::Block, Some("API down")).unwrap();
        assert_eq!(blocked.to, TaskStatus::Blocked);
        transition_task(&ctx, "task-001", TransitionKind::Unblock, None).unwrap();
        transition_task(&ctx, "task-001", TransitionKind::Start, None).unwrap();
        let done = transition_task(&ctx, "task-001", TransitionKind::Complete, None).unwrap();
        assert_eq!(done.from, TaskStatus::InProgress);

        let sprint = Sprint::require_current(&ctx).unwrap();
        assert_eq!(sprint.stats.completed, 1);
        assert!(sprint.find("task-001").unwrap().completed_at.is_some());

        let progress = read_progress(&ctx).unwrap().unwrap();
        assert!(progress.contains("task-001: in_progress → blocked (API down)"));
        assert!(progress.contains("task-001: in_progress → completed"));

        let event = last_event(&ctx, EventAction::TaskBlock).unwrap().unwrap();
        assert_eq!(event.task.as_deref(), Some("task-001"));
        assert_eq!(event.details["reason"], "API down");
    }

    #[test]
    fn start_with_unmet_dependency_fails() {
        let (_project, ctx) = project_with_sprint();
        add_task(&ctx, add_args("Model")).unwrap();
        let mut args = add_args("View");
        args.depends_on = vec!["task-001".to_string()];
        add_task(&ctx, args).unwrap();

        let err = transition_task(&ctx, "task-002", TransitionKind::Start, None).unwrap_err();
        assert!(err.to_string().contains("task-001"));

        let sprint = Sprint::require_current(&ctx).unwrap();
        assert_eq!(sprint.find("task-002").unwrap().status, TaskStatus::Pending);
    }

    #[test]
    fn unknown_task_is_exit_5() {
        let (_project, ctx) = project_with_sprint();
        let err = transition_task(&ctx, "task-999", TransitionKind::Start, None).unwrap_err();
        assert_eq!(err.exit_code(), exit_codes::TASK_NOT_FOUND);
    }

    #[test]
    fn parse_status_accepts_dashes_and_rejects_junk() {
        assert_eq!(parse_status("in-progress").unwrap(), TaskStatus::InProgress);
        let err = parse_status("doing").unwrap_err();
        assert_eq!(err.exit_code(), exit_codes::INVALID_ARGS);
        assert!(err.to_string().contains("pending"));
    }
}
