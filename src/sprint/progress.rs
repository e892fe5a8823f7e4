//! The human-readable sprint log, `.superbeads/sprint/progress.md`.

use super::{Sprint, TaskStatus, Transition};
use crate::context::ProjectContext;
use crate::error::Result;
use crate::fs::{atomic_write_file, read_to_string};
use chrono::{DateTime, Utc};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

/// Start a fresh progress log for `sprint`, replacing any previous one.
pub fn init_progress(ctx: &ProjectContext, sprint: &Sprint, now: DateTime<Utc>) -> Result<()> {
    let header = format!(
        "# Sprint {}\n\n**Goal:** {}\n**Started:** {}\n\n## Log\n\n",
        sprint.sprint_id,
        sprint.goal,
        now.format(TIMESTAMP_FORMAT)
    );
    atomic_write_file(ctx.progress_path(), &header)
}

/// Append lines to the progress log, creating it if missing.
pub fn append_progress(ctx: &ProjectContext, text: &str) -> Result<()> {
    let path = ctx.progress_path();
    let mut content = if path.exists() {
        read_to_string(&path, "progress log")?
    } else {
        String::new()
    };

    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    content.push_str(text);
    if !text.ends_with('\n') {
        content.push('\n');
    }

    atomic_write_file(&path, &content)
}

pub fn read_progress(ctx: &ProjectContext) -> Result<Option<String>> {
    let path = ctx.progress_path();
    if !path.exists() {
        return Ok(None);
    }
    read_to_string(&path, "progress log").map(Some)
}

/// `- 2026-01-13 10:00 UTC task-001: pending → in_progress`
pub fn transition_line(transition: &Transition, now: DateTime<Utc>) -> String {
    let mut line = format!(
        "- {} {}: {} → {}",
        now.format(TIMESTAMP_FORMAT),
        transition.task_id,
        transition.from,
        transition.to
    );
    if let Some(reason) = &transition.reason {
        line.push_str(&format!(" ({})", reason));
    }
    line
}

/// `- 2026-01-13 10:00 UTC task-001 added: Add cart total`
pub fn added_line(task_id: &str, title: &str, now: DateTime<Utc>) -> String {
    format!("- {} {} added: {}", now.format(TIMESTAMP_FORMAT), task_id, title)
}

/// Closing summary appended by `sprint close`.
pub fn summary_block(sprint: &Sprint, now: DateTime<Utc>) -> String {
    let stats = sprint.stats;
    let mut out = format!(
        "\n## Summary\n\n**Closed:** {}\n**Completed:** {}/{} ({}%)\n",
        now.format(TIMESTAMP_FORMAT),
        stats.completed,
        stats.total,
        stats.percent_complete()
    );

    let unfinished: Vec<_> = sprint
        .tasks
        .iter()
        .filter(|t| t.status != TaskStatus::Completed)
        .collect();
    if !unfinished.is_empty() {
        out.push_str("\n**Carried over:**\n");
        for task in unfinished {
            out.push_str(&format!("- {} [{}] {}\n", task.id, task.status, task.title));
        }
    }
    out
}
