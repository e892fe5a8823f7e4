//! Task additions and status transitions.

use super::{Sprint, Task, TaskStatus, check_dependencies, validate_id};
use crate::error::{Result, SuperbeadsError};
use chrono::{DateTime, Utc};

/// A status change applied to a task, for the progress log and event details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub task_id: String,
    pub from: TaskStatus,
    pub to: TaskStatus,
    pub reason: Option<String>,
}

impl Sprint {
    /// Look up a task by id.
    pub fn find(&self, id: &str) -> Result<&Task> {
        self.tasks
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| SuperbeadsError::TaskNotFound(id.to_string()))
    }

    fn find_index(&self, id: &str) -> Result<usize> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| SuperbeadsError::TaskNotFound(id.to_string()))
    }

    /// Add a task, validating id, title and dependencies.
    ///
    /// On error the sprint is left unchanged.
    pub fn add_task(&mut self, mut task: Task) -> Result<()> {
        task.id = validate_id(&task.id, "task")?;
        task.title = task.title.trim().to_string();
        if task.title.is_empty() {
            return Err(SuperbeadsError::InvalidArgs(
                "task title must not be empty".to_string(),
            ));
        }
        if self.tasks.iter().any(|t| t.id == task.id) {
            return Err(SuperbeadsError::UserError(format!(
                "task '{}' already exists in sprint '{}'",
                task.id, self.sprint_id
            )));
        }
        if task.status != TaskStatus::Pending {
            return Err(SuperbeadsError::UserError(format!(
                "new task '{}' must start as pending, not {}",
                task.id, task.status
            )));
        }

        let mut candidate = self.tasks.clone();
        candidate.push(task);
        check_dependencies(&candidate)?;

        self.tasks = candidate;
        self.recompute_stats();
        Ok(())
    }

    /// Whether all of a task's dependencies are completed.
    pub fn dependencies_met(&self, task: &Task) -> bool {
        task.depends_on.iter().all(|dep| {
            self.tasks
                .iter()
                .any(|t| &t.id == dep && t.status == TaskStatus::Completed)
        })
    }

    /// Dependencies of `task` that are not completed yet.
    pub fn unmet_dependencies<'a>(&'a self, task: &'a Task) -> Vec<&'a str> {
        task.depends_on
            .iter()
            .filter(|dep| {
                !self
                    .tasks
                    .iter()
                    .any(|t| &t.id == *dep && t.status == TaskStatus::Completed)
            })
            .map(|s| s.as_str())
            .collect()
    }

    /// First pending task, in list order, whose dependencies are all completed.
    pub fn next_ready(&self) -> Option<&Task> {
        self.tasks
            .iter()
            .find(|t| t.status == TaskStatus::Pending && self.dependencies_met(t))
    }

    /// `pending -> in_progress`. Requires every dependency to be completed.
    pub fn start_task(&mut self, id: &str, now: DateTime<Utc>) -> Result<Transition> {
        let idx = self.find_index(id)?;
        let unmet = self.unmet_dependencies(&self.tasks[idx]);
        if !unmet.is_empty() {
            return Err(SuperbeadsError::UserError(format!(
                "cannot start task '{}': waiting on {}",
                id,
                unmet.join(", ")
            )));
        }

        let transition = self.apply(idx, TaskStatus::InProgress, None)?;
        self.tasks[idx].started_at = Some(now);
        Ok(transition)
    }

    /// `in_progress -> completed`.
    pub fn complete_task(&mut self, id: &str, now: DateTime<Utc>) -> Result<Transition> {
        let idx = self.find_index(id)?;
        let transition = self.apply(idx, TaskStatus::Completed, None)?;
        self.tasks[idx].completed_at = Some(now);
        Ok(transition)
    }

    /// `pending | in_progress -> blocked`, recording why.
    pub fn block_task(&mut self, id: &str, reason: &str) -> Result<Transition> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(SuperbeadsError::InvalidArgs(
                "a reason is required to block a task".to_string(),
            ));
        }

        let idx = self.find_index(id)?;
        let transition = self.apply(idx, TaskStatus::Blocked, Some(reason.to_string()))?;
        self.tasks[idx].blocked_reason = Some(reason.to_string());
        Ok(transition)
    }

    /// `blocked -> pending`. Work restarts from `start`.
    pub fn unblock_task(&mut self, id: &str) -> Result<Transition> {
        let idx = self.find_index(id)?;
        let transition = self.apply(idx, TaskStatus::Pending, None)?;
        let task = &mut self.tasks[idx];
        task.blocked_reason = None;
        task.started_at = None;
        Ok(transition)
    }

    fn apply(&mut self, idx: usize, to: TaskStatus, reason: Option<String>) -> Result<Transition> {
        let task = &mut self.tasks[idx];
        let from = task.status;
        if !from.can_transition_to(to) {
            return Err(SuperbeadsError::UserError(format!(
                "cannot move task '{}' from {} to {}",
                task.id, from, to
            )));
        }

        task.status = to;
        let transition = Transition {
            task_id: task.id.clone(),
            from,
            to,
            reason,
        };
        self.recompute_stats();
        Ok(transition)
    }
}
