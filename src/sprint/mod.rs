//! Sprint and task state for superbeads.
//!
//! A sprint lives in `.superbeads/sprint/current.json` and is only ever written
//! by this module. The invariants that used to be documentation prose are
//! enforced here:
//!
//! - task ids are unique within a sprint and filename-safe
//! - every `depends_on` entry names a task in the same sprint
//! - the dependency graph is acyclic
//! - status moves along `pending -> in_progress -> completed`, with `blocked`
//!   reachable from either open state and `unblock` returning to `pending`
//! - `stats` always equals the per-status task counts after a save
//!
//! # File format
//!
//! ```text
//! {
//!   "sprint_id": "sprint-20260113-100000",
//!   "goal": "Ship the checkout flow",
//!   "tasks": [
//!     {
//!       "id": "task-001",
//!       "title": "Add cart total",
//!       "type": "feature",
//!       "context": { "inputs": [], "outputs": [], "acceptance_criteria": [] },
//!       "depends_on": [],
//!       "status": "pending"
//!     }
//!   ],
//!   "stats": { "total": 1, "pending": 1, "in_progress": 0, "completed": 0, "blocked": 0 }
//! }
//! ```

use crate::error::{Result, SuperbeadsError};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

mod graph;
mod io;
mod mutations;
pub mod progress;

pub use graph::check_dependencies;
pub use mutations::Transition;

/// Filename-safe ids for tasks and sprints.
static ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]{0,63}$").expect("invalid id regex"));

/// Generated task ids: `task-NNN`.
static GENERATED_TASK_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^task-(\d+)$").expect("invalid task id regex"));

/// Default task `type`.
pub const DEFAULT_TASK_TYPE: &str = "feature";

/// Lifecycle state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Blocked,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Blocked,
    ];

    /// Parse a status from its snake_case name (`-` accepted for `_`).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "pending" => Some(Self::Pending),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "blocked" => Some(Self::Blocked),
            _ => None,
        }
    }

    /// Whether the lifecycle allows moving from `self` to `to`.
    pub fn can_transition_to(self, to: TaskStatus) -> bool {
        use TaskStatus::*;
        matches!(
            (self, to),
            (Pending, InProgress)
                | (InProgress, Completed)
                | (Pending, Blocked)
                | (InProgress, Blocked)
                | (Blocked, Pending)
        )
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Blocked => "blocked",
        };
        f.write_str(s)
    }
}

/// What a task consumes and produces, and how to tell it is done.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskContext {
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub acceptance_criteria: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_signal: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// A single-focus unit of work inside a sprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,

    pub title: String,

    /// Free-text category (feature, bugfix, refactor, test, docs...).
    #[serde(rename = "type", default = "default_task_type")]
    pub task_type: String,

    /// Informal estimate such as "30m" or "2h".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_estimate: Option<String>,

    #[serde(default)]
    pub context: TaskContext,

    #[serde(default)]
    pub depends_on: Vec<String>,

    /// Skill template the executor reads first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill: Option<String>,

    #[serde(default)]
    pub status: TaskStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked_reason: Option<String>,

    /// Fields not known to this version, kept on round-trip.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

fn default_task_type() -> String {
    DEFAULT_TASK_TYPE.to_string()
}

impl Task {
    /// A pending task with the given id and title and no other details.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            task_type: default_task_type(),
            time_estimate: None,
            context: TaskContext::default(),
            depends_on: Vec::new(),
            skill: None,
            status: TaskStatus::Pending,
            started_at: None,
            completed_at: None,
            blocked_reason: None,
            extra: BTreeMap::new(),
        }
    }
}

/// Per-status task counts. Derived; recomputed on every save.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SprintStats {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub blocked: usize,
}

impl SprintStats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let mut stats = SprintStats {
            total: tasks.len(),
            ..Default::default()
        };
        for task in tasks {
            match task.status {
                TaskStatus::Pending => stats.pending += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
                TaskStatus::Completed => stats.completed += 1,
                TaskStatus::Blocked => stats.blocked += 1,
            }
        }
        stats
    }

    pub fn count(&self, status: TaskStatus) -> usize {
        match status {
            TaskStatus::Pending => self.pending,
            TaskStatus::InProgress => self.in_progress,
            TaskStatus::Completed => self.completed,
            TaskStatus::Blocked => self.blocked,
        }
    }

    /// Completed tasks as a whole percentage of the total (0 for an empty sprint).
    pub fn percent_complete(&self) -> usize {
        if self.total == 0 {
            0
        } else {
            self.completed * 100 / self.total
        }
    }
}

/// A goal-scoped set of tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sprint {
    pub sprint_id: String,

    pub goal: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub tasks: Vec<Task>,

    #[serde(default)]
    pub stats: SprintStats,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Sprint {
    /// Start a new, empty sprint. Without an explicit id one is derived from `now`.
    pub fn new(goal: &str, sprint_id: Option<&str>, now: DateTime<Utc>) -> Result<Self> {
        let goal = goal.trim();
        if goal.is_empty() {
            return Err(SuperbeadsError::InvalidArgs(
                "sprint goal must not be empty".to_string(),
            ));
        }

        let sprint_id = match sprint_id {
            Some(id) => validate_id(id, "sprint")?,
            None => format!("sprint-{}", now.format("%Y%m%d-%H%M%S")),
        };

        Ok(Self {
            sprint_id,
            goal: goal.to_string(),
            created_at: Some(now),
            closed_at: None,
            tasks: Vec::new(),
            stats: SprintStats::default(),
            extra: BTreeMap::new(),
        })
    }

    pub fn recompute_stats(&mut self) {
        self.stats = SprintStats::from_tasks(&self.tasks);
    }

    /// Number of tasks that are not completed.
    pub fn unfinished_count(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| t.status != TaskStatus::Completed)
            .count()
    }

    /// Next id of the form `task-NNN`, one past the highest existing number.
    ///
    /// Numbers too large for `u64` are ignored. If the highest number is
    /// `u64::MAX`, numbering wraps and the first unused id is returned.
    pub fn next_task_id(&self) -> String {
        let max = self
            .tasks
            .iter()
            .filter_map(|t| GENERATED_TASK_ID_REGEX.captures(&t.id))
            .filter_map(|c| c[1].parse::<u64>().ok())
            .max()
            .unwrap_or(0);

        let mut n = max.wrapping_add(1);
        loop {
            let id = format!("task-{:03}", n);
            if !self.tasks.iter().any(|t| t.id == id) {
                return id;
            }
            n = n.wrapping_add(1);
        }
    }

    pub fn tasks_with_status(&self, status: TaskStatus) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(move |t| t.status == status)
    }
}

/// Validate a task or sprint id, returning it trimmed.
pub fn validate_id(id: &str, what: &str) -> Result<String> {
    let id = id.trim();
    if !ID_REGEX.is_match(id) {
        return Err(SuperbeadsError::InvalidArgs(format!(
            "invalid {} id '{}': use letters, digits, '.', '_' or '-' (max 64 characters, \
             must start with a letter or digit)",
            what, id
        )));
    }
    Ok(id.to_string())
}
