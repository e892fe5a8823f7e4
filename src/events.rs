//! Append-only audit log for superbeads.
//!
//! Every state-changing command appends one JSON object per line to
//! `.superbeads/events.ndjson`:
//!
//! - `ts`: RFC3339 timestamp
//! - `action`: what happened (`init`, `task_start`, `verify`...)
//! - `actor`: `user@host`
//! - `task`: task id for task-scoped events
//! - `details`: action-specific object
//!
//! `status` reads the log back to report the last verification result.

use crate::context::ProjectContext;
use crate::error::{Result, SuperbeadsError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};

/// Actions that can be logged as events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    Init,
    PackAdd,
    PackRemove,
    SprintNew,
    SprintClose,
    TaskAdd,
    TaskStart,
    TaskComplete,
    TaskBlock,
    TaskUnblock,
    Verify,
}

impl fmt::Display for EventAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EventAction::Init => "init",
            EventAction::PackAdd => "pack_add",
            EventAction::PackRemove => "pack_remove",
            EventAction::SprintNew => "sprint_new",
            EventAction::SprintClose => "sprint_close",
            EventAction::TaskAdd => "task_add",
            EventAction::TaskStart => "task_start",
            EventAction::TaskComplete => "task_complete",
            EventAction::TaskBlock => "task_block",
            EventAction::TaskUnblock => "task_unblock",
            EventAction::Verify => "verify",
        };
        f.write_str(s)
    }
}

/// An event record for the audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub ts: DateTime<Utc>,
    pub action: EventAction,
    pub actor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    pub details: Value,
}

impl Event {
    /// A new event stamped with the current time and actor.
    pub fn new(action: EventAction) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: actor_string(),
            task: None,
            details: Value::Object(serde_json::Map::new()),
        }
    }

    pub fn with_task(mut self, task_id: impl Into<String>) -> Self {
        self.task = Some(task_id.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize the event to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| {
            SuperbeadsError::UserError(format!("failed to serialize event to JSON: {}", e))
        })
    }
}

fn actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

/// Append an event as one line to the project's event log.
pub fn append_event(ctx: &ProjectContext, event: &Event) -> Result<()> {
    let path = ctx.events_path();
    let line = event.to_ndjson_line()?;

    crate::fs::ensure_dir(&ctx.state_dir)?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| {
            SuperbeadsError::UserError(format!(
                "failed to open events file '{}': {}",
                path.display(),
                e
            ))
        })?;

    writeln!(file, "{}", line).map_err(|e| {
        SuperbeadsError::UserError(format!(
            "failed to write event to '{}': {}",
            path.display(),
            e
        ))
    })?;

    log::debug!("event {} appended to {}", event.action, path.display());
    Ok(())
}

/// Append an event, downgrading failure to a warning.
///
/// Used after the state change has already been written, where failing the
/// command would misreport what happened.
pub fn record_event(ctx: &ProjectContext, event: Event) {
    if let Err(e) = append_event(ctx, &event) {
        log::warn!("failed to log {} event: {}", event.action, e);
    }
}

/// Read all events. Malformed lines are skipped with a warning.
pub fn read_events(ctx: &ProjectContext) -> Result<Vec<Event>> {
    let path = ctx.events_path();
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = std::fs::File::open(&path).map_err(|e| {
        SuperbeadsError::UserError(format!(
            "failed to open events file '{}': {}",
            path.display(),
            e
        ))
    })?;

    let mut events = Vec::new();
    for (lineno, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| {
            SuperbeadsError::UserError(format!("failed to read events file: {}", e))
        })?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Event>(&line) {
            Ok(event) => events.push(event),
            Err(e) => log::warn!("skipping malformed event on line {}: {}", lineno + 1, e),
        }
    }

    Ok(events)
}

/// The most recent event with the given action.
pub fn last_event(ctx: &ProjectContext, action: EventAction) -> Result<Option<Event>> {
    Ok(read_events(ctx)?
        .into_iter()
        .rev()
        .find(|e| e.action == action))
}
