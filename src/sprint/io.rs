//! Loading, saving and archiving sprint files.

use super::{Sprint, check_dependencies, validate_id};
use crate::context::ProjectContext;
use crate::error::{Result, SuperbeadsError};
use crate::fs::{atomic_write_file, read_to_string};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

impl Sprint {
    /// Load and validate a sprint file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = read_to_string(path, "sprint file")?;
        Self::from_json(&content).map_err(|e| {
            SuperbeadsError::UserError(format!("invalid sprint file '{}': {}", path.display(), e))
        })
    }

    /// Parse a sprint from JSON and check its invariants.
    ///
    /// Stored stats are ignored in favour of recomputed ones.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut sprint: Sprint = serde_json::from_str(json)
            .map_err(|e| SuperbeadsError::UserError(format!("failed to parse sprint JSON: {}", e)))?;

        let mut seen = HashSet::new();
        for task in &sprint.tasks {
            if !seen.insert(task.id.as_str()) {
                return Err(SuperbeadsError::UserError(format!(
                    "duplicate task id '{}'",
                    task.id
                )));
            }
        }
        check_dependencies(&sprint.tasks)?;

        sprint.recompute_stats();
        Ok(sprint)
    }

    pub fn to_json(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self).map_err(|e| {
            SuperbeadsError::UserError(format!("failed to serialize sprint: {}", e))
        })?;
        json.push('\n');
        Ok(json)
    }

    /// Recompute stats and atomically write the sprint.
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.recompute_stats();
        atomic_write_file(path, &self.to_json()?)
    }

    /// The active sprint, if any.
    pub fn load_current(ctx: &ProjectContext) -> Result<Option<Self>> {
        let path = ctx.current_sprint_path();
        if !path.exists() {
            return Ok(None);
        }
        Self::load(path).map(Some)
    }

    /// The active sprint, or an error telling the user to create one.
    pub fn require_current(ctx: &ProjectContext) -> Result<Self> {
        Self::load_current(ctx)?.ok_or_else(|| {
            SuperbeadsError::UserError(
                "no active sprint.\n\nRun `superbeads sprint new \"<goal>\"` to start one."
                    .to_string(),
            )
        })
    }

    pub fn save_current(&mut self, ctx: &ProjectContext) -> Result<()> {
        self.save(ctx.current_sprint_path())
    }

    /// Close the sprint: write it to `archive/<sprint_id>.json` and remove
    /// `current.json`. An existing archive with the same id is not overwritten.
    pub fn archive(&mut self, ctx: &ProjectContext, now: DateTime<Utc>) -> Result<PathBuf> {
        let id = validate_id(&self.sprint_id, "sprint")?;
        let archive_path = ctx.archive_dir().join(format!("{}.json", id));
        if archive_path.exists() {
            return Err(SuperbeadsError::UserError(format!(
                "archive already exists: {}",
                archive_path.display()
            )));
        }

        self.closed_at = Some(now);
        self.save(&archive_path)?;

        let current = ctx.current_sprint_path();
        if current.exists() {
            std::fs::remove_file(&current).map_err(|e| {
                SuperbeadsError::UserError(format!(
                    "archived sprint but failed to remove '{}': {}",
                    current.display(),
                    e
                ))
            })?;
        }

        Ok(archive_path)
    }
}
