//! Project context resolution for superbeads.
//!
//! Every command except `init`, `install` and `versions` operates on an
//! initialized project: a directory containing `.superbeads/settings.json`.
//! The context is found by walking up from the working directory, so commands
//! work from any subdirectory of the project. A bare `.superbeads/` directory
//! (such as the default install prefix in `$HOME`) is not a project.

use crate::error::{Result, SuperbeadsError};
use std::env;
use std::path::{Path, PathBuf};

/// Name of the per-project state directory.
pub const STATE_DIR: &str = ".superbeads";

/// File inside [`STATE_DIR`] that marks an initialized project.
pub const SETTINGS_FILE: &str = "settings.json";

/// Name of the directory holding agent and skill templates.
pub const CLAUDE_DIR: &str = ".claude";

/// Resolved paths for a superbeads project. All paths are absolute.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    /// Project root (the directory containing `.superbeads/`).
    pub root: PathBuf,

    /// `{root}/.superbeads/`
    pub state_dir: PathBuf,

    /// `{root}/.superbeads/sprint/`
    pub sprint_dir: PathBuf,

    /// `{root}/.claude/`
    pub claude_dir: PathBuf,
}

impl ProjectContext {
    /// Resolve the project from the current working directory.
    pub fn resolve() -> Result<Self> {
        Self::resolve_from(current_dir()?)
    }

    /// Resolve the project by walking up from `start`.
    pub fn resolve_from<P: AsRef<Path>>(start: P) -> Result<Self> {
        let start = absolutize(start.as_ref())?;

        start
            .ancestors()
            .map(|dir| Self::rooted_at(dir.to_path_buf()))
            .find(Self::is_initialized)
            .ok_or_else(|| {
                SuperbeadsError::UserError(format!(
                    "not a superbeads project (no {}/{} found in '{}' or any parent).\n\n\
                     Run `superbeads init` to initialize one.",
                    STATE_DIR,
                    SETTINGS_FILE,
                    start.display()
                ))
            })
    }

    /// Build a context rooted at `root` without requiring `.superbeads/` to exist.
    ///
    /// Used by `init`, which creates the state directory.
    pub fn for_init<P: AsRef<Path>>(root: P) -> Result<Self> {
        Ok(Self::rooted_at(absolutize(root.as_ref())?))
    }

    fn rooted_at(root: PathBuf) -> Self {
        let state_dir = root.join(STATE_DIR);
        let sprint_dir = state_dir.join("sprint");
        let claude_dir = root.join(CLAUDE_DIR);
        Self {
            root,
            state_dir,
            sprint_dir,
            claude_dir,
        }
    }

    /// Whether `.superbeads/settings.json` exists.
    pub fn is_initialized(&self) -> bool {
        self.settings_path().is_file()
    }

    pub fn settings_path(&self) -> PathBuf {
        self.state_dir.join(SETTINGS_FILE)
    }

    pub fn events_path(&self) -> PathBuf {
        self.state_dir.join("events.ndjson")
    }

    pub fn current_sprint_path(&self) -> PathBuf {
        self.sprint_dir.join("current.json")
    }

    pub fn progress_path(&self) -> PathBuf {
        self.sprint_dir.join("progress.md")
    }

    pub fn archive_dir(&self) -> PathBuf {
        self.sprint_dir.join("archive")
    }

    pub fn claude_md_path(&self) -> PathBuf {
        self.root.join("CLAUDE.md")
    }

    pub fn agents_dir(&self) -> PathBuf {
        self.claude_dir.join("agents")
    }

    /// Directory for one pack's skill templates.
    pub fn skills_dir(&self, pack: &str) -> PathBuf {
        self.claude_dir.join("skills").join(pack)
    }

    /// Path relative to the project root, for display.
    pub fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }
}

/// Resolve the project from the cwd, failing with a helpful message if absent.
pub fn require_initialized_project() -> Result<ProjectContext> {
    ProjectContext::resolve()
}

fn current_dir() -> Result<PathBuf> {
    env::current_dir().map_err(|e| {
        SuperbeadsError::UserError(format!("failed to get current working directory: {}", e))
    })
}

/// Join a relative path onto the working directory.
pub(crate) fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(current_dir()?.join(path))
    }
}
