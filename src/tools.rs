//! External tool probing for `install` and `versions`.

use std::path::PathBuf;
use std::process::Command;

/// Tools `install` expects to find on PATH.
pub const PREREQUISITES: &[&str] = &["git", "claude"];

/// Tools reported by `versions`.
pub const REPORTED_TOOLS: &[&str] = &["git", "claude", "node", "python3", "jq"];

/// Result of looking up one tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInfo {
    pub name: String,
    pub path: Option<PathBuf>,
    /// First non-empty line of `<tool> --version`.
    pub version: Option<String>,
}

impl ToolInfo {
    pub fn is_installed(&self) -> bool {
        self.path.is_some()
    }

    /// Version line, or `not installed`.
    pub fn display_version(&self) -> String {
        match (&self.path, &self.version) {
            (None, _) => "not installed".to_string(),
            (Some(_), Some(v)) => v.clone(),
            (Some(_), None) => "installed (version unknown)".to_string(),
        }
    }
}

/// Look a tool up on PATH and ask it for its version.
pub fn probe(name: &str) -> ToolInfo {
    let path = which::which(name).ok();
    let version = path.as_ref().and_then(|p| {
        let output = Command::new(p).arg("--version").output().ok()?;
        let text = if output.stdout.is_empty() {
            output.stderr
        } else {
            output.stdout
        };
        first_line(&String::from_utf8_lossy(&text))
    });
    log::debug!("probed {}: path={:?} version={:?}", name, path, version);

    ToolInfo {
        name: name.to_string(),
        path,
        version,
    }
}

pub fn probe_all(names: &[&str]) -> Vec<ToolInfo> {
    names.iter().map(|n| probe(n)).collect()
}

fn first_line(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
}
