//! Shell rc file handling for `install`.

use crate::error::{Result, SuperbeadsError};
use crate::fs::ensure_dir;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

const MARKER_COMMENT: &str = "# Added by superbeads install";

/// Result of making sure the PATH export is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathLineOutcome {
    Added(PathBuf),
    AlreadyPresent(PathBuf),
    /// `--no-path` was given.
    Disabled,
}

/// rc file for a login shell: zsh → `.zshrc`, bash → `.bashrc`, else `.profile`.
pub fn default_rc_file(shell: Option<&str>, home: &Path) -> PathBuf {
    let shell_name = shell
        .and_then(|s| Path::new(s).file_name())
        .and_then(|n| n.to_str())
        .unwrap_or("");

    match shell_name {
        "zsh" => home.join(".zshrc"),
        "bash" => home.join(".bashrc"),
        _ => home.join(".profile"),
    }
}

pub fn path_export_line(bin_dir: &Path) -> String {
    format!("export PATH=\"{}:$PATH\"", bin_dir.display())
}

/// Append `line` to `rc` unless an identical line is already there.
pub fn ensure_path_line(rc: &Path, line: &str) -> Result<PathLineOutcome> {
    let existing = match std::fs::read_to_string(rc) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => {
            return Err(SuperbeadsError::UserError(format!(
                "failed to read '{}': {}",
                rc.display(),
                e
            )));
        }
    };

    if existing.lines().any(|l| l.trim() == line) {
        log::info!("PATH line already present in {}", rc.display());
        return Ok(PathLineOutcome::AlreadyPresent(rc.to_path_buf()));
    }

    if let Some(parent) = rc.parent() {
        ensure_dir(parent)?;
    }

    let mut block = String::new();
    if !existing.is_empty() && !existing.ends_with('\n') {
        block.push('\n');
    }
    block.push('\n');
    block.push_str(MARKER_COMMENT);
    block.push('\n');
    block.push_str(line);
    block.push('\n');

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(rc)
        .map_err(|e| {
            SuperbeadsError::UserError(format!("failed to open '{}': {}", rc.display(), e))
        })?;
    file.write_all(block.as_bytes()).map_err(|e| {
        SuperbeadsError::UserError(format!("failed to write '{}': {}", rc.display(), e))
    })?;

    Ok(PathLineOutcome::Added(rc.to_path_buf()))
}
