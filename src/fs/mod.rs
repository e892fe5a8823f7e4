//! Filesystem utilities for superbeads.
//!
//! State files (`settings.json`, `current.json`, `progress.md`) are always
//! written through [`atomic_write_file`] so an interrupted command never leaves
//! a half-written file behind.

pub mod atomic;

use crate::error::{Result, SuperbeadsError};
use std::path::Path;

pub use atomic::{atomic_write, atomic_write_file};

/// Create a directory and all of its parents.
pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    std::fs::create_dir_all(path).map_err(|e| {
        SuperbeadsError::UserError(format!(
            "failed to create directory '{}': {}",
            path.display(),
            e
        ))
    })
}

/// Outcome of [`write_template_file`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Created,
    Overwritten,
    Skipped,
}

/// Write a generated file, leaving an existing one alone unless `force` is set.
pub fn write_template_file<P: AsRef<Path>>(
    path: P,
    content: &str,
    force: bool,
) -> Result<WriteOutcome> {
    let path = path.as_ref();
    let existed = path.exists();
    if existed && !force {
        log::debug!("keeping existing file {}", path.display());
        return Ok(WriteOutcome::Skipped);
    }

    atomic_write_file(path, content)?;
    Ok(if existed {
        WriteOutcome::Overwritten
    } else {
        WriteOutcome::Created
    })
}

/// Read a file to a string, mapping the error to a user-facing message.
pub fn read_to_string<P: AsRef<Path>>(path: P, what: &str) -> Result<String> {
    let path = path.as_ref();
    std::fs::read_to_string(path).map_err(|e| {
        SuperbeadsError::UserError(format!(
            "failed to read {} '{}': {}",
            what,
            path.display(),
            e
        ))
    })
}
