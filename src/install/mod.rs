//! User-level installation.
//!
//! `superbeads install` copies the running binary and the embedded templates
//! into a prefix (default `~/.superbeads`) and puts `<prefix>/bin` on PATH by
//! appending one export line to the user's shell rc file. Re-running is safe:
//! files are refreshed and the export line is never duplicated.

mod shell_rc;

use crate::context::absolutize;
use crate::error::{Result, SuperbeadsError};
use crate::fs::{atomic_write_file, ensure_dir};
use crate::packs::PACKS;
use crate::templates::{self, EmbeddedTemplate};
use crate::tools::{self, PREREQUISITES};
use std::path::{Path, PathBuf};

pub use shell_rc::{PathLineOutcome, default_rc_file, ensure_path_line, path_export_line};

/// Name of the installed binary.
pub const BINARY_NAME: &str = "superbeads";

/// Default install prefix under the home directory.
pub const DEFAULT_PREFIX_DIR: &str = ".superbeads";

/// Flags accepted by `superbeads install`.
#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    pub prefix: Option<PathBuf>,
    pub no_path: bool,
    pub rc_file: Option<PathBuf>,
}

/// A fully resolved installation plan.
#[derive(Debug, Clone)]
pub struct Installer {
    pub prefix: PathBuf,
    /// Shell rc file to update; `None` with `--no-path`.
    pub rc_file: Option<PathBuf>,
    /// Binary copied to `<prefix>/bin/superbeads`.
    pub source_exe: PathBuf,
}

/// What an installation did.
#[derive(Debug, Clone)]
pub struct InstallReport {
    pub binary: PathBuf,
    pub templates_dir: PathBuf,
    pub templates_written: usize,
    pub missing_prerequisites: Vec<String>,
    pub path_line: PathLineOutcome,
}

impl Installer {
    /// Resolve defaults: home-relative prefix, rc file from `$SHELL`, current executable.
    ///
    /// Relative `--prefix` and `--rc-file` values are made absolute against the
    /// working directory so the exported PATH entry works from anywhere.
    pub fn from_options(opts: &InstallOptions) -> Result<Self> {
        let home = dirs::home_dir();
        let home_required = || {
            home.clone().ok_or_else(|| {
                SuperbeadsError::UserError(
                    "could not determine home directory.\n\nPass --prefix and --rc-file explicitly."
                        .to_string(),
                )
            })
        };

        let prefix = match &opts.prefix {
            Some(prefix) => absolutize(prefix)?,
            None => home_required()?.join(DEFAULT_PREFIX_DIR),
        };

        let rc_file = if opts.no_path {
            None
        } else {
            match &opts.rc_file {
                Some(rc) => Some(absolutize(rc)?),
                None => {
                    let shell = std::env::var("SHELL").ok();
                    Some(default_rc_file(shell.as_deref(), &home_required()?))
                }
            }
        };

        let source_exe = std::env::current_exe().map_err(|e| {
            SuperbeadsError::UserError(format!("failed to locate the running executable: {}", e))
        })?;

        Ok(Self {
            prefix,
            rc_file,
            source_exe,
        })
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.prefix.join("bin")
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.prefix.join("templates")
    }

    /// Run the installation.
    pub fn run(&self) -> Result<InstallReport> {
        let missing_prerequisites: Vec<String> = tools::probe_all(PREREQUISITES)
            .into_iter()
            .filter(|t| !t.is_installed())
            .map(|t| t.name)
            .collect();
        for name in &missing_prerequisites {
            log::warn!("prerequisite '{}' not found on PATH", name);
        }

        let bin_dir = self.bin_dir();
        let templates_dir = self.templates_dir();
        ensure_prefix_dir(&bin_dir)?;
        ensure_prefix_dir(&templates_dir)?;

        let binary = bin_dir.join(BINARY_NAME);
        self.install_binary(&binary)?;
        let templates_written = write_templates(&templates_dir)?;

        let path_line = match &self.rc_file {
            Some(rc) => ensure_path_line(rc, &path_export_line(&bin_dir))?,
            None => PathLineOutcome::Disabled,
        };

        Ok(InstallReport {
            binary,
            templates_dir,
            templates_written,
            missing_prerequisites,
            path_line,
        })
    }

    fn install_binary(&self, dest: &Path) -> Result<()> {
        if same_file(&self.source_exe, dest) {
            log::info!("{} is already the installed binary", dest.display());
            return Ok(());
        }

        std::fs::copy(&self.source_exe, dest).map_err(|e| {
            SuperbeadsError::UserError(format!(
                "failed to copy '{}' to '{}': {}",
                self.source_exe.display(),
                dest.display(),
                e
            ))
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(dest, std::fs::Permissions::from_mode(0o755)).map_err(|e| {
                SuperbeadsError::UserError(format!(
                    "failed to make '{}' executable: {}",
                    dest.display(),
                    e
                ))
            })?;
        }

        log::info!("installed binary to {}", dest.display());
        Ok(())
    }
}

fn ensure_prefix_dir(dir: &Path) -> Result<()> {
    ensure_dir(dir).map_err(|e| {
        SuperbeadsError::UserError(format!(
            "{}\n\nChoose a writable location with --prefix.",
            e
        ))
    })
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Write every embedded template below `dir`, mirroring the source layout.
fn write_templates(dir: &Path) -> Result<usize> {
    let mut count = 0;

    atomic_write_file(dir.join("CLAUDE.md"), templates::CLAUDE_MD)?;
    count += 1;

    count += write_set(&dir.join("agents"), templates::CORE_AGENTS)?;
    for pack in PACKS {
        let pack_dir = dir.join("packs").join(pack.name);
        count += write_set(&pack_dir.join("agents"), pack.agents)?;
        count += write_set(&pack_dir.join("skills"), pack.skills)?;
    }

    Ok(count)
}

fn write_set(dir: &Path, set: &[EmbeddedTemplate]) -> Result<usize> {
    if set.is_empty() {
        return Ok(0);
    }
    ensure_dir(dir)?;
    for template in set {
        atomic_write_file(dir.join(template.file_name), template.content)?;
    }
    Ok(set.len())
}
