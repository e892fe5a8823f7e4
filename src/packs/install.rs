//! Writing and removing a pack's templates in a project.

use super::Pack;
use crate::context::ProjectContext;
use crate::error::{Result, SuperbeadsError};
use crate::fs::{WriteOutcome, ensure_dir, write_template_file};
use std::path::PathBuf;

/// Files touched by [`install_pack`].
#[derive(Debug, Default)]
pub struct PackInstallReport {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// Write the pack's agents to `.claude/agents/` and skills to
/// `.claude/skills/<pack>/`. Existing files are kept unless `force` is set.
pub fn install_pack(ctx: &ProjectContext, pack: &Pack, force: bool) -> Result<PackInstallReport> {
    let mut report = PackInstallReport::default();

    let agents_dir = ctx.agents_dir();
    let skills_dir = ctx.skills_dir(pack.name);
    ensure_dir(&agents_dir)?;
    ensure_dir(&skills_dir)?;

    let targets = pack
        .agents
        .iter()
        .map(|t| (agents_dir.join(t.file_name), t))
        .chain(pack.skills.iter().map(|t| (skills_dir.join(t.file_name), t)));

    for (path, template) in targets {
        match write_template_file(&path, template.content, force)? {
            WriteOutcome::Skipped => report.skipped.push(path),
            WriteOutcome::Created | WriteOutcome::Overwritten => report.written.push(path),
        }
    }

    log::info!(
        "pack '{}' installed: {} written, {} kept",
        pack.name,
        report.written.len(),
        report.skipped.len()
    );
    Ok(report)
}

/// Remove the pack's agent files and its skills directory.
///
/// Returns the paths that were removed. Missing files are not an error.
pub fn uninstall_pack(ctx: &ProjectContext, pack: &Pack) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();

    for agent in pack.agents {
        let path = ctx.agents_dir().join(agent.file_name);
        if path.exists() {
            std::fs::remove_file(&path).map_err(|e| {
                SuperbeadsError::UserError(format!(
                    "failed to remove '{}': {}",
                    path.display(),
                    e
                ))
            })?;
            removed.push(path);
        }
    }

    let skills_dir = ctx.skills_dir(pack.name);
    if skills_dir.exists() {
        std::fs::remove_dir_all(&skills_dir).map_err(|e| {
            SuperbeadsError::UserError(format!(
                "failed to remove '{}': {}",
                skills_dir.display(),
                e
            ))
        })?;
        removed.push(skills_dir);
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packs::find_pack;
    use crate::test_support::{context_for, create_test_project};

    #[test]
    fn install_writes_agents_and_skills() {
        let project = create_test_project();
        let ctx = context_for(&project);
        let pack = find_pack("python").unwrap();

        let report = install_pack(&ctx, pack, false).unwrap();

        assert_eq!(report.written.len(), pack.agents.len() + pack.skills.len());
        assert!(report.skipped.is_empty());
        assert!(ctx.agents_dir().join("python-expert.md").exists());
        assert!(ctx.skills_dir("python").join("pytest-testing.md").exists());
    }

    #[test]
    fn reinstall_keeps_edited_files_unless_forced() {
        let project = create_test_project();
        let ctx = context_for(&project);
        let pack = find_pack("web").unwrap();
        install_pack(&ctx, pack, false).unwrap();

        let edited = ctx.skills_dir("web").join("accessibility.md");
        std::fs::write(&edited, "local edits").unwrap();

        let report = install_pack(&ctx, pack, false).unwrap();
        assert!(report.written.is_empty());
        assert_eq!(std::fs::read_to_string(&edited).unwrap(), "local edits");

        install_pack(&ctx, pack, true).unwrap();
        assert_ne!(std::fs::read_to_string(&edited).unwrap(), "local edits");
    }

    #[test]
    fn uninstall_removes_only_pack_files() {
        let project = create_test_project();
        let ctx = context_for(&project);
        install_pack(&ctx, find_pack("web").unwrap(), false).unwrap();
        install_pack(&ctx, find_pack("pm").unwrap(), false).unwrap();

        let removed = uninstall_pack(&ctx, find_pack("web").unwrap()).unwrap();

        assert_eq!(removed.len(), 2);
        assert!(!ctx.skills_dir("web").exists());
        assert!(!ctx.agents_dir().join("web-expert.md").exists());
        assert!(ctx.agents_dir().join("product-manager.md").exists());
        assert!(ctx.skills_dir("pm").exists());
    }
}
