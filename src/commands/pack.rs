//! `superbeads pack` subcommands.

use crate::cli::{PackAction, PackAddArgs, PackCommand, PackNameArgs};
use crate::config::Settings;
use crate::context::{ProjectContext, require_initialized_project};
use crate::error::{Result, SuperbeadsError};
use crate::events::{Event, EventAction, record_event};
use crate::packs::{
    PACKS, Pack, PackInstallReport, detect_packs, find_pack, install_pack, uninstall_pack,
};
use crate::templates::EmbeddedTemplate;
use colored::Colorize;
use serde_json::json;
use std::path::PathBuf;

pub fn dispatch(cmd: PackCommand) -> Result<()> {
    match cmd.action {
        PackAction::List => cmd_list(),
        PackAction::Show(args) => cmd_show(args),
        PackAction::Add(args) => cmd_add(args),
        PackAction::Remove(args) => cmd_remove(args),
        PackAction::Detect => cmd_detect(),
    }
}

/// Installed pack names, or empty outside a project.
fn installed_packs() -> Vec<String> {
    ProjectContext::resolve()
        .ok()
        .and_then(|ctx| Settings::load(ctx.settings_path()).ok())
        .map(|s| s.packs)
        .unwrap_or_default()
}

fn cmd_list() -> Result<()> {
    let installed = installed_packs();

    println!("{}", "Available packs:".bold());
    for pack in PACKS {
        let marker = if installed.iter().any(|p| p == pack.name) {
            "✓".green()
        } else {
            " ".normal()
        };
        println!("  {} {:8} {}", marker, pack.name, pack.description);
    }
    println!();
    println!("Install one with `superbeads pack add <name>`.");
    Ok(())
}

fn cmd_show(args: PackNameArgs) -> Result<()> {
    let pack = find_pack(&args.name)?;

    println!("{} - {}", pack.name.bold(), pack.description);
    println!();
    if !pack.markers.is_empty() {
        println!("Detected by: {}", pack.markers.join(", "));
        println!();
    }

    println!("{}", "Agents:".bold());
    for agent in pack.agents {
        println!("  {}", describe(agent));
    }

    println!("{}", "Skills:".bold());
    for skill in pack.skills {
        println!("  {}", describe(skill));
    }

    println!("{}", "Verification steps:".bold());
    if pack.verify.is_empty() {
        println!("  (none)");
    }
    for step in pack.verify {
        println!("  {:10} {}", step.kind.to_string(), step.command);
    }

    Ok(())
}

fn describe(template: &EmbeddedTemplate) -> String {
    match template.parse() {
        Ok(doc) => format!("{:20} {}", doc.meta.name, doc.meta.description),
        Err(e) => {
            log::warn!("template {} has bad frontmatter: {}", template.file_name, e);
            template.stem().to_string()
        }
    }
}

fn cmd_add(args: PackAddArgs) -> Result<()> {
    let ctx = require_initialized_project()?;
    let (pack, report) = add_pack(&ctx, &args.name, args.force)?;

    println!("Installed pack '{}'.", pack.name.bold());
    for path in &report.written {
        println!("  {} {}", "wrote".green(), ctx.relative(path).display());
    }
    for path in &report.skipped {
        println!("  {} {} (exists; use --force to overwrite)", "kept ".dimmed(), ctx.relative(path).display());
    }
    Ok(())
}

pub(crate) fn add_pack(
    ctx: &ProjectContext,
    name: &str,
    force: bool,
) -> Result<(&'static Pack, PackInstallReport)> {
    let pack = find_pack(name)?;
    let mut settings = Settings::load(ctx.settings_path())?;

    let report = install_pack(ctx, pack, force)?;
    let newly_added = settings.add_pack(pack.name);
    if newly_added {
        settings.save(ctx.settings_path())?;
    }

    record_event(
        ctx,
        Event::new(EventAction::PackAdd).with_details(json!({
            "pack": pack.name,
            "newly_added": newly_added,
            "written": report.written.len(),
            "kept": report.skipped.len(),
        })),
    );

    Ok((pack, report))
}

fn cmd_remove(args: PackNameArgs) -> Result<()> {
    let ctx = require_initialized_project()?;
    let (pack, removed) = remove_pack(&ctx, &args.name)?;

    println!("Removed pack '{}'.", pack.name.bold());
    for path in &removed {
        println!("  {} {}", "removed".red(), ctx.relative(path).display());
    }
    Ok(())
}

pub(crate) fn remove_pack(ctx: &ProjectContext, name: &str) -> Result<(&'static Pack, Vec<PathBuf>)> {
    let pack = find_pack(name)?;
    let mut settings = Settings::load(ctx.settings_path())?;

    if !settings.has_pack(pack.name) {
        return Err(SuperbeadsError::UserError(format!(
            "pack '{}' is not installed in this project.\n\nInstalled packs: {}",
            pack.name,
            super::join_or_dash(&settings.packs)
        )));
    }

    let removed = uninstall_pack(ctx, pack)?;
    settings.remove_pack(pack.name);
    settings.save(ctx.settings_path())?;

    record_event(
        ctx,
        Event::new(EventAction::PackRemove).with_details(json!({
            "pack": pack.name,
            "removed": removed.len(),
        })),
    );

    Ok((pack, removed))
}

fn cmd_detect() -> Result<()> {
    let root = match ProjectContext::resolve() {
        Ok(ctx) => ctx.root,
        Err(_) => std::env::current_dir().map_err(|e| {
            SuperbeadsError::UserError(format!("failed to get current working directory: {}", e))
        })?,
    };
    let installed = installed_packs();
    let detected = detect_packs(&root);

    if detected.is_empty() {
        println!("No packs detected in {}.", root.display());
        return Ok(());
    }

    println!("{}", "Detected packs:".bold());
    for pack in &detected {
        let note = if installed.iter().any(|p| p == pack.name) {
            "installed".green()
        } else {
            let hint = format!("superbeads pack add {}", pack.name);
            hint.as_str().cyan()
        };
        println!("  {:8} {}", pack.name, note);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::last_event;
    use crate::exit_codes;
    use crate::test_support::{context_for, create_test_project, create_test_project_with_packs};

    #[test]
    fn add_pack_installs_and_records() {
        let project = create_test_project();
        let ctx = context_for(&project);

        let (pack, report) = add_pack(&ctx, "python", false).unwrap();

        assert_eq!(pack.name, "python");
        assert_eq!(report.written.len(), pack.agents.len() + pack.skills.len());
        assert!(Settings::load(ctx.settings_path()).unwrap().has_pack("python"));

        let event = last_event(&ctx, EventAction::PackAdd).unwrap().unwrap();
        assert_eq!(event.details["pack"], "python");
        assert_eq!(event.details["newly_added"], true);
    }

    #[test]
    fn adding_twice_keeps_one_entry_and_existing_files() {
        let project = create_test_project();
        let ctx = context_for(&project);

        add_pack(&ctx, "web", false).unwrap();
        let (_, report) = add_pack(&ctx, "web", false).unwrap();

        assert!(report.written.is_empty());
        assert_eq!(Settings::load(ctx.settings_path()).unwrap().packs, vec!["web"]);
    }

    #[test]
    fn add_unknown_pack_is_exit_4() {
        let project = create_test_project();
        let ctx = context_for(&project);

        let err = add_pack(&ctx, "haskell", false).unwrap_err();
        assert_eq!(err.exit_code(), exit_codes::PACK_NOT_FOUND);
        assert!(err.to_string().contains("ios, python, web, design, pm"));
    }

    #[test]
    fn remove_pack_deletes_files_and_setting() {
        let project = create_test_project();
        let ctx = context_for(&project);
        add_pack(&ctx, "design", false).unwrap();

        let (_, removed) = remove_pack(&ctx, "design").unwrap();

        assert!(!removed.is_empty());
        assert!(!ctx.skills_dir("design").exists());
        assert!(!ctx.agents_dir().join("design-expert.md").exists());
        assert!(!Settings::load(ctx.settings_path()).unwrap().has_pack("design"));
    }

    #[test]
    fn remove_pack_not_installed_fails() {
        let project = create_test_project_with_packs(&["web"]);
        let ctx = context_for(&project);

        let err = remove_pack(&ctx, "ios").unwrap_err();
        assert_eq!(err.exit_code(), exit_codes::GENERAL_ERROR);
        assert!(err.to_string().contains("not installed"));
        assert!(err.to_string().contains("web"));
    }
}
