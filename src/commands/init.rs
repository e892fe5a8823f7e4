//! Implementation of the `superbeads init` command.
//!
//! # What `superbeads init` does
//!
//! 1. Creates `.superbeads/` and `.superbeads/sprint/`
//! 2. Writes `settings.json` (or updates an existing one)
//! 3. Renders `CLAUDE.md` at the project root
//! 4. Writes the four core agents to `.claude/agents/`
//! 5. Installs requested and, with `--detect`, detected packs
//!
//! Re-running is safe: existing files are kept unless `--force` is given.

use crate::cli::InitArgs;
use crate::config::Settings;
use crate::context::ProjectContext;
use crate::error::{Result, SuperbeadsError};
use crate::events::{Event, EventAction, record_event};
use crate::fs::{WriteOutcome, ensure_dir, write_template_file};
use crate::packs::{Pack, detect_packs, find_pack, install_pack};
use crate::templates::{self, CORE_AGENTS};
use chrono::Utc;
use colored::Colorize;
use serde_json::json;
use std::path::PathBuf;

/// What `init` did, for printing.
#[derive(Debug, Default)]
pub(crate) struct InitSummary {
    pub reinitialized: bool,
    pub project_name: String,
    pub written: Vec<PathBuf>,
    pub kept: Vec<PathBuf>,
    pub packs_added: Vec<&'static str>,
}

/// Execute the `superbeads init` command in the current directory.
pub fn cmd_init(args: InitArgs) -> Result<()> {
    let cwd = std::env::current_dir().map_err(|e| {
        SuperbeadsError::UserError(format!("failed to get current working directory: {}", e))
    })?;
    let ctx = ProjectContext::for_init(cwd)?;
    let summary = run_init(&ctx, &args)?;

    if summary.reinitialized {
        println!("Reinitialized superbeads project '{}'.", summary.project_name.bold());
    } else {
        println!("Initialized superbeads project '{}'.", summary.project_name.bold());
    }
    println!();
    for path in &summary.written {
        println!("  {} {}", "wrote".green(), ctx.relative(path).display());
    }
    for path in &summary.kept {
        println!("  {} {} (exists; use --force to overwrite)", "kept ".dimmed(), ctx.relative(path).display());
    }
    if !summary.packs_added.is_empty() {
        println!();
        println!("Packs installed: {}", summary.packs_added.join(", "));
    }
    println!();
    println!("Start a sprint with `superbeads sprint new \"<goal>\"`.");

    Ok(())
}

pub(crate) fn run_init(ctx: &ProjectContext, args: &InitArgs) -> Result<InitSummary> {
    // Resolve every pack before touching the filesystem so a typo fails cleanly.
    let mut packs: Vec<&'static Pack> = Vec::new();
    for name in &args.packs {
        let pack = find_pack(name)?;
        if !packs.iter().any(|p| p.name == pack.name) {
            packs.push(pack);
        }
    }
    if args.detect {
        for pack in detect_packs(&ctx.root) {
            if !packs.iter().any(|p| p.name == pack.name) {
                log::info!("detected pack '{}'", pack.name);
                packs.push(pack);
            }
        }
    }

    let reinitialized = ctx.is_initialized();
    let mut settings = if reinitialized {
        Settings::load(ctx.settings_path())?
    } else {
        Settings {
            created_at: Some(Utc::now()),
            ..Default::default()
        }
    };

    if let Some(name) = &args.name {
        let name = name.trim();
        if name.is_empty() {
            return Err(SuperbeadsError::InvalidArgs(
                "project name must not be empty".to_string(),
            ));
        }
        settings.project_name = name.to_string();
    } else if settings.project_name.is_empty() {
        settings.project_name = default_project_name(ctx);
    }

    let mut summary = InitSummary {
        reinitialized,
        project_name: settings.project_name.clone(),
        ..Default::default()
    };

    ensure_dir(&ctx.sprint_dir)?;

    for pack in &packs {
        if settings.add_pack(pack.name) {
            summary.packs_added.push(pack.name);
        }
    }
    settings.save(ctx.settings_path())?;

    let packs_text = packs_phrase(&settings.packs);
    let claude_md = templates::render(
        templates::CLAUDE_MD,
        &templates::vars([
            ("project_name", settings.project_name.as_str()),
            ("packs", packs_text.as_str()),
        ]),
    )
    .map_err(|e| SuperbeadsError::UserError(format!("failed to render CLAUDE.md: {}", e)))?;
    track(
        &mut summary,
        ctx.claude_md_path(),
        write_template_file(ctx.claude_md_path(), &claude_md, args.force)?,
    );

    let agents_dir = ctx.agents_dir();
    ensure_dir(&agents_dir)?;
    for agent in CORE_AGENTS {
        let path = agents_dir.join(agent.file_name);
        let outcome = write_template_file(&path, agent.content, args.force)?;
        track(&mut summary, path, outcome);
    }

    for pack in &packs {
        let report = install_pack(ctx, pack, args.force)?;
        summary.written.extend(report.written);
        summary.kept.extend(report.skipped);
    }

    record_event(
        ctx,
        Event::new(EventAction::Init).with_details(json!({
            "project_name": settings.project_name,
            "packs": settings.packs,
            "reinitialized": reinitialized,
            "force": args.force,
        })),
    );

    Ok(summary)
}

fn track(summary: &mut InitSummary, path: PathBuf, outcome: WriteOutcome) {
    match outcome {
        WriteOutcome::Skipped => summary.kept.push(path),
        WriteOutcome::Created | WriteOutcome::Overwritten => summary.written.push(path),
    }
}

fn default_project_name(ctx: &ProjectContext) -> String {
    ctx.root
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "project".to_string())
}

fn packs_phrase(packs: &[String]) -> String {
    if packs.is_empty() {
        "no packs installed".to_string()
    } else {
        packs.join(", ")
    }
}
