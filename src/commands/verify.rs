//! Implementation of the `superbeads verify` command.

use crate::cli::VerifyArgs;
use crate::config::Settings;
use crate::context::{ProjectContext, require_initialized_project};
use crate::error::{Result, SuperbeadsError};
use crate::events::{Event, EventAction, record_event};
use crate::verify::{StepResult, StepStatus, VerifyOptions, VerifyReport, resolve_steps, run_steps};
use colored::Colorize;
use serde_json::json;

pub fn cmd_verify(args: VerifyArgs) -> Result<()> {
    let ctx = require_initialized_project()?;
    let report = run_verify(&ctx, &args, true)?;
    finish(&report)
}

/// Resolve and run the steps, logging a `verify` event. Does not fail on
/// step failures; see [`finish`].
pub(crate) fn run_verify(ctx: &ProjectContext, args: &VerifyArgs, print: bool) -> Result<VerifyReport> {
    let settings = Settings::load(ctx.settings_path())?;
    let (source, steps) = resolve_steps(&settings, args.pack.as_deref())?;

    if print {
        let mode = if args.quick { " (quick)" } else { "" };
        println!("Verifying with {}{}", source.to_string().bold(), mode);
        println!();
    }

    let opts = VerifyOptions {
        quick: args.quick,
        verbose: args.verbose,
        fail_fast: args.fail_fast,
    };
    let report = run_steps(&steps, &ctx.root, &opts);

    if print {
        for result in &report.results {
            print_result(result);
        }
        println!();
        let summary = report.summary();
        if report.is_success() {
            println!("{}", summary.green());
        } else {
            println!("{}", summary.red());
        }
    }

    record_event(
        ctx,
        Event::new(EventAction::Verify).with_details(json!({
            "source": source.to_string(),
            "quick": args.quick,
            "passed": report.is_success(),
            "passed_count": report.passed(),
            "failed_count": report.failed(),
            "skipped_count": report.skipped(),
            "failed_steps": report
                .results
                .iter()
                .filter(|r| r.status == StepStatus::Fail)
                .map(|r| r.name.as_str())
                .collect::<Vec<_>>(),
        })),
    );

    Ok(report)
}

fn print_result(result: &StepResult) {
    let label = match result.status {
        StepStatus::Pass => "PASS".green().bold(),
        StepStatus::Fail => "FAIL".red().bold(),
        StepStatus::Skip => "SKIP".yellow(),
    };
    let secs = result.duration.as_secs_f32();
    if result.status == StepStatus::Skip {
        println!("  {} {}", label, result.name);
    } else {
        println!("  {} {} ({:.1}s)", label, result.name, secs);
    }

    if let Some(message) = &result.message {
        for line in message.lines() {
            println!("       {}", line.dimmed());
        }
    }
    if let Some(output) = &result.output {
        for line in output.lines() {
            println!("       | {}", line);
        }
    }
}

fn finish(report: &VerifyReport) -> Result<()> {
    if report.is_success() {
        Ok(())
    } else {
        Err(SuperbeadsError::VerificationFailed(report.summary()))
    }
}
