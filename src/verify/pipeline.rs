//! Running verification steps.

use crate::config::{StepKind, VerifyStep};
use std::path::Path;
use std::process::Command;
use std::time::{Duration, Instant};

/// Maximum number of output lines kept for a failing step.
pub const OUTPUT_MAX_LINES: usize = 50;

/// Maximum characters kept for a failing step's output.
pub const OUTPUT_MAX_CHARS: usize = 4096;

#[derive(Debug, Clone, Copy, Default)]
pub struct VerifyOptions {
    /// Skip steps marked `skip_in_quick` (build steps by default).
    pub quick: bool,
    /// Keep output for passing steps as well.
    pub verbose: bool,
    /// Stop at the first failure; remaining steps are reported as skipped.
    pub fail_fast: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Pass,
    Fail,
    Skip,
}

#[derive(Debug, Clone)]
pub struct StepResult {
    pub name: String,
    pub kind: StepKind,
    pub status: StepStatus,
    /// Why a step failed or was skipped.
    pub message: Option<String>,
    /// Tail of the command output (failures, or everything with `verbose`).
    pub output: Option<String>,
    pub duration: Duration,
}

impl StepResult {
    fn skip(step: &VerifyStep, reason: &str) -> Self {
        Self {
            name: step.name.clone(),
            kind: step.kind,
            status: StepStatus::Skip,
            message: Some(reason.to_string()),
            output: None,
            duration: Duration::ZERO,
        }
    }

    fn fail(step: &VerifyStep, message: String, duration: Duration) -> Self {
        Self {
            name: step.name.clone(),
            kind: step.kind,
            status: StepStatus::Fail,
            message: Some(message),
            output: None,
            duration,
        }
    }
}

/// Results of a verification run.
#[derive(Debug, Clone, Default)]
pub struct VerifyReport {
    pub results: Vec<StepResult>,
}

impl VerifyReport {
    fn count(&self, status: StepStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    pub fn passed(&self) -> usize {
        self.count(StepStatus::Pass)
    }

    pub fn failed(&self) -> usize {
        self.count(StepStatus::Fail)
    }

    pub fn skipped(&self) -> usize {
        self.count(StepStatus::Skip)
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn summary(&self) -> String {
        format!(
            "{} passed, {} failed, {} skipped",
            self.passed(),
            self.failed(),
            self.skipped()
        )
    }
}

/// Run `steps` in order inside `root`.
pub fn run_steps(steps: &[VerifyStep], root: &Path, opts: &VerifyOptions) -> VerifyReport {
    let mut report = VerifyReport::default();
    let mut stopped = false;

    for step in steps {
        if stopped {
            report
                .results
                .push(StepResult::skip(step, "skipped after earlier failure (--fail-fast)"));
            continue;
        }
        if opts.quick && step.skipped_in_quick() {
            report.results.push(StepResult::skip(step, "skipped in quick mode"));
            continue;
        }

        log::info!("running verify step '{}': {}", step.name, step.command);
        let result = run_step(step, root, opts.verbose);
        if result.status == StepStatus::Fail && opts.fail_fast {
            stopped = true;
        }
        report.results.push(result);
    }

    report
}

fn run_step(step: &VerifyStep, root: &Path, verbose: bool) -> StepResult {
    let started = Instant::now();
    let command = step.command.trim();

    let args = match shell_words::split(command) {
        Ok(args) if !args.is_empty() => args,
        Ok(_) => return StepResult::fail(step, "command is empty".to_string(), started.elapsed()),
        Err(e) => {
            return StepResult::fail(
                step,
                format!(
                    "failed to parse command: {}\nCommand: {}\nFix: check for unmatched quotes.",
                    e, command
                ),
                started.elapsed(),
            );
        }
    };

    let output = match Command::new(&args[0]).args(&args[1..]).current_dir(root).output() {
        Ok(output) => output,
        Err(e) => {
            return StepResult::fail(
                step,
                format!(
                    "failed to execute command: {}\nCommand: {}\nFix: ensure '{}' is installed and in PATH.",
                    e, command, args[0]
                ),
                started.elapsed(),
            );
        }
    };
    let duration = started.elapsed();

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let combined = match (stdout.trim().is_empty(), stderr.trim().is_empty()) {
        (_, true) => stdout.to_string(),
        (true, false) => stderr.to_string(),
        (false, false) => format!("{}\n{}", stdout, stderr),
    };
    let tail = truncate_output(&combined, OUTPUT_MAX_LINES, OUTPUT_MAX_CHARS);
    let tail = (!tail.trim().is_empty()).then_some(tail);

    if output.status.success() {
        return StepResult {
            name: step.name.clone(),
            kind: step.kind,
            status: StepStatus::Pass,
            message: None,
            output: if verbose { tail } else { None },
            duration,
        };
    }

    let exit = output
        .status
        .code()
        .map(|c| c.to_string())
        .unwrap_or_else(|| "signal".to_string());
    let mut result = StepResult::fail(
        step,
        format!("command exited with {}\nCommand: {}", exit, command),
        duration,
    );
    result.output = tail;
    result
}

/// Keep the last `max_lines` lines, then at most `max_chars` trailing characters.
fn truncate_output(output: &str, max_lines: usize, max_chars: usize) -> String {
    let lines: Vec<&str> = output.lines().collect();
    let start = lines.len().saturating_sub(max_lines);
    let result = lines[start..].join("\n");

    if result.len() <= max_chars {
        return result;
    }

    let mut cut = result.len() - max_chars;
    while !result.is_char_boundary(cut) {
        cut += 1;
    }
    format!("...(truncated)...\n{}", &result[cut..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn step(name: &str, kind: StepKind, command: &str) -> VerifyStep {
        VerifyStep::new(name, kind, command)
    }

    #[test]
    fn truncate_keeps_tail_lines() {
        let text: String = (1..=60).map(|i| format!("line {}\n", i)).collect();
        let out = truncate_output(&text, 50, 10_000);
        assert!(out.starts_with("line 11"));
        assert!(out.ends_with("line 60"));
    }

    #[test]
    fn truncate_limits_chars_on_char_boundary() {
        let text = "é".repeat(100);
        let out = truncate_output(&text, 50, 11);
        assert!(out.starts_with("...(truncated)...\n"));
        assert!(out.len() <= "...(truncated)...\n".len() + 12);
    }

    #[test]
    fn empty_command_fails() {
        let temp = TempDir::new().unwrap();
        let report = run_steps(&[step("lint", StepKind::Lint, "  ")], temp.path(), &VerifyOptions::default());
        assert_eq!(report.failed(), 1);
        assert!(report.results[0].message.as_deref().unwrap().contains("empty"));
    }

    #[test]
    fn unmatched_quote_fails() {
        let temp = TempDir::new().unwrap();
        let report = run_steps(
            &[step("lint", StepKind::Lint, "echo 'oops")],
            temp.path(),
            &VerifyOptions::default(),
        );
        assert!(report.results[0].message.as_deref().unwrap().contains("failed to parse"));
    }

    #[test]
    fn missing_binary_fails_with_hint() {
        let temp = TempDir::new().unwrap();
        let report = run_steps(
            &[step("lint", StepKind::Lint, "definitely-not-a-real-binary-xyz")],
            temp.path(),
            &VerifyOptions::default(),
        );
        assert_eq!(report.failed(), 1);
        assert!(report.results[0].message.as_deref().unwrap().contains("installed and in PATH"));
    }

    #[cfg(unix)]
    #[test]
    fn counts_pass_and_fail_and_keeps_going() {
        let temp = TempDir::new().unwrap();
        let steps = [
            step("lint", StepKind::Lint, "sh -c 'exit 0'"),
            step("test", StepKind::Test, "sh -c 'echo broken >&2; exit 3'"),
            step("build", StepKind::Build, "sh -c 'exit 0'"),
        ];

        let report = run_steps(&steps, temp.path(), &VerifyOptions::default());

        assert_eq!(report.passed(), 2);
        assert_eq!(report.failed(), 1);
        assert!(!report.is_success());
        assert_eq!(report.summary(), "2 passed, 1 failed, 0 skipped");

        let failed = &report.results[1];
        assert!(failed.message.as_deref().unwrap().contains("exited with 3"));
        assert_eq!(failed.output.as_deref(), Some("broken"));
    }

    #[cfg(unix)]
    #[test]
    fn quick_mode_skips_build_and_succeeds() {
        let temp = TempDir::new().unwrap();
        let steps = [
            step("lint", StepKind::Lint, "sh -c 'exit 0'"),
            step("typecheck", StepKind::Typecheck, "sh -c 'exit 0'"),
            step("test", StepKind::Test, "sh -c 'exit 0'"),
            step("build", StepKind::Build, "sh -c 'exit 1'"),
        ];
        let opts = VerifyOptions {
            quick: true,
            ..Default::default()
        };

        let report = run_steps(&steps, temp.path(), &opts);

        assert!(report.is_success());
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.results[3].status, StepStatus::Skip);
    }

    #[cfg(unix)]
    #[test]
    fn fail_fast_skips_remaining_steps() {
        let temp = TempDir::new().unwrap();
        let steps = [
            step("lint", StepKind::Lint, "sh -c 'exit 1'"),
            step("test", StepKind::Test, "sh -c 'exit 0'"),
        ];
        let opts = VerifyOptions {
            fail_fast: true,
            ..Default::default()
        };

        let report = run_steps(&steps, temp.path(), &opts);

        assert_eq!(report.failed(), 1);
        assert_eq!(report.skipped(), 1);
        assert!(report.results[1].message.as_deref().unwrap().contains("--fail-fast"));
    }

    #[cfg(unix)]
    #[test]
    fn verbose_keeps_output_of_passing_steps() {
        let temp = TempDir::new().unwrap();
        let steps = [step("lint", StepKind::Lint, "sh -c 'echo all clean'")];

        let quiet = run_steps(&steps, temp.path(), &VerifyOptions::default());
        assert!(quiet.results[0].output.is_none());

        let opts = VerifyOptions {
            verbose: true,
            ..Default::default()
        };
        let loud = run_steps(&steps, temp.path(), &opts);
        assert_eq!(loud.results[0].output.as_deref(), Some("all clean"));
    }

    #[cfg(unix)]
    #[test]
    fn steps_run_in_project_root() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("marker.txt"), "").unwrap();
        let steps = [step("check", StepKind::Custom, "test -f marker.txt")];

        let report = run_steps(&steps, temp.path(), &VerifyOptions::default());
        assert!(report.is_success());
    }
}
