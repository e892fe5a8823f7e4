//! Implementation of the `superbeads versions` command.
//!
//! Diagnostic output only: this command never fails.

use crate::config::Settings;
use crate::context::ProjectContext;
use crate::error::Result;
use crate::tools::{self, REPORTED_TOOLS};
use colored::Colorize;

pub fn cmd_versions() -> Result<()> {
    println!("superbeads {}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("{}", "Tools:".bold());
    for tool in tools::probe_all(REPORTED_TOOLS) {
        let version = tool.display_version();
        if tool.is_installed() {
            println!("  {:8} {}", tool.name, version);
        } else {
            println!("  {:8} {}", tool.name, version.dimmed());
        }
    }
    println!();

    println!("{}", "Packs:".bold());
    println!("  {}", packs_line(project_packs()));
    Ok(())
}

/// Installed packs of the enclosing project, `None` outside one.
fn project_packs() -> Option<Vec<String>> {
    let ctx = ProjectContext::resolve().ok()?;
    match Settings::load(ctx.settings_path()) {
        Ok(settings) => Some(settings.packs),
        Err(e) => {
            log::warn!("ignoring unreadable settings: {}", e);
            None
        }
    }
}

fn packs_line(packs: Option<Vec<String>>) -> String {
    match packs {
        None => "(no project)".to_string(),
        Some(packs) if packs.is_empty() => "(none installed)".to_string(),
        Some(packs) => packs.join(", "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{DirGuard, create_test_project_with_packs};
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn packs_line_variants() {
        assert_eq!(packs_line(None), "(no project)");
        assert_eq!(packs_line(Some(vec![])), "(none installed)");
        assert_eq!(
            packs_line(Some(vec!["web".to_string(), "pm".to_string()])),
            "web, pm"
        );
    }

    #[test]
    #[serial]
    fn project_packs_outside_project_is_none() {
        let temp = TempDir::new().unwrap();
        let _guard = DirGuard::new(temp.path());
        assert!(project_packs().is_none());
        assert!(cmd_versions().is_ok());
    }

    #[test]
    #[serial]
    fn project_packs_inside_project() {
        let project = create_test_project_with_packs(&["python"]);
        let _guard = DirGuard::new(project.path());
        assert_eq!(project_packs(), Some(vec!["python".to_string()]));
    }
}
