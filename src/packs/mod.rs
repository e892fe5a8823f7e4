//! Built-in pack registry.
//!
//! A pack is an optional, domain-specific bundle of agent and skill templates
//! plus default verification steps. Packs are compiled into the binary; the
//! project records which ones are installed in `settings.json`.

mod detect;
mod install;

use crate::config::{StepKind, VerifyStep};
use crate::error::{Result, SuperbeadsError};
use crate::templates::{self, EmbeddedTemplate};

pub use detect::detect_packs;
pub use install::{PackInstallReport, install_pack, uninstall_pack};

/// A verification step as declared by a pack.
#[derive(Debug, Clone, Copy)]
pub struct StepSpec {
    pub name: &'static str,
    pub kind: StepKind,
    pub command: &'static str,
}

/// A built-in pack.
#[derive(Debug)]
pub struct Pack {
    pub name: &'static str,
    pub description: &'static str,
    /// Glob patterns whose presence near the project root suggests this pack.
    pub markers: &'static [&'static str],
    pub agents: &'static [EmbeddedTemplate],
    pub skills: &'static [EmbeddedTemplate],
    pub verify: &'static [StepSpec],
}

impl Pack {
    /// Default verification steps for this pack.
    pub fn verify_steps(&self) -> Vec<VerifyStep> {
        self.verify
            .iter()
            .map(|s| VerifyStep::new(s.name, s.kind, s.command))
            .collect()
    }
}

const fn step(name: &'static str, kind: StepKind, command: &'static str) -> StepSpec {
    StepSpec {
        name,
        kind,
        command,
    }
}

/// All packs, in display order.
pub static PACKS: &[Pack] = &[
    Pack {
        name: "ios",
        description: "iOS apps with SwiftUI and Xcode",
        markers: &["*.xcodeproj", "*.xcworkspace", "Package.swift"],
        agents: templates::IOS_AGENTS,
        skills: templates::IOS_SKILLS,
        verify: &[
            step("lint", StepKind::Lint, "swiftlint lint --quiet"),
            step("test", StepKind::Test, "xcodebuild test -quiet"),
            step("build", StepKind::Build, "xcodebuild build -quiet"),
        ],
    },
    Pack {
        name: "python",
        description: "Python packages and services",
        markers: &["pyproject.toml", "setup.py", "requirements.txt"],
        agents: templates::PYTHON_AGENTS,
        skills: templates::PYTHON_SKILLS,
        verify: &[
            step("lint", StepKind::Lint, "ruff check ."),
            step("typecheck", StepKind::Typecheck, "mypy ."),
            step("test", StepKind::Test, "pytest -q"),
        ],
    },
    Pack {
        name: "web",
        description: "TypeScript/React web frontends",
        markers: &["package.json", "tsconfig.json"],
        agents: templates::WEB_AGENTS,
        skills: templates::WEB_SKILLS,
        verify: &[
            step("lint", StepKind::Lint, "npm run lint"),
            step("typecheck", StepKind::Typecheck, "npx tsc --noEmit"),
            step("test", StepKind::Test, "npm test"),
            step("build", StepKind::Build, "npm run build"),
        ],
    },
    Pack {
        name: "design",
        description: "Design reviews and design-system consistency",
        markers: &["*.fig", "*.sketch", "design-tokens.json"],
        agents: templates::DESIGN_AGENTS,
        skills: templates::DESIGN_SKILLS,
        verify: &[],
    },
    Pack {
        name: "pm",
        description: "Product management: goals, scope and task sizing",
        markers: &[],
        agents: templates::PM_AGENTS,
        skills: templates::PM_SKILLS,
        verify: &[],
    },
];

/// Look up a pack by name (case-insensitive).
pub fn find_pack(name: &str) -> Result<&'static Pack> {
    let wanted = name.trim().to_lowercase();
    PACKS
        .iter()
        .find(|p| p.name == wanted)
        .ok_or_else(|| SuperbeadsError::PackNotFound {
            name: name.to_string(),
            available: pack_names().join(", "),
        })
}

pub fn pack_names() -> Vec<&'static str> {
    PACKS.iter().map(|p| p.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit_codes;
    use std::collections::HashSet;

    #[test]
    fn pack_names_are_unique() {
        let names: HashSet<_> = PACKS.iter().map(|p| p.name).collect();
        assert_eq!(names.len(), PACKS.len());
    }

    #[test]
    fn find_pack_is_case_insensitive() {
        assert_eq!(find_pack("Web").unwrap().name, "web");
        assert_eq!(find_pack(" python ").unwrap().name, "python");
    }

    #[test]
    fn find_unknown_pack_has_pack_not_found_exit_code() {
        let err = find_pack("android").unwrap_err();
        assert_eq!(err.exit_code(), exit_codes::PACK_NOT_FOUND);
        assert!(err.to_string().contains("ios, python, web, design, pm"));
    }

    #[test]
    fn web_pack_build_step_is_skipped_in_quick_mode() {
        let steps = find_pack("web").unwrap().verify_steps();
        let build = steps.iter().find(|s| s.kind == StepKind::Build).unwrap();
        assert!(build.skipped_in_quick());
        assert!(steps.iter().filter(|s| s.kind != StepKind::Build).all(|s| !s.skipped_in_quick()));
    }

    #[test]
    fn every_pack_ships_an_agent() {
        for pack in PACKS {
            assert!(!pack.agents.is_empty(), "pack {} has no agent", pack.name);
        }
    }
}
