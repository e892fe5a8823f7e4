//! Project verification.
//!
//! Runs the project's own lint, typecheck, test and build commands and folds
//! the results into one pass/fail signal. Steps come from, in order of
//! precedence:
//!
//! 1. an explicit `--pack`
//! 2. `verify.steps` in `settings.json`
//! 3. the first installed pack that declares steps

pub mod pipeline;

use crate::config::{Settings, VerifyStep};
use crate::error::{Result, SuperbeadsError};
use crate::packs::{self, find_pack};

pub use pipeline::{StepResult, StepStatus, VerifyOptions, VerifyReport, run_steps};

/// Where the steps being run came from, for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepSource {
    Settings,
    Pack(&'static str),
}

impl std::fmt::Display for StepSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepSource::Settings => f.write_str("settings.json"),
            StepSource::Pack(name) => write!(f, "{} pack", name),
        }
    }
}

/// Pick the verification steps for this project.
pub fn resolve_steps(
    settings: &Settings,
    pack_override: Option<&str>,
) -> Result<(StepSource, Vec<VerifyStep>)> {
    if let Some(name) = pack_override {
        let pack = find_pack(name)?;
        if pack.verify.is_empty() {
            return Err(SuperbeadsError::UserError(format!(
                "pack '{}' declares no verification steps",
                pack.name
            )));
        }
        return Ok((StepSource::Pack(pack.name), pack.verify_steps()));
    }

    if let Some(profile) = &settings.verify
        && !profile.steps.is_empty()
    {
        return Ok((StepSource::Settings, profile.steps.clone()));
    }

    for name in &settings.packs {
        let pack = packs::find_pack(name)?;
        if !pack.verify.is_empty() {
            return Ok((StepSource::Pack(pack.name), pack.verify_steps()));
        }
    }

    Err(SuperbeadsError::UserError(
        "no verification steps configured.\n\n\
         Add a pack with steps (`superbeads pack add web`), pass `--pack <name>`, \
         or define `verify.steps` in .superbeads/settings.json."
            .to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{StepKind, VerifyProfile};
    use crate::exit_codes;

    #[test]
    fn explicit_pack_wins() {
        let settings = Settings {
            packs: vec!["python".to_string()],
            ..Default::default()
        };
        let (source, steps) = resolve_steps(&settings, Some("web")).unwrap();
        assert_eq!(source, StepSource::Pack("web"));
        assert_eq!(steps.len(), 4);
    }

    #[test]
    fn explicit_unknown_pack_is_pack_not_found() {
        let err = resolve_steps(&Settings::default(), Some("cobol")).unwrap_err();
        assert_eq!(err.exit_code(), exit_codes::PACK_NOT_FOUND);
    }

    #[test]
    fn explicit_pack_without_steps_is_an_error() {
        let err = resolve_steps(&Settings::default(), Some("design")).unwrap_err();
        assert!(err.to_string().contains("declares no verification steps"));
    }

    #[test]
    fn settings_override_beats_installed_packs() {
        let settings = Settings {
            packs: vec!["web".to_string()],
            verify: Some(VerifyProfile {
                steps: vec![VerifyStep::new("check", StepKind::Custom, "make check")],
                ..Default::default()
            }),
            ..Default::default()
        };
        let (source, steps) = resolve_steps(&settings, None).unwrap();
        assert_eq!(source, StepSource::Settings);
        assert_eq!(steps[0].command, "make check");
    }

    #[test]
    fn first_installed_pack_with_steps_is_used() {
        let settings = Settings {
            packs: vec!["pm".to_string(), "python".to_string(), "web".to_string()],
            ..Default::default()
        };
        let (source, _) = resolve_steps(&settings, None).unwrap();
        assert_eq!(source, StepSource::Pack("python"));
        assert_eq!(source.to_string(), "python pack");
    }

    #[test]
    fn nothing_configured_is_an_error() {
        let settings = Settings {
            packs: vec!["design".to_string()],
            ..Default::default()
        };
        let err = resolve_steps(&settings, None).unwrap_err();
        assert_eq!(err.exit_code(), exit_codes::GENERAL_ERROR);
        assert!(err.to_string().contains("no verification steps configured"));
    }
}
