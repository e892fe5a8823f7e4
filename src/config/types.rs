//! Verification step types shared by settings and the pack registry.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Category of a verification step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Lint,
    Typecheck,
    Test,
    Build,
    #[default]
    Custom,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StepKind::Lint => "lint",
            StepKind::Typecheck => "typecheck",
            StepKind::Test => "test",
            StepKind::Build => "build",
            StepKind::Custom => "custom",
        };
        f.write_str(s)
    }
}

/// An ordered list of verification steps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyProfile {
    pub steps: Vec<VerifyStep>,

    /// Unknown fields preserved for forward compatibility.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// A single verification command.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyStep {
    /// Display name (e.g. "lint", "unit tests").
    pub name: String,

    pub kind: StepKind,

    /// Command to execute (shell-words parsed; no shell).
    pub command: String,

    /// Skip this step under `verify --quick`. Defaults to true for build steps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_in_quick: Option<bool>,

    /// Unknown fields preserved for forward compatibility.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl VerifyStep {
    pub fn new(name: &str, kind: StepKind, command: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            command: command.to_string(),
            skip_in_quick: None,
            extra: BTreeMap::new(),
        }
    }

    /// Whether `verify --quick` skips this step.
    pub fn skipped_in_quick(&self) -> bool {
        self.skip_in_quick.unwrap_or(self.kind == StepKind::Build)
    }
}
