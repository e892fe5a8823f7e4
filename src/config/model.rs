//! Settings struct definition and default implementation.

use super::types::VerifyProfile;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Current settings file format version.
pub const SETTINGS_VERSION: &str = "1";

/// Contents of `.superbeads/settings.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Settings format version.
    pub version: String,

    /// Human-readable project name, used when rendering `CLAUDE.md`.
    pub project_name: String,

    /// Installed packs, in installation order.
    pub packs: Vec<String>,

    /// Verification steps overriding the packs' defaults.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verify: Option<VerifyProfile>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Unknown fields preserved for forward compatibility.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION.to_string(),
            project_name: String::new(),
            packs: Vec::new(),
            verify: None,
            created_at: None,
            extra: BTreeMap::new(),
        }
    }
}
