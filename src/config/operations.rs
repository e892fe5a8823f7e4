//! Settings loading, validation, and mutation helpers.

use super::model::Settings;
use crate::error::{Result, SuperbeadsError};
use crate::fs::{atomic_write_file, read_to_string};
use crate::packs;
use std::collections::HashSet;
use std::path::Path;

impl Settings {
    /// Load settings from a JSON file and validate them.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = read_to_string(path, "settings file")?;
        Self::from_json(&content)
    }

    /// Parse settings from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json).map_err(|e| {
            SuperbeadsError::UserError(format!("failed to parse settings JSON: {}", e))
        })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Serialize settings to pretty-printed JSON with a trailing newline.
    pub fn to_json(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self).map_err(|e| {
            SuperbeadsError::UserError(format!("failed to serialize settings: {}", e))
        })?;
        json.push('\n');
        Ok(json)
    }

    /// Atomically write settings to disk.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.validate()?;
        atomic_write_file(path, &self.to_json()?)
    }

    /// Validate settings values.
    ///
    /// - every pack must exist in the registry, with no duplicates
    /// - verify steps need a name and a command
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for pack in &self.packs {
            if packs::find_pack(pack).is_err() {
                return Err(SuperbeadsError::UserError(format!(
                    "settings validation failed: unknown pack '{}' in packs list",
                    pack
                )));
            }
            if !seen.insert(pack.as_str()) {
                return Err(SuperbeadsError::UserError(format!(
                    "settings validation failed: pack '{}' is listed more than once",
                    pack
                )));
            }
        }

        if let Some(profile) = &self.verify {
            for (i, step) in profile.steps.iter().enumerate() {
                if step.name.trim().is_empty() {
                    return Err(SuperbeadsError::UserError(format!(
                        "settings validation failed: verify step {} has no name",
                        i + 1
                    )));
                }
                if step.command.trim().is_empty() {
                    return Err(SuperbeadsError::UserError(format!(
                        "settings validation failed: verify step '{}' has no command",
                        step.name
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn has_pack(&self, name: &str) -> bool {
        self.packs.iter().any(|p| p == name)
    }

    /// Record a pack as installed. Returns false if it was already listed.
    pub fn add_pack(&mut self, name: &str) -> bool {
        if self.has_pack(name) {
            return false;
        }
        self.packs.push(name.to_string());
        true
    }

    /// Remove a pack from the installed list. Returns false if it was absent.
    pub fn remove_pack(&mut self, name: &str) -> bool {
        let before = self.packs.len();
        self.packs.retain(|p| p != name);
        self.packs.len() != before
    }
}
