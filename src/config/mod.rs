//! Project settings for superbeads.
//!
//! This module defines the `Settings` struct that represents
//! `.superbeads/settings.json`. Parsing is forward-compatible (unknown fields
//! are preserved on round-trip), every field has a default, and values are
//! validated after loading.

mod model;
mod operations;
pub mod types;

#[cfg(test)]
mod tests;

pub use model::{SETTINGS_VERSION, Settings};
pub use types::{StepKind, VerifyProfile, VerifyStep};
