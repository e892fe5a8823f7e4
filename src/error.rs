//! Error types for the superbeads CLI.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for superbeads operations.
///
/// Each variant maps to one of the documented exit codes.
#[derive(Error, Debug)]
pub enum SuperbeadsError {
    /// Invalid state, I/O failure or a refused transition.
    #[error("{0}")]
    UserError(String),

    /// Arguments parsed but are semantically invalid (bad id, empty title...).
    #[error("invalid argument: {0}")]
    InvalidArgs(String),

    /// At least one verification step failed.
    #[error("verification failed: {0}")]
    VerificationFailed(String),

    /// The pack name is not in the built-in registry.
    #[error("pack not found: '{name}'. Available packs: {available}")]
    PackNotFound { name: String, available: String },

    /// The task id is not in the current sprint.
    #[error("task not found: '{0}'. Run `superbeads task list` to see task ids.")]
    TaskNotFound(String),
}

impl SuperbeadsError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            SuperbeadsError::UserError(_) => exit_codes::GENERAL_ERROR,
            SuperbeadsError::InvalidArgs(_) => exit_codes::INVALID_ARGS,
            SuperbeadsError::VerificationFailed(_) => exit_codes::VERIFICATION_FAILED,
            SuperbeadsError::PackNotFound { .. } => exit_codes::PACK_NOT_FOUND,
            SuperbeadsError::TaskNotFound(_) => exit_codes::TASK_NOT_FOUND,
        }
    }
}

/// Result type alias for superbeads operations.
pub type Result<T> = std::result::Result<T, SuperbeadsError>;
