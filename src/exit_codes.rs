//! Exit code constants for the superbeads CLI.
//!
//! - 0: Success
//! - 1: General error (invalid state, I/O failure)
//! - 2: Invalid arguments
//! - 3: Verification failed
//! - 4: Pack not found
//! - 5: Task not found

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// General error: invalid project state, I/O failure, bad state transition.
pub const GENERAL_ERROR: i32 = 1;

/// Invalid arguments. Also used by clap for usage errors.
pub const INVALID_ARGS: i32 = 2;

/// One or more verification steps failed.
pub const VERIFICATION_FAILED: i32 = 3;

/// The named pack is not in the registry.
pub const PACK_NOT_FOUND: i32 = 4;

/// The named task is not in the current sprint.
pub const TASK_NOT_FOUND: i32 = 5;
