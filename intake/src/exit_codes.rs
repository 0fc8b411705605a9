//! Stable exit codes for intake CLI commands.

/// Command succeeded.
pub const OK: i32 = 0;
/// Command failed due to invalid config, input files or other errors.
pub const INVALID: i32 = 1;
/// The session could not be authenticated.
pub const UNAUTHENTICATED: i32 = 2;
