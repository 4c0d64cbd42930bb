//! Stable exit codes for cogito CLI commands.

/// Command succeeded; for `cogito run`, every step completed.
pub const OK: i32 = 0;
/// Invalid input, config or other errors.
pub const INVALID: i32 = 1;
/// `cogito run` stopped with at least one step not completed.
pub const HALTED: i32 = 2;
