//! Process exit codes. Part of the command-line contract.

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1; // Usage, configuration, input or unhandled runtime error
