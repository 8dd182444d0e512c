//! Closed set of exit codes this binary reports. Never reorder within a
//! release: callers match on the raw integer.

pub const WRONG_MODE: i32 = 1;
pub const WRONG_PID: i32 = 2;

pub const CALLER_ALREADY_ATTACHED: i32 = 3;
pub const TARGET_HAVE_NO_CONSOLE: i32 = 4;
pub const PROCESS_DOES_NOT_EXIST: i32 = 5;
pub const ATTACH_FAILED: i32 = 6;

pub const WRONG_SIG: i32 = 7;
pub const ENABLE_CTRL_C_FAILED: i32 = 8;
pub const SEND_SIG_FAILED: i32 = 9;

pub const NO_MESSAGE: i32 = 10;

pub const GET_STDIN_HANDLE_FAILED: i32 = 11;
pub const GET_STDOUT_HANDLE_FAILED: i32 = 12;
pub const GET_STDERR_HANDLE_FAILED: i32 = 13;

pub const MAKE_STDIN_FILE_FAILED: i32 = 14;
pub const MAKE_STDOUT_FILE_FAILED: i32 = 15;
pub const MAKE_STDERR_FILE_FAILED: i32 = 16;

pub const SET_STDIN_HANDLE_FAILED: i32 = 17;
pub const SET_STDOUT_HANDLE_FAILED: i32 = 18;
pub const SET_STDERR_HANDLE_FAILED: i32 = 19;

pub const CONVERT_MSG_FAILED: i32 = 20;
pub const WRITE_MSG_FAILED: i32 = 21;

/// Success code for signal mode: the helper killed itself broadcasting
/// Ctrl+C/Ctrl+Break, so the OS assigns this status rather than us exiting
/// cleanly. Used as a fallback if execution somehow reaches past the
/// broadcast.
#[cfg(windows)]
pub const STATUS_CONTROL_C_EXIT: i32 = 0xC000013Au32 as i32;
