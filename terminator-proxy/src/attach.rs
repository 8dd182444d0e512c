//! Maps `GetLastError()` codes from a failed `AttachConsole` call to this
//! binary's own exit codes. Shared by both modes since each attaches to
//! the target's console before doing anything else.

#![cfg(windows)]

use crate::codes;

use windows_sys::Win32::Foundation::{
    ERROR_ACCESS_DENIED, ERROR_INVALID_HANDLE, ERROR_INVALID_PARAMETER,
};

#[cfg(windows)]
pub fn map_attach_error(win_err: u32) -> i32 {
    match win_err {
        ERROR_ACCESS_DENIED => codes::CALLER_ALREADY_ATTACHED,
        ERROR_INVALID_HANDLE => codes::TARGET_HAVE_NO_CONSOLE,
        ERROR_INVALID_PARAMETER => codes::PROCESS_DOES_NOT_EXIST,
        _ => codes::ATTACH_FAILED,
    }
}
