pub mod children;
pub mod console;
pub mod launcher;
pub mod window;

use windows_sys::Win32::Foundation::CloseHandle;
use windows_sys::Win32::System::Threading::{
    GetExitCodeProcess, OpenProcess, PROCESS_QUERY_LIMITED_INFORMATION, STILL_ACTIVE,
};

use crate::error::{Error, Result};
use crate::types::{Pid, State};

pub fn is_running(pid: Pid) -> bool {
    unsafe {
        let handle = OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, 0, pid);
        if handle == 0 {
            return false;
        }
        let mut exit_code = 0u32;
        let ok = GetExitCodeProcess(handle, &mut exit_code) != 0;
        CloseHandle(handle);
        ok && exit_code == STILL_ACTIVE as u32
    }
}

/// Runs the Windows graceful escalation sequence: Ctrl+C, then
/// Ctrl+Break, then (root only, if non-empty) a typed console message,
/// then a window-close message. Errors from any step are absorbed — the
/// next step is tried — except a dead process, which short-circuits.
pub fn graceful(pid: Pid, message: &str) -> Result<State> {
    if !is_running(pid) {
        log::debug!("graceful: pid={} already gone before first signal", pid);
        return Ok(State::Died);
    }

    match console::send_ctrl_c(pid) {
        Err(Error::ProcessAlreadyDead(_)) => {
            log::debug!("graceful: pid={} died before responding to Ctrl+C", pid);
            return Ok(State::Died);
        }
        Err(e) => log::warn!("graceful: pid={} Ctrl+C failed: {}", pid, e),
        Ok(()) if !is_running(pid) => {
            log::debug!("graceful: pid={} stopped after Ctrl+C", pid);
            return Ok(State::Stopped);
        }
        Ok(()) => {}
    }

    match console::send_ctrl_break(pid) {
        Err(Error::ProcessAlreadyDead(_)) => {
            log::debug!("graceful: pid={} died before responding to Ctrl+Break", pid);
            return Ok(State::Died);
        }
        Err(e) => log::warn!("graceful: pid={} Ctrl+Break failed: {}", pid, e),
        Ok(()) if !is_running(pid) => {
            log::debug!("graceful: pid={} stopped after Ctrl+Break", pid);
            return Ok(State::Stopped);
        }
        Ok(()) => {}
    }

    if !message.is_empty() {
        match console::send_message(pid, message) {
            Err(Error::ProcessAlreadyDead(_)) => {
                log::debug!("graceful: pid={} died before message injection", pid);
                return Ok(State::Died);
            }
            Err(e) => log::warn!("graceful: pid={} message injection failed: {}", pid, e),
            Ok(()) if !is_running(pid) => {
                log::debug!("graceful: pid={} stopped after message injection", pid);
                return Ok(State::Stopped);
            }
            Ok(()) => {}
        }
    }

    match window::get_main_window(pid, false) {
        Ok((hwnd, is_uwp)) => {
            if let Err(e) = window::close_window(pid, hwnd, is_uwp, false) {
                log::warn!("graceful: pid={} close_window failed: {}", pid, e);
            } else if !is_running(pid) {
                log::debug!("graceful: pid={} stopped after window close", pid);
                return Ok(State::Stopped);
            }
        }
        Err(e) => log::debug!("graceful: pid={} no closable window found: {}", pid, e),
    }

    log::debug!("graceful: pid={} still running after all Windows escalation steps", pid);
    Ok(State::Running)
}
