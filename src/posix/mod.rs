pub mod children;
pub mod signal;
pub mod terminal;

use crate::error::{Error, Result};
use crate::types::{Pid, State};

/// Queries liveness by sending signal 0, which performs all error
/// checking but delivers nothing.
pub fn is_running(pid: Pid) -> bool {
    nix::sys::signal::kill(nix::unistd::Pid::from_raw(pid as i32), None).is_ok()
}

/// Runs the graceful escalation sequence for one process: SIGINT, then
/// SIGTERM, then (root only, if non-empty) a message typed into its
/// controlling terminal. Checks liveness after each step so a process
/// that responds to SIGINT never receives SIGTERM too.
pub fn graceful(pid: Pid, message: &str) -> Result<State> {
    if !is_running(pid) {
        log::debug!("graceful: pid={} already gone before first signal", pid);
        return Ok(State::Died);
    }

    match signal::send_sigint(pid) {
        Err(Error::ProcessAlreadyDead(_)) => {
            log::debug!("graceful: pid={} died before responding to SIGINT", pid);
            return Ok(State::Died);
        }
        Err(e) => log::warn!("graceful: pid={} SIGINT failed: {}", pid, e),
        Ok(()) if !is_running(pid) => {
            log::debug!("graceful: pid={} stopped after SIGINT", pid);
            return Ok(State::Stopped);
        }
        Ok(()) => {}
    }

    match signal::send_sigterm(pid) {
        Err(Error::ProcessAlreadyDead(_)) => {
            log::debug!("graceful: pid={} died before responding to SIGTERM", pid);
            return Ok(State::Died);
        }
        Err(e) => log::warn!("graceful: pid={} SIGTERM failed: {}", pid, e),
        Ok(()) if !is_running(pid) => {
            log::debug!("graceful: pid={} stopped after SIGTERM", pid);
            return Ok(State::Stopped);
        }
        Ok(()) => {}
    }

    if !message.is_empty() {
        match terminal::send_message(pid, message) {
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

    log::debug!("graceful: pid={} still running after all POSIX escalation steps", pid);
    Ok(State::Running)
}
