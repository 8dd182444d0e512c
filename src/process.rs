use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

#[cfg(unix)]
use crate::posix as platform;
#[cfg(windows)]
use crate::windows as platform;

use crate::error::Result;
use crate::types::{Pid, State};

pub fn is_running(pid: Pid) -> bool {
    platform::is_running(pid)
}

/// Runs the platform-specific graceful escalation sequence once.
pub fn graceful(pid: Pid, message: &str) -> Result<State> {
    platform::graceful(pid, message)
}

/// Force-kills `pid` immediately: `SIGKILL` on POSIX, `TerminateProcess`
/// on Windows. Resolves to [`State::Stopped`] if the process was already
/// gone by the time we tried.
pub fn kill(pid: Pid) -> Result<State> {
    log::debug!("kill: pid={}", pid);
    #[cfg(unix)]
    {
        match crate::posix::signal::send_sigkill(pid) {
            Ok(()) => Ok(State::Killed),
            Err(crate::error::Error::ProcessAlreadyDead(_)) => Ok(State::Stopped),
            Err(e) => Err(e),
        }
    }
    #[cfg(windows)]
    {
        use windows_sys::Win32::Foundation::CloseHandle;
        use windows_sys::Win32::System::Threading::{OpenProcess, TerminateProcess, PROCESS_TERMINATE};
        unsafe {
            let handle = OpenProcess(PROCESS_TERMINATE, 0, pid);
            if handle == 0 {
                return Ok(State::Stopped);
            }
            let ok = TerminateProcess(handle, 1) != 0;
            CloseHandle(handle);
            if ok {
                Ok(State::Killed)
            } else {
                Err(crate::error::Error::io(
                    pid,
                    crate::error::Operation::Terminate,
                    std::io::Error::last_os_error(),
                ))
            }
        }
    }
}

/// Polls `pid` every `tick` until it exits, the shared `deadline` passes,
/// or `cancel` fires, then force-kills it if it is still running. Used
/// for every PID left in [`State::Running`] after the graceful phase.
pub async fn kill_with_context(
    pid: Pid,
    tick: Duration,
    deadline: Instant,
    cancel: &CancellationToken,
) -> Result<State> {
    loop {
        if !is_running(pid) {
            log::trace!("kill_with_context: pid={} exited on its own", pid);
            return Ok(State::Stopped);
        }
        if Instant::now() >= deadline {
            log::warn!("kill_with_context: pid={} still running at deadline, force-killing", pid);
            return kill(pid);
        }
        if cancel.is_cancelled() {
            log::debug!("kill_with_context: pid={} cancelled, force-killing", pid);
            return kill(pid);
        }
        tokio::select! {
            _ = tokio::time::sleep(tick) => {},
            _ = cancel.cancelled() => {
                log::debug!("kill_with_context: pid={} cancelled mid-tick, force-killing", pid);
                return kill(pid);
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[cfg(unix)]
    async fn kill_with_context_kills_on_deadline() {
        let mut child = std::process::Command::new("sleep").arg("60").spawn().unwrap();
        let pid = child.id();
        let deadline = Instant::now() + Duration::from_millis(50);
        let cancel = CancellationToken::new();
        let state = kill_with_context(pid, Duration::from_millis(10), deadline, &cancel)
            .await
            .unwrap();
        assert_eq!(state, State::Killed);
        let _ = child.wait();
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn kill_with_context_detects_voluntary_exit() {
        let mut child = std::process::Command::new("true").spawn().unwrap();
        let pid = child.id();
        let _ = child.wait();
        let deadline = Instant::now() + Duration::from_secs(5);
        let cancel = CancellationToken::new();
        let state = kill_with_context(pid, Duration::from_millis(10), deadline, &cancel)
            .await
            .unwrap();
        assert_eq!(state, State::Stopped);
    }
}
