//! Graceful, escalating termination of local processes and their
//! descendants.
//!
//! Call [`stop`] with a PID and [`StopOptions`]; it walks the process
//! tree, asks each process to exit (Ctrl+C/Ctrl+Break/console message on
//! Windows, `SIGINT`/`SIGTERM`/TTY injection on POSIX), waits out a grace
//! period, then force-kills whatever is still alive.

mod error;
mod orchestrator;
mod process;
mod tree;
mod types;

#[cfg(unix)]
pub mod posix;
#[cfg(windows)]
pub mod windows;

pub use error::{Error, Result, Stage};
pub use types::{Pid, State, StopOptions, StopResult};

pub use orchestrator::{stop, stop_with_context};
pub use tree::flat_tree;

use tokio_util::sync::CancellationToken;

/// Force-kills `pid` directly, bypassing graceful escalation.
pub fn kill(pid: Pid) -> Result<()> {
    process::kill(pid).map(|_| ())
}

/// Like [`kill`] but recorded against a shared [`CancellationToken`] so a
/// caller driving many shutdowns can cancel the whole batch; the check
/// happens before the syscall, so a cancellation racing the kill itself
/// does not un-kill the process.
pub fn kill_with_context(cancel: &CancellationToken, pid: Pid) -> Result<()> {
    if cancel.is_cancelled() {
        return Ok(());
    }
    kill(pid)
}

/// Sends an arbitrary POSIX signal to `pid`. Windows has no equivalent
/// general-purpose facility; use [`windows::console::send_ctrl_c`] or
/// [`windows::console::send_ctrl_break`] there instead.
#[cfg(unix)]
pub fn send_signal(pid: Pid, sig: nix::sys::signal::Signal) -> Result<()> {
    posix::signal::send_signal(pid, sig)
}

#[cfg(unix)]
pub fn send_signal_with_context(
    cancel: &CancellationToken,
    pid: Pid,
    sig: nix::sys::signal::Signal,
) -> Result<()> {
    if cancel.is_cancelled() {
        return Ok(());
    }
    send_signal(pid, sig)
}

/// Types `msg` into `pid`'s controlling terminal (POSIX) or console
/// (Windows).
pub fn send_message(pid: Pid, msg: &str) -> Result<()> {
    #[cfg(unix)]
    {
        posix::terminal::send_message(pid, msg)
    }
    #[cfg(windows)]
    {
        windows::console::send_message(pid, msg)
    }
}

/// Polls `pid` at a fixed interval until it exits or `cancel` fires.
pub async fn wait_for_proc_stop(cancel: &CancellationToken, pid: Pid) -> Result<()> {
    const POLL_INTERVAL: std::time::Duration = std::time::Duration::from_millis(100);
    while process::is_running(pid) {
        if cancel.is_cancelled() {
            return Ok(());
        }
        tokio::select! {
            _ = tokio::time::sleep(POLL_INTERVAL) => {},
            _ = cancel.cancelled() => return Ok(()),
        }
    }
    Ok(())
}

/// Returns `pid`'s descendants in post-order, root last if `with_root`.
pub fn flat_child_tree(pid: Pid, with_root: bool) -> std::io::Result<Vec<Pid>> {
    flat_tree(pid, with_root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_transitions_are_monotonic_by_construction() {
        // State has no setter that regresses a terminal variant back to
        // Running; this is enforced by the type only allowing whole
        // replacement, tested here as a sanity check on is_terminal().
        assert!(!State::Running.is_terminal());
        assert!(State::Stopped.is_terminal());
        assert!(State::Killed.is_terminal());
        assert!(State::Died.is_terminal());
    }

    #[test]
    fn default_stop_options_match_documented_defaults() {
        let opts = StopOptions::default();
        assert!(opts.tree);
        assert!(!opts.ignore_absent);
        assert!(opts.message.is_empty());
    }
}
