use nix::sys::signal::{self, Signal};
use nix::unistd::Pid as NixPid;

use crate::error::{Error, Operation, Result};
use crate::types::Pid;

fn map_err(pid: Pid, operation: Operation, err: nix::errno::Errno) -> Error {
    if err == nix::errno::Errno::ESRCH {
        Error::ProcessAlreadyDead(pid)
    } else {
        Error::io(pid, operation, std::io::Error::from(err))
    }
}

/// Sends an arbitrary signal to `pid`.
pub fn send_signal(pid: Pid, sig: Signal) -> Result<()> {
    signal::kill(NixPid::from_raw(pid as i32), sig)
        .map_err(|e| map_err(pid, Operation::SendSignal, e))
}

pub fn send_sigint(pid: Pid) -> Result<()> {
    send_signal(pid, Signal::SIGINT)
}

pub fn send_sigterm(pid: Pid) -> Result<()> {
    send_signal(pid, Signal::SIGTERM)
}

pub fn send_sigkill(pid: Pid) -> Result<()> {
    send_signal(pid, Signal::SIGKILL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;

    #[test]
    fn sigterm_stops_a_real_child() {
        let mut child = Command::new("sleep").arg("60").spawn().unwrap();
        let pid = child.id();
        send_sigterm(pid).expect("sigterm should succeed on a live child");
        let status = child.wait().expect("wait should succeed");
        assert!(!status.success());
    }

    #[test]
    fn signal_to_dead_pid_is_already_dead() {
        let mut child = Command::new("true").spawn().unwrap();
        let pid = child.id();
        child.wait().unwrap();
        // give the kernel a moment to reap; PID may be reused in theory but
        // is extremely unlikely to collide within this test's lifetime.
        std::thread::sleep(std::time::Duration::from_millis(50));
        let result = send_sigterm(pid);
        assert!(matches!(result, Err(Error::ProcessAlreadyDead(p)) if p == pid));
    }
}
