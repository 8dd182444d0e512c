use std::collections::HashMap;
use std::time::Duration;

/// A process identifier. `u32` covers both Windows PIDs and POSIX `pid_t`
/// (which is `i32` but never negative for a real process).
pub type Pid = u32;

/// Outcome of shutting down one process, reported per-PID in a
/// [`StopResult`]. Transitions are monotonic: a process observed in a
/// terminal state never regresses to [`State::Running`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// Never observed to have exited during this call.
    Running,
    /// Exited during the graceful phase, attributable to this call.
    Stopped,
    /// Exited because this call forcibly killed it after the grace period.
    Killed,
    /// Exited, but not attributable to this call's own actions (e.g. a
    /// parent's death took it down first).
    Died,
}

impl State {
    pub fn is_terminal(self) -> bool {
        !matches!(self, State::Running)
    }
}

/// Request configuration for [`crate::stop`].
#[derive(Debug, Clone)]
pub struct StopOptions {
    /// If the root process does not exist, return success instead of
    /// [`crate::Error::ProcessAbsent`].
    pub ignore_absent: bool,
    /// Whether to discover and shut down the root's descendants too.
    pub tree: bool,
    /// How long to wait after the graceful phase before force-killing
    /// anything still running.
    pub timeout: Duration,
    /// Polling interval used while waiting out `timeout`.
    pub tick: Duration,
    /// Text injected into the root process's controlling terminal/console
    /// during the graceful phase. Empty means skip this step.
    pub message: String,
}

impl Default for StopOptions {
    fn default() -> Self {
        Self {
            ignore_absent: false,
            tree: true,
            timeout: Duration::from_secs(5),
            tick: Duration::from_millis(100),
            message: String::new(),
        }
    }
}

/// Outcome of a [`crate::stop`] call.
#[derive(Debug, Clone)]
pub struct StopResult {
    pub root: (Pid, State),
    pub children: HashMap<Pid, State>,
}
