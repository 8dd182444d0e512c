use std::fmt;

use crate::types::Pid;

/// Errors surfaced by this crate. Every variant but `HelperBadExitCode`
/// carries the PID it concerns, so a caller juggling many targets can
/// tell them apart without parsing the message; `Io` carries its PID
/// alongside an [`Operation`] describing what was attempted.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("process with PID {0} does not exist")]
    ProcessAbsent(Pid),

    #[error("process with PID {0} is already dead")]
    ProcessAlreadyDead(Pid),

    #[error("helper exited with unexpected code {code} during {stage}")]
    HelperBadExitCode { code: i32, stage: Stage },

    #[error("no window found for process with PID {0}")]
    WindowNotFound(Pid),

    #[error("no controlling terminal found for process with PID {0}")]
    TerminalNotFound(Pid),

    #[error("caller is already attached to the console of process with PID {0}")]
    AttachedToCaller(Pid),

    #[error("{operation} to the process with PID {pid}: {source}")]
    Io {
        pid: Pid,
        operation: Operation,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Builds an [`Error::Io`] naming what was being attempted against
    /// `pid` when `source` occurred.
    pub fn io(pid: Pid, operation: Operation, source: std::io::Error) -> Self {
        Error::Io {
            pid,
            operation,
            source,
        }
    }

    /// The message a caller should log or display, identical to this
    /// error's `Display` output. Exists so call sites don't have to
    /// choose between `.to_string()` and `format!("{}", ..)`.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// What this crate was attempting against a process when an OS call
/// failed, used to build [`Error::Io`]'s message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    SendSignal,
    SendCtrlC,
    SendCtrlBreak,
    SendMessage,
    LaunchHelper,
    ExtractHelper,
    OpenTerminal,
    QueryConsole,
    CloseWindow,
    Terminate,
    WalkProcessTree,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Operation::SendSignal => "Send signal",
            Operation::SendCtrlC => "Send Ctrl+C",
            Operation::SendCtrlBreak => "Send Ctrl+Break",
            Operation::SendMessage => "Send message",
            Operation::LaunchHelper => "Launch helper",
            Operation::ExtractHelper => "Extract helper",
            Operation::OpenTerminal => "Open terminal",
            Operation::QueryConsole => "Query console",
            Operation::CloseWindow => "Close window",
            Operation::Terminate => "Terminate",
            Operation::WalkProcessTree => "Walk process tree",
        };
        write!(f, "{}", s)
    }
}

/// Which helper invocation produced a bad exit code, used only for the
/// error message — the numeric code itself is preserved verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    CtrlC,
    CtrlBreak,
    Message,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::CtrlC => write!(f, "Ctrl+C delivery"),
            Stage::CtrlBreak => write!(f, "Ctrl+Break delivery"),
            Stage::Message => write!(f, "message delivery"),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
