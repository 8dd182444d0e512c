use windows_sys::Win32::System::Console::{
    GetConsoleProcessList, SetConsoleCtrlHandler, CTRL_BREAK_EVENT, CTRL_C_EVENT,
};

use crate::error::{Error, Operation, Result, Stage};
use crate::types::Pid;
use crate::windows::launcher;

/// Codes the helper reports for attach failures that mean the target is
/// already gone; kept in sync with `terminator-proxy/src/codes.rs`.
const PROCESS_DOES_NOT_EXIST: i32 = 5;
/// `STATUS_CONTROL_C_EXIT`, the expected exit status of a helper that
/// successfully broadcast a console control event and killed itself.
const STATUS_CONTROL_C_EXIT: i32 = 0xC000013Au32 as i32;

/// Broadcasts `CTRL_C_EVENT` to `pid`'s console via the helper. Wraps the
/// launch with `SetConsoleCtrlHandler(NULL, ..)` so this process isn't
/// also killed if it shares the target's console — no delay is needed
/// between enable/disable because the launch blocks until the helper
/// exits or fails.
pub fn send_ctrl_c(pid: Pid) -> Result<()> {
    unsafe {
        if SetConsoleCtrlHandler(None, 1) == 0 {
            return Err(Error::io(
                pid,
                Operation::SendCtrlC,
                std::io::Error::last_os_error(),
            ));
        }
    }
    let result = run_signal(pid, CTRL_C_EVENT, Operation::SendCtrlC, Stage::CtrlC);
    unsafe {
        SetConsoleCtrlHandler(None, 0);
    }
    result
}

/// Broadcasts `CTRL_BREAK_EVENT`, refusing up front if `pid` shares the
/// caller's console: `CTRL_BREAK_EVENT` cannot be suppressed there and
/// would take this process down too.
pub fn send_ctrl_break(pid: Pid) -> Result<()> {
    if is_attached_to_caller(pid)? {
        return Err(Error::AttachedToCaller(pid));
    }
    run_signal(pid, CTRL_BREAK_EVENT, Operation::SendCtrlBreak, Stage::CtrlBreak)
}

fn run_signal(pid: Pid, sig: u32, operation: Operation, stage: Stage) -> Result<()> {
    let code = launcher::run_helper("signal", pid, "--sig", &sig.to_string())
        .map_err(|e| Error::io(pid, operation, e))?;
    interpret_exit_code(pid, code, STATUS_CONTROL_C_EXIT, stage)
}

/// Injects `msg` into `pid`'s console input via the helper.
pub fn send_message(pid: Pid, msg: &str) -> Result<()> {
    let code = launcher::run_helper("message", pid, "--msg", msg)
        .map_err(|e| Error::io(pid, Operation::SendMessage, e))?;
    interpret_exit_code(pid, code, 0, Stage::Message)
}

/// Turns a helper exit code into the `Result` it represents: the shared
/// "target is already gone" sentinel becomes [`Error::ProcessAlreadyDead`]
/// regardless of mode, any other code but the expected success code
/// becomes [`Error::HelperBadExitCode`].
fn interpret_exit_code(pid: Pid, code: i32, expected_success: i32, stage: Stage) -> Result<()> {
    if code == PROCESS_DOES_NOT_EXIST {
        return Err(Error::ProcessAlreadyDead(pid));
    }
    if code != expected_success {
        return Err(Error::HelperBadExitCode { code, stage });
    }
    Ok(())
}

/// True if `pid` is attached to the calling process's own console.
pub fn is_attached_to_caller(pid: Pid) -> Result<bool> {
    Ok(console_pids(pid, 1)?.contains(&pid))
}

fn console_pids(pid: Pid, len: u32) -> Result<Vec<Pid>> {
    let mut buf = vec![0u32; len as usize];
    let written = unsafe { GetConsoleProcessList(buf.as_mut_ptr(), len) };
    if written == 0 {
        return Err(Error::io(
            pid,
            Operation::QueryConsole,
            std::io::Error::last_os_error(),
        ));
    }
    if written <= len {
        buf.truncate(written as usize);
        return Ok(buf);
    }
    // Buffer was too small; retry with the exact size the OS reported.
    console_pids(pid, written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_does_not_exist_code_wins_over_expected_success() {
        // Even if a mode's success code happened to collide with this
        // sentinel, "already gone" takes priority.
        let result = interpret_exit_code(42, PROCESS_DOES_NOT_EXIST, PROCESS_DOES_NOT_EXIST, Stage::CtrlC);
        assert!(matches!(result, Err(Error::ProcessAlreadyDead(42))));
    }

    #[test]
    fn expected_success_code_is_ok() {
        assert!(interpret_exit_code(42, STATUS_CONTROL_C_EXIT, STATUS_CONTROL_C_EXIT, Stage::CtrlC).is_ok());
        assert!(interpret_exit_code(42, 0, 0, Stage::Message).is_ok());
    }

    #[test]
    fn unexpected_code_is_helper_bad_exit_code() {
        let result = interpret_exit_code(42, 99, STATUS_CONTROL_C_EXIT, Stage::CtrlBreak);
        assert!(matches!(
            result,
            Err(Error::HelperBadExitCode { code: 99, stage: Stage::CtrlBreak })
        ));
    }
}
