use crate::attach::map_attach_error;
use crate::codes;
use windows_sys::Win32::Foundation::GetLastError;
use windows_sys::Win32::System::Console::{
    AttachConsole, GenerateConsoleCtrlEvent, SetConsoleCtrlHandler,
};

/// Only `CTRL_C_EVENT` (0) and `CTRL_BREAK_EVENT` (1) are valid group
/// event ids; anything else is a caller error.
fn validate_sig(sig: u32) -> Result<(), i32> {
    if sig > 1 {
        Err(codes::WRONG_SIG)
    } else {
        Ok(())
    }
}

/// Attaches to `pid`'s console and broadcasts Ctrl+C (`sig == 0`) or
/// Ctrl+Break (`sig == 1`) to the whole console process group. Never
/// returns on success: broadcasting Ctrl+C kills this process too and the
/// OS assigns `STATUS_CONTROL_C_EXIT`.
pub fn run(pid: i64, sig: u32) -> ! {
    if let Err(code) = validate_sig(sig) {
        std::process::exit(code);
    }

    unsafe {
        if AttachConsole(pid as u32) == 0 {
            std::process::exit(map_attach_error(GetLastError()));
        }

        // Ensure this helper itself reacts to the Ctrl+C it is about to
        // broadcast, in case a prior ancestor disabled handling.
        if SetConsoleCtrlHandler(None, 0) == 0 {
            std::process::exit(codes::ENABLE_CTRL_C_FAILED);
        }

        // Group id 0 means "every process attached to the current
        // console", not the target PID — passing the PID here fails.
        if GenerateConsoleCtrlEvent(sig, 0) == 0 {
            std::process::exit(codes::SEND_SIG_FAILED);
        }
    }

    // Reached only if the broadcast somehow didn't kill us (e.g. Ctrl+C
    // ignored by a handler installed after ours).
    std::process::exit(codes::STATUS_CONTROL_C_EXIT);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_c_and_ctrl_break_group_ids_are_valid() {
        assert!(validate_sig(0).is_ok());
        assert!(validate_sig(1).is_ok());
    }

    #[test]
    fn anything_past_ctrl_break_is_wrong_sig() {
        assert_eq!(validate_sig(2), Err(codes::WRONG_SIG));
        assert_eq!(validate_sig(u32::MAX), Err(codes::WRONG_SIG));
    }
}
