use crate::attach::map_attach_error;
use crate::codes;
use windows_sys::Win32::Foundation::{GetLastError, INVALID_HANDLE_VALUE};
use windows_sys::Win32::System::Console::{
    AttachConsole, GetStdHandle, SetStdHandle, WriteConsoleInputW, INPUT_RECORD,
    INPUT_RECORD_0, KEY_EVENT, KEY_EVENT_RECORD, STD_ERROR_HANDLE, STD_INPUT_HANDLE,
    STD_OUTPUT_HANDLE,
};

/// Attaches to `pid`'s console and types `msg` into its input buffer as a
/// sequence of synthetic key-down events, one per UTF-16 code unit. Key
/// release events are omitted; the target only needs to observe the
/// characters, not a faithful keyboard trace.
pub fn run(pid: i64, msg: &str) -> ! {
    unsafe {
        if AttachConsole(pid as u32) == 0 {
            std::process::exit(map_attach_error(GetLastError()));
        }

        reopen_std_handles();

        let stdin = GetStdHandle(STD_INPUT_HANDLE);
        if stdin == INVALID_HANDLE_VALUE || stdin == 0 {
            std::process::exit(codes::GET_STDIN_HANDLE_FAILED);
        }

        let mut records = str_to_input_records(msg);
        let mut written: u32 = 0;
        let ok = WriteConsoleInputW(stdin, records.as_mut_ptr(), records.len() as u32, &mut written);
        if ok == 0 {
            std::process::exit(codes::WRITE_MSG_FAILED);
        }
    }

    std::process::exit(0);
}

fn str_to_input_records(msg: &str) -> Vec<INPUT_RECORD> {
    msg.encode_utf16()
        .map(|unit| INPUT_RECORD {
            EventType: KEY_EVENT as u16,
            Event: INPUT_RECORD_0 {
                KeyEvent: KEY_EVENT_RECORD {
                    bKeyDown: 1,
                    wRepeatCount: 1,
                    wVirtualKeyCode: 0,
                    wVirtualScanCode: 0,
                    uChar: windows_sys::Win32::System::Console::KEY_EVENT_RECORD_0 {
                        UnicodeChar: unit,
                    },
                    dwControlKeyState: 0,
                },
            },
        })
        .collect()
}

/// Re-acquires standard handles after `AttachConsole`, mirroring the
/// fix-up every console-attaching helper needs: the process's original
/// stdio handles point at whatever console (or nothing) it had before
/// attaching, not the one it just joined.
unsafe fn reopen_std_handles() {
    let h_in = GetStdHandle(STD_INPUT_HANDLE);
    if h_in == INVALID_HANDLE_VALUE {
        std::process::exit(codes::GET_STDIN_HANDLE_FAILED);
    }
    let h_out = GetStdHandle(STD_OUTPUT_HANDLE);
    if h_out == INVALID_HANDLE_VALUE {
        std::process::exit(codes::GET_STDOUT_HANDLE_FAILED);
    }
    let h_err = GetStdHandle(STD_ERROR_HANDLE);
    if h_err == INVALID_HANDLE_VALUE {
        std::process::exit(codes::GET_STDERR_HANDLE_FAILED);
    }

    if SetStdHandle(STD_INPUT_HANDLE, h_in) == 0 {
        std::process::exit(codes::SET_STDIN_HANDLE_FAILED);
    }
    if SetStdHandle(STD_OUTPUT_HANDLE, h_out) == 0 {
        std::process::exit(codes::SET_STDOUT_HANDLE_FAILED);
    }
    if SetStdHandle(STD_ERROR_HANDLE, h_err) == 0 {
        std::process::exit(codes::SET_STDERR_HANDLE_FAILED);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_input_record_per_utf16_code_unit() {
        // "Hi" is two UTF-16 code units, "ok" is two more: record count
        // tracks `encode_utf16`, not bytes or chars.
        assert_eq!(str_to_input_records("Hi").len(), 2);
        assert_eq!(str_to_input_records("").len(), 0);
    }

    #[test]
    fn records_carry_a_key_down_event_with_no_release() {
        let records = str_to_input_records("Q");
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.EventType, KEY_EVENT as u16);
        unsafe {
            assert_eq!(record.Event.KeyEvent.bKeyDown, 1);
            assert_eq!(record.Event.KeyEvent.uChar.UnicodeChar, 'Q' as u16);
        }
    }

    #[test]
    fn astral_character_becomes_a_utf16_surrogate_pair() {
        // U+1F600 GRINNING FACE encodes as two UTF-16 code units, so it
        // should become two key-down records, one per surrogate half.
        let records = str_to_input_records("\u{1F600}");
        assert_eq!(records.len(), 2);
    }
}
