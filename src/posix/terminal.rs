//! Resolves a PID's controlling terminal device and injects characters
//! into it. Linux reads `tty_nr` out of `/proc/<pid>/stat`; macOS walks
//! `kern.proc.pid.<pid>` via `sysctl`, then matches the resulting device
//! number against every `/dev/tty*` entry.

use std::fs;
use std::io::Write;
use std::os::unix::io::AsRawFd;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::types::Pid;

#[cfg(target_os = "linux")]
pub fn get_term(pid: Pid) -> Result<PathBuf> {
    let stat = fs::read_to_string(format!("/proc/{}/stat", pid))
        .map_err(|_| Error::TerminalNotFound(pid))?;

    // Field 2 (comm) is parenthesized and may itself contain spaces or
    // parens, so split on the last ')' rather than whitespace.
    let after_comm = stat
        .rfind(')')
        .map(|i| &stat[i + 2..])
        .ok_or(Error::TerminalNotFound(pid))?;
    let fields: Vec<&str> = after_comm.split_whitespace().collect();
    // tty_nr is field 7 overall, i.e. index 4 in `fields` (fields[0] is
    // state, the field right after comm).
    let tty_nr: i64 = fields
        .get(4)
        .and_then(|s| s.parse().ok())
        .ok_or(Error::TerminalNotFound(pid))?;
    if tty_nr == 0 {
        return Err(Error::TerminalNotFound(pid));
    }

    let major = (tty_nr >> 8) & 0xfff;
    let minor = (tty_nr & 0xff) | ((tty_nr >> 12) & 0xfff00);

    // major 136-143 is the /dev/pts range on Linux.
    if (136..=143).contains(&major) {
        return Ok(PathBuf::from(format!("/dev/pts/{}", minor)));
    }
    Ok(PathBuf::from(format!("/dev/tty{}", minor)))
}

#[cfg(target_os = "macos")]
pub fn get_term(pid: Pid) -> Result<PathBuf> {
    let tdev = macos::kinfo_proc_tdev(pid).ok_or(Error::TerminalNotFound(pid))?;
    macos::terminal_map()
        .ok_or(Error::TerminalNotFound(pid))?
        .into_iter()
        .find(|(rdev, _)| *rdev == tdev)
        .map(|(_, path)| path)
        .ok_or(Error::TerminalNotFound(pid))
}

#[cfg(target_os = "macos")]
mod macos {
    use std::path::PathBuf;

    use crate::types::Pid;

    pub fn kinfo_proc_tdev(pid: Pid) -> Option<i32> {
        let mut mib = [libc::CTL_KERN, libc::KERN_PROC, libc::KERN_PROC_PID, pid as i32];
        let mut size: libc::size_t = 0;
        unsafe {
            if libc::sysctl(
                mib.as_mut_ptr(),
                mib.len() as u32,
                std::ptr::null_mut(),
                &mut size,
                std::ptr::null_mut(),
                0,
            ) != 0
            {
                return None;
            }
            let mut buf = vec![0u8; size];
            if libc::sysctl(
                mib.as_mut_ptr(),
                mib.len() as u32,
                buf.as_mut_ptr() as *mut libc::c_void,
                &mut size,
                std::ptr::null_mut(),
                0,
            ) != 0
                || size < std::mem::size_of::<libc::kinfo_proc>()
            {
                return None;
            }
            let entry = std::ptr::read_unaligned(buf.as_ptr() as *const libc::kinfo_proc);
            Some(entry.kp_eproc.e_tdev as i32)
        }
    }

    pub fn terminal_map() -> Option<Vec<(i32, PathBuf)>> {
        let mut out = Vec::new();
        for entry in std::fs::read_dir("/dev").ok()? {
            let entry = entry.ok()?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if !name.starts_with("tty") {
                continue;
            }
            let path = entry.path();
            if let Ok(meta) = std::fs::metadata(&path) {
                use std::os::unix::fs::MetadataExt;
                out.push((meta.rdev() as i32, path));
            }
        }
        Some(out)
    }
}

/// Injects `msg` one character at a time into `pid`'s controlling
/// terminal via `TIOCSTI`, as if it had been typed. Requires the caller
/// to hold sufficient privilege for the target TTY (typically root).
pub fn send_message(pid: Pid, msg: &str) -> Result<()> {
    let term = get_term(pid)?;
    let mut file = fs::OpenOptions::new()
        .write(true)
        .open(&term)
        .map_err(|e| Error::io(pid, crate::error::Operation::OpenTerminal, e))?;
    file.flush()
        .map_err(|e| Error::io(pid, crate::error::Operation::OpenTerminal, e))?;
    for byte in msg.bytes() {
        let rc = unsafe { libc::ioctl(file.as_raw_fd(), libc::TIOCSTI as _, &byte as *const u8) };
        if rc != 0 {
            return Err(Error::io(
                pid,
                crate::error::Operation::SendMessage,
                std::io::Error::last_os_error(),
            ));
        }
    }
    Ok(())
}

#[cfg(all(test, target_os = "linux"))]
mod tests {
    use super::*;

    #[test]
    fn own_process_has_no_resolvable_tty_in_ci_or_has_one_consistently() {
        // Best-effort: just exercise the parse path without asserting a
        // specific device, since CI often runs detached from any TTY.
        let _ = get_term(std::process::id());
    }
}
