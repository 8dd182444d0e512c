//! Materializes the embedded helper executable on disk and launches it.
//!
//! Packaging the helper (cross-compiling `terminator-proxy` for the
//! target triple and producing the bytes below) happens outside this
//! crate; this module only knows how to extract and run whatever bytes
//! it is given.

use std::os::windows::process::CommandExt;
use std::path::PathBuf;
use std::process::Command;

use crate::types::Pid;

const DETACHED_PROCESS: u32 = 0x0000_0008;

/// Placeholder for the real cross-compiled `terminator-proxy.exe`. A
/// release pipeline replaces this asset before building for Windows;
/// packaging that pipeline is out of scope here.
static HELPER_BYTES: &[u8] = include_bytes!("../../assets/terminator_proxy_placeholder.bin");

fn helper_path() -> PathBuf {
    std::env::temp_dir().join(format!(
        "terminator_proxy_{}.exe",
        env!("CARGO_PKG_VERSION")
    ))
}

/// Extracts the helper to `${TEMP}` if a copy for this version isn't
/// already there. Idempotent: concurrent callers racing this check may
/// both write the file, but they write identical bytes.
fn ensure_extracted() -> std::io::Result<PathBuf> {
    let path = helper_path();
    if path.exists() {
        return Ok(path);
    }
    log::debug!("launcher: extracting helper to {}", path.display());
    std::fs::write(&path, HELPER_BYTES)?;
    Ok(path)
}

/// Launches the helper in `mode` against `pid` with the given extra
/// argument (a signal number or a message string), waits for it to
/// exit, and returns its exit code.
pub fn run_helper(mode: &str, pid: Pid, extra_flag: &str, extra_value: &str) -> std::io::Result<i32> {
    let path = ensure_extracted()?;
    log::debug!("launcher: running helper mode={} pid={}", mode, pid);
    let status = Command::new(path)
        .arg("--mode")
        .arg(mode)
        .arg("--pid")
        .arg(pid.to_string())
        .arg(extra_flag)
        .arg(extra_value)
        .creation_flags(DETACHED_PROCESS)
        .status()?;
    let code = status.code().unwrap_or(-1);
    log::debug!("launcher: helper mode={} pid={} exited with code {}", mode, pid, code);
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helper_path_is_versioned_and_lands_in_temp() {
        let path = helper_path();
        assert_eq!(path.parent(), Some(std::env::temp_dir().as_path()));
        let name = path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("terminator_proxy_"));
        assert!(name.ends_with(".exe"));
        assert!(name.contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn helper_bytes_asset_is_non_empty() {
        assert!(!HELPER_BYTES.is_empty());
    }
}
