use std::cell::RefCell;

use windows_sys::Win32::Foundation::{BOOL, HWND, LPARAM};
use windows_sys::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GetConsoleWindow, GetWindow, GetWindowInfo, GetWindowThreadProcessId,
    IsWindowVisible, PostMessageW, SendMessageW, GW_OWNER, WINDOWINFO, WM_CLOSE, WM_QUIT,
};

use crate::error::{Error, Result};
use crate::types::Pid;
use crate::windows::console::is_attached_to_caller;

/// `WindowInfo.atomWindowType` value reserved for Universal Windows
/// Platform application frames.
const UWP_WINDOW_ATOM: u16 = 49223;

pub fn get_windows(pid: Pid) -> Vec<HWND> {
    thread_local! {
        static TARGET: RefCell<(u32, Vec<HWND>)> = RefCell::new((0, Vec::new()));
    }

    unsafe extern "system" fn callback(hwnd: HWND, lparam: LPARAM) -> BOOL {
        let target_pid = lparam as u32;
        let mut current_pid = 0u32;
        GetWindowThreadProcessId(hwnd, &mut current_pid);
        if current_pid == target_pid {
            TARGET.with(|t| t.borrow_mut().1.push(hwnd));
        }
        1
    }

    TARGET.with(|t| t.borrow_mut().0 = pid);
    unsafe {
        EnumWindows(Some(callback), pid as isize as LPARAM);
    }
    TARGET.with(|t| std::mem::take(&mut t.borrow_mut().1))
}

pub fn is_main_window(hwnd: HWND) -> bool {
    unsafe { is_main_window_raw(GetWindow(hwnd, GW_OWNER), IsWindowVisible(hwnd) != 0) }
}

/// A window is a main window if it has no owner and is currently visible.
fn is_main_window_raw(owner: HWND, visible: bool) -> bool {
    owner == 0 && visible
}

pub fn is_uwp_app(hwnd: HWND) -> bool {
    unsafe {
        let mut info: WINDOWINFO = std::mem::zeroed();
        info.cbSize = std::mem::size_of::<WINDOWINFO>() as u32;
        if GetWindowInfo(hwnd, &mut info) == 0 {
            return false;
        }
        is_uwp_window_info(&info)
    }
}

fn is_uwp_window_info(info: &WINDOWINFO) -> bool {
    info.atomWindowType == UWP_WINDOW_ATOM
}

/// Finds `pid`'s main (visible, unowned) window, preferring a UWP app
/// frame if one exists. Falls back to the caller's own console window
/// when `allow_own_console` is set and `pid` shares that console — the
/// same accommodation the helper-based signal path makes.
pub fn get_main_window(pid: Pid, allow_own_console: bool) -> Result<(HWND, bool)> {
    let windows = get_windows(pid);
    if let Some(hwnd) = windows.iter().copied().find(|&h| is_uwp_app(h)) {
        return Ok((hwnd, true));
    }
    if let Some(hwnd) = windows.into_iter().find(|&h| is_main_window(h)) {
        return Ok((hwnd, false));
    }
    if allow_own_console && is_attached_to_caller(pid)? {
        let console = unsafe { GetConsoleWindow() };
        if console != 0 {
            return Ok((console, false));
        }
    }
    Err(Error::WindowNotFound(pid))
}

/// Sends the close message appropriate to the window kind: `WM_QUIT` for
/// UWP app frames, `WM_CLOSE` otherwise. `wait` chooses `SendMessageW`
/// (blocks until the window procedure returns, which can hang behind a
/// confirmation dialog) over the non-blocking `PostMessageW`.
pub fn close_window(pid: Pid, hwnd: HWND, is_uwp: bool, wait: bool) -> Result<()> {
    let message = if is_uwp { WM_QUIT } else { WM_CLOSE };
    let ok = unsafe {
        if wait {
            SendMessageW(hwnd, message, 0, 0) == 0
        } else {
            PostMessageW(hwnd, message, 0, 0) != 0
        }
    };
    if !ok {
        return Err(Error::io(
            pid,
            crate::error::Operation::CloseWindow,
            std::io::Error::last_os_error(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthetic_window_info(atom: u16) -> WINDOWINFO {
        let mut info: WINDOWINFO = unsafe { std::mem::zeroed() };
        info.atomWindowType = atom;
        info
    }

    #[test]
    fn window_info_with_uwp_atom_is_recognized_as_uwp() {
        assert!(is_uwp_window_info(&synthetic_window_info(UWP_WINDOW_ATOM)));
    }

    #[test]
    fn window_info_with_other_atom_is_not_uwp() {
        assert!(!is_uwp_window_info(&synthetic_window_info(1)));
        assert!(!is_uwp_window_info(&synthetic_window_info(0)));
    }

    #[test]
    fn unowned_visible_window_is_main() {
        assert!(is_main_window_raw(0, true));
    }

    #[test]
    fn owned_window_is_not_main() {
        assert!(!is_main_window_raw(12345, true));
    }

    #[test]
    fn hidden_unowned_window_is_not_main() {
        assert!(!is_main_window_raw(0, false));
    }
}
