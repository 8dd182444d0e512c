use crate::types::Pid;

#[cfg(target_os = "linux")]
pub fn children_of(pid: Pid) -> std::io::Result<Vec<Pid>> {
    let mut out = Vec::new();
    for entry in std::fs::read_dir("/proc")? {
        let entry = entry?;
        let name = entry.file_name();
        let candidate: Pid = match name.to_string_lossy().parse() {
            Ok(p) => p,
            Err(_) => continue,
        };
        let stat = match std::fs::read_to_string(entry.path().join("stat")) {
            Ok(s) => s,
            Err(_) => continue, // process exited between readdir and read
        };
        let after_comm = match stat.rfind(')') {
            Some(i) => &stat[i + 2..],
            None => continue,
        };
        let ppid: Pid = match after_comm
            .split_whitespace()
            .nth(1)
            .and_then(|s| s.parse().ok())
        {
            Some(p) => p,
            None => continue,
        };
        if ppid == pid {
            out.push(candidate);
        }
    }
    Ok(out)
}

#[cfg(target_os = "macos")]
pub fn children_of(pid: Pid) -> std::io::Result<Vec<Pid>> {
    macos::all_pid_ppid_pairs()
        .map(|pairs| {
            pairs
                .into_iter()
                .filter(|&(_, ppid)| ppid == pid)
                .map(|(child, _)| child)
                .collect()
        })
        .ok_or_else(|| std::io::Error::last_os_error())
}

#[cfg(target_os = "macos")]
mod macos {
    use std::mem;

    use crate::types::Pid;

    /// Every `struct kinfo_proc` (`sys/sysctl.h`) `KERN_PROC_ALL` returns,
    /// read through `libc`'s typed binding rather than guessed byte
    /// offsets into the raw buffer.
    pub fn all_pid_ppid_pairs() -> Option<Vec<(Pid, Pid)>> {
        let mut mib = [libc::CTL_KERN, libc::KERN_PROC, libc::KERN_PROC_ALL, 0];
        let mut size: libc::size_t = 0;
        let stride = mem::size_of::<libc::kinfo_proc>();
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
            {
                return None;
            }
            let count = size / stride;
            let mut out = Vec::with_capacity(count);
            for i in 0..count {
                let base = buf.as_ptr().add(i * stride) as *const libc::kinfo_proc;
                let entry = std::ptr::read_unaligned(base);
                out.push((entry.kp_proc.p_pid as Pid, entry.kp_eproc.e_ppid as Pid));
            }
            Some(out)
        }
    }
}

#[cfg(all(test, target_os = "linux"))]
mod tests {
    use super::*;
    use std::process::Command;

    #[test]
    fn spawned_child_is_discovered() {
        let mut child = Command::new("sleep").arg("1").spawn().unwrap();
        std::thread::sleep(std::time::Duration::from_millis(50));
        let kids = children_of(std::process::id()).unwrap();
        assert!(kids.contains(&child.id()), "expected {:?} to contain {}", kids, child.id());
        let _ = child.kill();
        let _ = child.wait();
    }

    #[test]
    fn pid_with_no_children_returns_empty() {
        let kids = children_of(0x7fff_fff0).unwrap();
        assert!(kids.is_empty());
    }
}
