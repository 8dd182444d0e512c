//! End-to-end tests driving `terminator::stop` against real child
//! processes. POSIX only: Windows scenarios (helper-based console
//! signaling) require a Windows host and are covered by `#[cfg(windows)]`
//! unit tests inside the crate instead.

#![cfg(unix)]

use std::process::Command;
use std::time::Duration;

use terminator::{stop, State, StopOptions};

fn opts(timeout_ms: u64) -> StopOptions {
    StopOptions {
        ignore_absent: false,
        tree: true,
        timeout: Duration::from_millis(timeout_ms),
        tick: Duration::from_millis(10),
        message: String::new(),
    }
}

#[tokio::test]
async fn stop_kills_single_responsive_process() {
    let mut child = Command::new("sleep").arg("60").spawn().expect("spawn sleep");
    let pid = child.id();

    let result = stop(pid, &opts(2000)).await.expect("stop should succeed");

    assert_eq!(result.root, (pid, State::Stopped));
    assert!(result.children.is_empty());
    let _ = child.wait();
}

#[tokio::test]
async fn stop_escalates_to_force_kill_for_stubborn_process() {
    let mut child = Command::new("sh")
        .arg("-c")
        .arg("trap '' TERM INT; sleep 60")
        .spawn()
        .expect("spawn sh");
    let pid = child.id();

    let result = stop(pid, &opts(500)).await.expect("stop should succeed");

    assert_eq!(result.root.1, State::Killed);
    let _ = child.wait();
}

#[tokio::test]
async fn stop_walks_descendants_before_root() {
    // A shell spawning a grandchild `sleep`; both should be gone after stop.
    let mut parent = Command::new("sh")
        .arg("-c")
        .arg("sleep 60 & wait")
        .spawn()
        .expect("spawn parent shell");
    let parent_pid = parent.id();

    // Give the shell a moment to fork its child before we snapshot the tree.
    std::thread::sleep(Duration::from_millis(100));

    let result = stop(parent_pid, &opts(2000)).await.expect("stop should succeed");

    assert!(result.root.1 == State::Stopped || result.root.1 == State::Killed);
    for (_, state) in result.children.iter() {
        assert!(matches!(state, State::Stopped | State::Killed | State::Died));
    }
    let _ = parent.wait();
}

#[tokio::test]
async fn stop_absent_pid_without_ignore_absent_is_an_error() {
    let result = stop(0x7fff_fff0, &opts(100)).await;
    assert!(result.is_err(), "stopping a nonexistent PID should error by default");
}

#[tokio::test]
async fn stop_absent_pid_with_ignore_absent_reports_running() {
    let mut o = opts(100);
    o.ignore_absent = true;
    let result = stop(0x7fff_fff0, &o).await.expect("should not error");
    assert_eq!(result.root.1, State::Running);
}

#[tokio::test]
async fn stop_message_injection_is_attempted_when_requested() {
    // TIOCSTI requires a real controlling TTY and typically root, so this
    // only checks that supplying a message doesn't prevent the process
    // from being stopped through the remaining escalation steps.
    let mut child = Command::new("sleep").arg("60").spawn().expect("spawn sleep");
    let pid = child.id();

    let mut o = opts(2000);
    o.message = "q\n".to_string();
    let result = stop(pid, &o).await.expect("stop should succeed");

    assert!(matches!(result.root.1, State::Stopped | State::Killed));
    let _ = child.wait();
}
