use std::collections::HashMap;
use std::time::Instant;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Operation, Result};
use crate::process;
use crate::tree;
use crate::types::{Pid, State, StopOptions, StopResult};

/// Shuts `pid` (and, if requested, its descendants) down: graceful
/// escalation first, children before the root, then a bounded forced
/// kill of anything still alive.
pub async fn stop(pid: Pid, opts: &StopOptions) -> Result<StopResult> {
    stop_with_context(pid, opts, &CancellationToken::new()).await
}

/// Same as [`stop`] but aborts the grace-period wait early if `cancel`
/// fires. Graceful escalation itself is not cancellation-aware mid-step:
/// each step is already bounded by the target process's own response.
pub async fn stop_with_context(
    pid: Pid,
    opts: &StopOptions,
    cancel: &CancellationToken,
) -> Result<StopResult> {
    log::debug!("stop: pid={} tree={} timeout={:?}", pid, opts.tree, opts.timeout);

    if !process::is_running(pid) {
        if opts.ignore_absent {
            log::debug!("stop: pid={} absent, ignore_absent set, returning Running", pid);
            return Ok(StopResult {
                root: (pid, State::Running),
                children: HashMap::new(),
            });
        }
        log::warn!("stop: pid={} absent", pid);
        return Err(Error::ProcessAbsent(pid));
    }

    let children_pids = if opts.tree {
        let kids = tree::flat_tree(pid, false)
            .map_err(|e| Error::io(pid, Operation::WalkProcessTree, e))?;
        log::debug!("stop: pid={} has {} descendants", pid, kids.len());
        kids
    } else {
        Vec::new()
    };

    let mut states: HashMap<Pid, State> = HashMap::new();
    for &child in &children_pids {
        let state = process::graceful(child, "")?;
        log::debug!("stop: child pid={} graceful -> {:?}", child, state);
        states.insert(child, state);
    }
    let root_state = process::graceful(pid, &opts.message)?;
    log::debug!("stop: root pid={} graceful -> {:?}", pid, root_state);

    let deadline = Instant::now() + opts.timeout;
    let mut still_running: Vec<Pid> = children_pids
        .iter()
        .copied()
        .filter(|p| states.get(p) == Some(&State::Running))
        .collect();
    if root_state == State::Running {
        still_running.push(pid);
    }

    log::debug!("stop: pid={} {} PID(s) still running after grace phase", pid, still_running.len());
    let mut joins = JoinSet::new();
    for target in still_running {
        let tick = opts.tick;
        let cancel = cancel.clone();
        joins.spawn(async move {
            let state = process::kill_with_context(target, tick, deadline, &cancel).await;
            (target, state)
        });
    }

    let mut first_err = None;
    while let Some(result) = joins.join_next().await {
        let (target, state) = result.expect("kill worker task should not panic");
        match state {
            Ok(s) => {
                states.insert(target, s);
            }
            Err(e) => {
                log::error!("stop: kill worker for pid={} failed: {}", target, e);
                if first_err.is_none() {
                    first_err = Some(e);
                }
            }
        }
    }
    if let Some(e) = first_err {
        return Err(e);
    }

    let final_root_state = if root_state == State::Running {
        states.remove(&pid).unwrap_or(State::Running)
    } else {
        root_state
    };

    Ok(StopResult {
        root: (pid, final_root_state),
        children: states,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn opts(timeout_ms: u64) -> StopOptions {
        StopOptions {
            ignore_absent: false,
            tree: true,
            timeout: Duration::from_millis(timeout_ms),
            tick: Duration::from_millis(10),
            message: String::new(),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn stop_sigterm_responsive_child() {
        // `sh` ignores nothing special; SIGTERM should end it promptly.
        let mut child = std::process::Command::new("sleep").arg("60").spawn().unwrap();
        let pid = child.id();
        let result = stop(pid, &opts(2000)).await.unwrap();
        assert_eq!(result.root.1, State::Stopped);
        let _ = child.wait();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn stop_forces_kill_on_sigterm_ignoring_process() {
        let mut child = std::process::Command::new("sh")
            .arg("-c")
            .arg("trap '' TERM INT; sleep 60")
            .spawn()
            .unwrap();
        let pid = child.id();
        let result = stop(pid, &opts(500)).await.unwrap();
        assert_eq!(result.root.1, State::Killed);
        let _ = child.wait();
    }

    #[tokio::test]
    async fn stop_absent_process_without_ignore_absent_errors() {
        let mut o = opts(100);
        o.ignore_absent = false;
        let result = stop(0x7fff_fff0, &o).await;
        assert!(matches!(result, Err(Error::ProcessAbsent(_))));
    }

    #[tokio::test]
    async fn stop_absent_process_with_ignore_absent_succeeds() {
        let mut o = opts(100);
        o.ignore_absent = true;
        let result = stop(0x7fff_fff0, &o).await.unwrap();
        assert_eq!(result.root.1, State::Running);
        assert!(result.children.is_empty());
    }
}
