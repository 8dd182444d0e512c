use crate::types::Pid;

#[cfg(unix)]
use crate::posix::children::children_of;
#[cfg(windows)]
use crate::windows::children::children_of;

/// Returns the descendants of `pid` in post-order: every descendant of a
/// child appears before that child, and (if `with_root`) `pid` itself is
/// last. Shutting down in this order lets a child exit cleanly before its
/// parent goes away, which matters for processes that expect to outlive
/// a brief window after their parent's death.
pub fn flat_tree(pid: Pid, with_root: bool) -> std::io::Result<Vec<Pid>> {
    let mut out = Vec::new();
    visit(pid, &mut out)?;
    if with_root {
        out.push(pid);
    }
    Ok(out)
}

fn visit(pid: Pid, out: &mut Vec<Pid>) -> std::io::Result<()> {
    visit_with(pid, out, &children_of)
}

/// Core walk, parameterized over the children lookup so the ordering can
/// be tested without a real process tree. Direct children are visited in
/// reverse of whatever order the lookup returns them in.
fn visit_with<F>(pid: Pid, out: &mut Vec<Pid>, children_of: &F) -> std::io::Result<()>
where
    F: Fn(Pid) -> std::io::Result<Vec<Pid>>,
{
    let mut children = children_of(pid)?;
    children.reverse();
    for child in children {
        visit_with(child, out, children_of)?;
        out.push(child);
    }
    Ok(())
}
