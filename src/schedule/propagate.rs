//! Date propagation across parent/child edges.
//!
//! Descending: sub-tasks tagged `"parent"` slide to their parent's new start,
//! keeping their own duration. Ascending: a parent whose due precedes its
//! latest sub-task due is pushed later, never a child pulled earlier. The
//! child that caused the extension keeps its window.
//!
//! Nothing here checks PIC overlap; callers snapshot before calling and
//! restore on conflict.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::date;
use crate::model::{Project, Task, TaskPath};

/// Upper bound on settle passes. Re-anchoring happens at most once per pass
/// and extensions only push dates later, so real trees settle in two or three.
const MAX_SETTLE_PASSES: usize = 64;

/// Give `task` a new window and slide its parent-dependent descendants.
pub fn propagate_dates(task: &mut Task, new_start: NaiveDate, new_due: NaiveDate) {
    task.start_date = new_start;
    task.due = new_due;
    for sub in &mut task.sub_tasks {
        if sub.follows_parent() {
            // Captured before the child is touched.
            let duration = sub.duration_days();
            sub.start_date = new_start;
            sub.due = date::add_days(new_start, duration);
        }
        let (start, due) = (sub.start_date, sub.due);
        propagate_dates(sub, start, due);
    }
}

/// Push `task.due` out to its latest sub-task due, re-propagating with the
/// unchanged start so parent-dependent siblings re-anchor. Sub-tasks that
/// ended past the old due keep their windows.
/// Returns true if the due date moved.
pub fn extend_to_children(task: &mut Task) -> bool {
    extend_keeping(task, None)
}

/// [`extend_to_children`], except that the sub-tasks pushing the parent out
/// hold their windows, as does the one at `keep`. Re-anchoring them would
/// undo the edit and leave the parent longer than any child.
fn extend_keeping(task: &mut Task, keep: Option<usize>) -> bool {
    let mut changed = false;
    while let Some(latest) = task.latest_child_due() {
        if latest <= task.due {
            break;
        }
        debug!(task = %task.name, from = %task.due, to = %latest, "extending parent due");
        let start = task.start_date;
        let parent_due = task.due;
        let kept: Vec<(usize, Task)> = task
            .sub_tasks
            .iter()
            .enumerate()
            .filter(|(i, sub)| sub.due > parent_due || keep == Some(*i))
            .map(|(i, sub)| (i, sub.clone()))
            .collect();
        propagate_dates(task, start, latest);
        for (i, sub) in kept {
            if let Some(slot) = task.sub_tasks.get_mut(i) {
                *slot = sub;
            }
        }
        changed = true;
    }
    changed
}

/// Apply [`extend_to_children`] bottom-up over the whole subtree until
/// every parent envelopes its children.
pub fn envelope_subtree(task: &mut Task) -> bool {
    settle(task, None)
}

fn settle(task: &mut Task, keep: Option<usize>) -> bool {
    let mut changed_any = false;
    for _ in 0..MAX_SETTLE_PASSES {
        if !envelope_pass(task, keep) {
            return changed_any;
        }
        changed_any = true;
    }
    warn!(task = %task.name, "envelope did not settle");
    changed_any
}

fn envelope_pass(task: &mut Task, keep: Option<usize>) -> bool {
    let mut changed = false;
    for sub in &mut task.sub_tasks {
        changed |= envelope_pass(sub, None);
    }
    changed | extend_keeping(task, keep)
}

/// Re-establish the envelope on every ancestor of `path`, nearest first.
/// The node at `path`, and each ancestor on the way up, keeps its window
/// while its own parent extends; only their siblings re-anchor.
/// Returns true if any ancestor changed. Paths that no longer resolve are
/// skipped.
pub fn envelope_ancestors(project: &mut Project, path: &TaskPath) -> bool {
    let indices = path.indices();
    let mut changed = false;
    for ancestor in path.ancestors() {
        let keep = indices.get(ancestor.indices().len()).copied();
        if let Some(task) = project.task_mut(&ancestor) {
            changed |= settle(task, keep);
        }
    }
    changed
}

/// Earliest due date `task` may have if it starts on `new_start`, taking the
/// sliding of its parent-dependent sub-tasks into account. `None` for leaves.
pub fn required_due(task: &Task, new_start: NaiveDate) -> Option<NaiveDate> {
    if task.is_leaf() {
        return None;
    }
    let mut scratch = task.clone();
    propagate_dates(&mut scratch, new_start, new_start);
    for sub in &mut scratch.sub_tasks {
        envelope_subtree(sub);
    }
    scratch.latest_child_due()
}
