//! The scheduling core: completion roll-up, date propagation, overlap
//! detection and the drag-gesture controller.

pub mod completion;
pub mod drag;
pub mod overlap;
pub mod propagate;

use chrono::NaiveDate;

use crate::error::{Result, TrackerError};
use crate::model::{Project, TaskPath};

pub use drag::{DragController, DragMode, DragOutcome, DragPhase, DragUpdate};
pub use overlap::{find_overlap, has_overlap, Conflict};
pub use propagate::{envelope_ancestors, envelope_subtree, propagate_dates, required_due};

/// Give the task at `path` a new window and restore every envelope around it:
/// descendants slide, the task's own subtree settles, ancestors extend.
///
/// Mutates in place and does not check overlap; see [`reschedule`].
pub fn apply_window(project: &mut Project, path: &TaskPath, start: NaiveDate, due: NaiveDate) -> Result<()> {
    let task = project
        .task_mut(path)
        .ok_or_else(|| TrackerError::structural(format!("no task at {path}")))?;
    propagate_dates(task, start, due);
    envelope_subtree(task);
    envelope_ancestors(project, path);
    Ok(())
}

/// [`apply_window`] gated by the overlap check: on conflict the project is
/// restored to exactly its previous state.
pub fn reschedule(project: &mut Project, path: &TaskPath, start: NaiveDate, due: NaiveDate) -> Result<()> {
    if start > due {
        return Err(TrackerError::InvalidDateRange { start, due });
    }
    let snapshot = project.clone();
    if let Err(e) = apply_window(project, path, start, due) {
        *project = snapshot;
        return Err(e);
    }
    if let Some(conflict) = find_overlap(project) {
        *project = snapshot;
        return Err(TrackerError::SchedulingConflict(conflict));
    }
    Ok(())
}
