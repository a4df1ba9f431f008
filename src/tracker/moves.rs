//! Drag-and-drop in the task table: reorder, reparent, move across projects,
//! and reorder the project list.

use std::collections::BTreeSet;

use tracing::debug;
use uuid::Uuid;

use super::{check_overlap, project_mut, Tracker};
use crate::error::{Result, TrackerError};
use crate::model::{TaskLocation, TaskPath, Workspace, PARENT_DEPENDENCY};
use crate::schedule::propagate;

/// Where, relative to the drop target, the dragged row lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropMode {
    Before,
    After,
    Into,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveSource {
    Task(TaskLocation),
    Project(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveTarget {
    Task(TaskLocation),
    Project(usize),
}

/// Where the moved item ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Moved {
    Task(TaskLocation),
    Project(usize),
    /// Dropped onto its own position.
    Unchanged,
}

/// Identity of a task's sibling list: project index plus parent id.
type SiblingContext = (usize, Option<Uuid>);

fn parent_id(ws: &Workspace, loc: &TaskLocation) -> Option<Uuid> {
    loc.parent().and_then(|p| ws.task(&p)).map(|t| t.id)
}

fn move_task_in(ws: &mut Workspace, source: &TaskLocation, target: &MoveTarget, mode: DropMode) -> Result<TaskLocation> {
    let source_id = ws
        .task(source)
        .map(|t| t.id)
        .ok_or_else(|| TrackerError::structural(format!("no task at {}:{}", source.project, source.path)))?;
    let source_context: SiblingContext = (source.project, parent_id(ws, source));

    // Resolve the target to stable ids before the tree shifts.
    let (dest_project, target_id, target_context) = match target {
        MoveTarget::Task(loc) => {
            let target_task = ws
                .task(loc)
                .ok_or_else(|| TrackerError::structural(format!("no task at {}:{}", loc.project, loc.path)))?;
            if loc.project == source.project
                && (source.path == loc.path || source.path.is_ancestor_of(&loc.path))
            {
                return Err(TrackerError::structural("cannot move a task into itself or its own sub-tasks"));
            }
            let context = match mode {
                DropMode::Into => (loc.project, Some(target_task.id)),
                DropMode::Before | DropMode::After => (loc.project, parent_id(ws, loc)),
            };
            (loc.project, Some(target_task.id), context)
        }
        MoveTarget::Project(index) => {
            if mode != DropMode::Into {
                return Err(TrackerError::structural("a task can only be dropped into a project row"));
            }
            project_mut(ws, *index)?;
            (*index, None, (*index, None))
        }
    };

    let mut task = {
        let project = project_mut(ws, source.project)?;
        let siblings = project
            .siblings_mut(source.path.parent().as_ref())
            .ok_or_else(|| TrackerError::structural(format!("no parent for {}", source.path)))?;
        siblings.remove(source.path.index())
    };
    debug_assert_eq!(task.id, source_id);

    if mode == DropMode::Into && target_id.is_some() {
        task.dependencies = BTreeSet::from([PARENT_DEPENDENCY.to_string()]);
    } else if target_context != source_context {
        task.set_follows_parent(false);
    }

    let project = project_mut(ws, dest_project)?;
    let path = match target_id {
        None => {
            project.tasks.push(task);
            TaskPath::top_level(project.tasks.len() - 1)
        }
        Some(id) => {
            let target_path = project
                .find_path(id)
                .ok_or_else(|| TrackerError::structural("drop target vanished during move"))?;
            match mode {
                DropMode::Into => {
                    let parent = project
                        .task_mut(&target_path)
                        .ok_or_else(|| TrackerError::structural("drop target vanished during move"))?;
                    parent.sub_tasks.push(task);
                    target_path.child(parent.sub_tasks.len() - 1)
                }
                DropMode::Before | DropMode::After => {
                    let parent_path = target_path.parent();
                    let index = target_path.index() + usize::from(mode == DropMode::After);
                    let siblings = project
                        .siblings_mut(parent_path.as_ref())
                        .ok_or_else(|| TrackerError::structural("drop target vanished during move"))?;
                    siblings.insert(index, task);
                    match parent_path {
                        Some(p) => p.child(index),
                        None => TaskPath::top_level(index),
                    }
                }
            }
        }
    };

    propagate::envelope_ancestors(project, &path);
    check_overlap(project)?;
    Ok(TaskLocation::new(dest_project, path))
}

fn move_project_in(ws: &mut Workspace, source: usize, target: usize, mode: DropMode) -> Result<usize> {
    if mode == DropMode::Into {
        return Err(TrackerError::structural("a project cannot be dropped into another project"));
    }
    let len = ws.projects.len();
    if source >= len || target >= len {
        return Err(TrackerError::structural(format!("project index out of range ({source} -> {target})")));
    }
    let project = ws.projects.remove(source);
    let target = if source < target { target - 1 } else { target };
    let index = target + usize::from(mode == DropMode::After);
    ws.projects.insert(index, project);
    Ok(index)
}

impl Tracker {
    /// Apply a drop. Any failure, including a PIC conflict at the
    /// destination, leaves the workspace exactly as it was.
    pub fn move_item(&mut self, source: &MoveSource, target: &MoveTarget, mode: DropMode) -> Result<Moved> {
        match (source, target) {
            (MoveSource::Task(from), MoveTarget::Task(to)) if mode != DropMode::Into && from == to => {
                return Ok(Moved::Unchanged);
            }
            (MoveSource::Project(from), MoveTarget::Project(to)) if mode != DropMode::Into && from == to => {
                return Ok(Moved::Unchanged);
            }
            _ => {}
        }

        let moved = match source {
            MoveSource::Task(from) => {
                let loc = self.transact("move task", |ws| move_task_in(ws, from, target, mode))?;
                Moved::Task(loc)
            }
            MoveSource::Project(from) => match target {
                MoveTarget::Project(to) => {
                    let index = self.transact("move project", |ws| move_project_in(ws, *from, *to, mode))?;
                    Moved::Project(index)
                }
                MoveTarget::Task(_) => {
                    return self.reject(
                        "move project",
                        TrackerError::structural("a project can only be dropped next to another project"),
                    );
                }
            },
        };
        debug!(?moved, ?mode, "moved");
        Ok(moved)
    }

    /// Task-onto-task form of [`Tracker::move_item`].
    pub fn move_task(&mut self, source: &TaskLocation, target: &TaskLocation, mode: DropMode) -> Result<TaskLocation> {
        match self.move_item(
            &MoveSource::Task(source.clone()),
            &MoveTarget::Task(target.clone()),
            mode,
        )? {
            Moved::Task(loc) => Ok(loc),
            _ => Ok(source.clone()),
        }
    }
}
