//! Bottom-up completion roll-up.
//!
//! Only leaf tasks carry an authoritative completion value. Every task with
//! sub-tasks, and every project, holds the rounded mean of its children and is
//! overwritten on each recompute, including values that came from an import.

use crate::model::{Project, Task, Workspace};

/// Rounded mean of child completions; 0 for no children.
fn rounded_mean(values: impl Iterator<Item = u8>) -> u8 {
    let (sum, count) = values.fold((0u32, 0u32), |(s, c), v| (s + u32::from(v), c + 1));
    if count == 0 {
        return 0;
    }
    // Half rounds up, matching the usual percentage display.
    ((sum as f64 / count as f64).round() as u32).min(100) as u8
}

/// Recompute `task` and its subtree; returns the task's completion.
pub fn recompute_task(task: &mut Task) -> u8 {
    if task.is_leaf() {
        return task.completion.min(100);
    }
    let completion = rounded_mean(task.sub_tasks.iter_mut().map(recompute_task));
    task.completion = completion;
    completion
}

/// Recompute every task of `project` and the project itself.
pub fn recompute_project(project: &mut Project) -> u8 {
    let completion = rounded_mean(project.tasks.iter_mut().map(recompute_task));
    project.completion = completion;
    completion
}

pub fn recompute_workspace(workspace: &mut Workspace) {
    for project in &mut workspace.projects {
        recompute_project(project);
    }
}
