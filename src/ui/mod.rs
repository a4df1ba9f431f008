pub mod dialogs;
pub mod gantt_chart;
pub mod project_list;
pub mod task_editor;
pub mod task_table;
pub mod theme;
pub mod toolbar;

use gantt_tracker::model::{Project, Task, TaskPath};

/// A task row shown in both the table and the chart. Sub-tasks of collapsed
/// tasks are left out.
pub struct VisibleRow<'a> {
    pub path: TaskPath,
    pub task: &'a Task,
    pub depth: usize,
}

pub fn visible_rows(project: &Project) -> Vec<VisibleRow<'_>> {
    fn push<'a>(rows: &mut Vec<VisibleRow<'a>>, tasks: &'a [Task], parent: Option<&TaskPath>, depth: usize) {
        for (i, task) in tasks.iter().enumerate() {
            let path = match parent {
                Some(p) => p.child(i),
                None => TaskPath::top_level(i),
            };
            let expanded = !task.collapsed;
            rows.push(VisibleRow {
                path: path.clone(),
                task,
                depth,
            });
            if expanded {
                push(rows, &task.sub_tasks, Some(&path), depth + 1);
            }
        }
    }

    let mut rows = Vec::new();
    push(&mut rows, &project.tasks, None, 0);
    rows
}

/// Payload carried by table and project-list drags.
#[derive(Debug, Clone)]
pub enum RowPayload {
    Task(gantt_tracker::TaskLocation),
    Project(usize),
}
