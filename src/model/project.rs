use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::path::TaskPath;
use super::task::Task;

/// A project: an ordered list of top-level tasks plus metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pic: Option<String>,
    /// Derived from the tasks; never authoritative.
    #[serde(default)]
    pub completion: u8,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub modified: DateTime<Utc>,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: "Untitled Project".to_string(),
            pic: None,
            completion: 0,
            is_archived: false,
            tasks: Vec::new(),
            created: Utc::now(),
            modified: Utc::now(),
        }
    }
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Touch the modified timestamp.
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }

    pub fn task(&self, path: &TaskPath) -> Option<&Task> {
        let (first, rest) = path.indices().split_first()?;
        let mut task = self.tasks.get(*first)?;
        for idx in rest {
            task = task.sub_tasks.get(*idx)?;
        }
        Some(task)
    }

    pub fn task_mut(&mut self, path: &TaskPath) -> Option<&mut Task> {
        let (first, rest) = path.indices().split_first()?;
        let mut task = self.tasks.get_mut(*first)?;
        for idx in rest {
            task = task.sub_tasks.get_mut(*idx)?;
        }
        Some(task)
    }

    /// The sibling list a task lives in: the project's top-level list when
    /// `parent` is `None`, otherwise the parent's sub-tasks.
    pub fn siblings(&self, parent: Option<&TaskPath>) -> Option<&Vec<Task>> {
        match parent {
            None => Some(&self.tasks),
            Some(path) => self.task(path).map(|t| &t.sub_tasks),
        }
    }

    pub fn siblings_mut(&mut self, parent: Option<&TaskPath>) -> Option<&mut Vec<Task>> {
        match parent {
            None => Some(&mut self.tasks),
            Some(path) => self.task_mut(path).map(|t| &mut t.sub_tasks),
        }
    }

    /// Current path of the task with `id`.
    pub fn find_path(&self, id: Uuid) -> Option<TaskPath> {
        let mut found = None;
        self.visit(&mut |path, task| {
            if found.is_none() && task.id == id {
                found = Some(path.clone());
            }
        });
        found
    }

    /// Visit every task depth-first, pre-order, with its path.
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&TaskPath, &'a Task)) {
        fn go<'a>(tasks: &'a [Task], parent: Option<&TaskPath>, f: &mut impl FnMut(&TaskPath, &'a Task)) {
            for (i, task) in tasks.iter().enumerate() {
                let path = match parent {
                    Some(p) => p.child(i),
                    None => TaskPath::top_level(i),
                };
                f(&path, task);
                go(&task.sub_tasks, Some(&path), f);
            }
        }
        go(&self.tasks, None, f);
    }

    /// Number of tasks at every depth.
    pub fn task_count(&self) -> usize {
        self.tasks.iter().map(Task::subtree_len).sum()
    }

    /// Earliest start and latest due across the whole tree.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut span: Option<(NaiveDate, NaiveDate)> = None;
        self.visit(&mut |_, task| {
            span = Some(match span {
                Some((lo, hi)) => (lo.min(task.start_date), hi.max(task.due)),
                None => (task.start_date, task.due),
            });
        });
        span
    }
}
