use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::date;

/// Dependency tag meaning "my window follows my parent's start date".
pub const PARENT_DEPENDENCY: &str = "parent";

/// A task or sub-task. Sub-tasks have exactly the same shape and nest to any
/// depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    pub start_date: NaiveDate,
    pub due: NaiveDate,
    /// Percent complete, 0-100. Authoritative only on leaf tasks; on tasks with
    /// sub-tasks it is always overwritten by the aggregate.
    #[serde(default)]
    pub completion: u8,
    /// Person in charge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pic: Option<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub dependencies: BTreeSet<String>,
    #[serde(default)]
    pub sub_tasks: Vec<Task>,
    /// Whether sub-tasks are hidden in the table and chart.
    #[serde(default)]
    pub collapsed: bool,
}

impl Task {
    pub fn new(name: impl Into<String>, start_date: NaiveDate, due: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            start_date,
            due,
            completion: 0,
            pic: None,
            notes: String::new(),
            dependencies: BTreeSet::new(),
            sub_tasks: Vec::new(),
            collapsed: false,
        }
    }

    /// Builder-style PIC assignment, mostly for tests and sample data.
    pub fn with_pic(mut self, pic: impl Into<String>) -> Self {
        self.set_pic(Some(pic.into()));
        self
    }

    /// Builder-style `"parent"` tag.
    pub fn following_parent(mut self) -> Self {
        self.set_follows_parent(true);
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.sub_tasks.is_empty()
    }

    /// True when tagged with the `"parent"` dependency.
    pub fn follows_parent(&self) -> bool {
        self.dependencies.contains(PARENT_DEPENDENCY)
    }

    pub fn set_follows_parent(&mut self, follows: bool) {
        if follows {
            self.dependencies.insert(PARENT_DEPENDENCY.to_string());
        } else {
            self.dependencies.remove(PARENT_DEPENDENCY);
        }
    }

    /// The assignee used for overlap bucketing; blank PICs count as unassigned.
    pub fn assignee(&self) -> Option<&str> {
        self.pic.as_deref().map(str::trim).filter(|p| !p.is_empty())
    }

    /// Set the PIC, normalizing blank strings to `None`.
    pub fn set_pic(&mut self, pic: Option<String>) {
        self.pic = pic
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());
    }

    /// Length of the window in whole days.
    pub fn duration_days(&self) -> i64 {
        date::days_between(self.start_date, self.due)
    }

    /// Latest due date among direct sub-tasks.
    pub fn latest_child_due(&self) -> Option<NaiveDate> {
        self.sub_tasks.iter().map(|t| t.due).max()
    }

    /// Number of tasks in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self.sub_tasks.iter().map(Task::subtree_len).sum::<usize>()
    }

    /// True if `id` is this task or one of its descendants.
    pub fn contains(&self, id: Uuid) -> bool {
        self.id == id || self.sub_tasks.iter().any(|t| t.contains(id))
    }

    /// Visit this task and all descendants depth-first, pre-order, with depth.
    pub fn walk<'a>(&'a self, depth: usize, f: &mut impl FnMut(&'a Task, usize)) {
        f(self, depth);
        for sub in &self.sub_tasks {
            sub.walk(depth + 1, f);
        }
    }

    /// Mutable pre-order visit of this task and all descendants.
    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut Task)) {
        f(self);
        for sub in &mut self.sub_tasks {
            sub.walk_mut(f);
        }
    }
}
