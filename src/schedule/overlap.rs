//! Same-PIC overlap detection.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::model::{Project, Task};

/// One side of a conflicting pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictingTask {
    pub id: Uuid,
    pub name: String,
    pub start_date: NaiveDate,
    pub due: NaiveDate,
}

impl From<&Task> for ConflictingTask {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            name: task.name.clone(),
            start_date: task.start_date,
            due: task.due,
        }
    }
}

/// Two tasks assigned to the same person whose windows overlap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub pic: String,
    pub first: ConflictingTask,
    pub second: ConflictingTask,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} is assigned to '{}' ({} → {}) and '{}' ({} → {})",
            self.pic,
            self.first.name,
            self.first.start_date,
            self.first.due,
            self.second.name,
            self.second.start_date,
            self.second.due,
        )
    }
}

/// Strict interval overlap: windows that only touch do not overlap.
pub fn windows_overlap(a: (NaiveDate, NaiveDate), b: (NaiveDate, NaiveDate)) -> bool {
    a.0 < b.1 && b.0 < a.1
}

/// First same-PIC overlap in `project`, at any depth.
pub fn find_overlap(project: &Project) -> Option<Conflict> {
    let mut buckets: BTreeMap<&str, Vec<&Task>> = BTreeMap::new();
    project.visit(&mut |_, task| {
        if let Some(pic) = task.assignee() {
            buckets.entry(pic).or_default().push(task);
        }
    });

    for (pic, tasks) in &buckets {
        for (i, a) in tasks.iter().enumerate() {
            for b in &tasks[i + 1..] {
                if windows_overlap((a.start_date, a.due), (b.start_date, b.due)) {
                    return Some(Conflict {
                        pic: pic.to_string(),
                        first: ConflictingTask::from(*a),
                        second: ConflictingTask::from(*b),
                    });
                }
            }
        }
    }
    None
}

/// True if any two tasks sharing a non-empty PIC overlap.
pub fn has_overlap(project: &Project) -> bool {
    find_overlap(project).is_some()
}
