//! Application state and the mutation API used by the UI.
//!
//! [`Tracker`] owns the workspace, the persistence collaborator and the undo
//! history. Every mutation is all-or-nothing: it runs against the live
//! workspace, and on any error the workspace is put back exactly as it was.
//! On success completion is recomputed, changed projects are touched, an
//! undo snapshot is recorded and the workspace is saved.

pub mod moves;
pub mod undo;

use std::path::Path;

use chrono::NaiveDate;
use tracing::{error, info, warn};

use crate::error::{Result, TrackerError};
use crate::io::{self, Store};
use crate::model::{Project, Task, TaskLocation, TaskPath, Workspace};
use crate::schedule::{self, completion, find_overlap, propagate};

pub use moves::{DropMode, MoveSource, MoveTarget, Moved};
pub use undo::UndoHistory;

/// Where a new task goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskParent {
    /// Appended to the project's top-level list.
    Project(usize),
    /// Appended as the last sub-task of this task.
    Task(TaskLocation),
}

/// Attributes for [`Tracker::add_task`].
#[derive(Debug, Clone)]
pub struct NewTask {
    pub name: String,
    pub start_date: NaiveDate,
    pub due: NaiveDate,
    pub pic: Option<String>,
    pub notes: String,
    pub completion: u8,
}

impl NewTask {
    pub fn new(name: impl Into<String>, start_date: NaiveDate, due: NaiveDate) -> Self {
        Self {
            name: name.into(),
            start_date,
            due,
            pic: None,
            notes: String::new(),
            completion: 0,
        }
    }

    pub fn with_pic(mut self, pic: impl Into<String>) -> Self {
        self.pic = Some(pic.into());
        self
    }
}

/// How imported projects combine with the current ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// Drop everything and take the imported workspace.
    Replace,
    /// Imported projects replace same-id projects; new ids are appended.
    Merge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub projects: usize,
    pub tasks: usize,
}

fn non_empty_name(name: &str, fallback: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        fallback.to_string()
    } else {
        name.to_string()
    }
}

fn project_mut(ws: &mut Workspace, index: usize) -> Result<&mut Project> {
    ws.projects
        .get_mut(index)
        .ok_or_else(|| TrackerError::structural(format!("no project at index {index}")))
}

fn task_mut<'a>(ws: &'a mut Workspace, loc: &TaskLocation) -> Result<&'a mut Task> {
    ws.task_mut(loc)
        .ok_or_else(|| TrackerError::structural(format!("no task at {}:{}", loc.project, loc.path)))
}

fn check_overlap(project: &Project) -> Result<()> {
    match find_overlap(project) {
        Some(conflict) => Err(TrackerError::SchedulingConflict(conflict)),
        None => Ok(()),
    }
}

pub struct Tracker {
    workspace: Workspace,
    store: Box<dyn Store>,
    undo: UndoHistory,
    revision: u64,
    last_save_error: Option<String>,
}

impl std::fmt::Debug for Tracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracker")
            .field("projects", &self.workspace.projects.len())
            .field("revision", &self.revision)
            .finish()
    }
}

impl Tracker {
    /// Wrap an already-loaded workspace. Inverted windows and broken
    /// envelopes are repaired and completion is recomputed, but nothing is
    /// saved until the first mutation.
    pub fn new(store: Box<dyn Store>, mut workspace: Workspace) -> Self {
        repair_dates(&mut workspace, "load");
        Self {
            workspace,
            store,
            undo: UndoHistory::new(),
            revision: 0,
            last_save_error: None,
        }
    }

    /// Load the workspace from `store`.
    pub fn open(store: Box<dyn Store>) -> Result<Self> {
        let workspace = store.load()?;
        info!(projects = workspace.projects.len(), "workspace loaded");
        Ok(Self::new(store, workspace))
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn project(&self, index: usize) -> Option<&Project> {
        self.workspace.projects.get(index)
    }

    pub fn task(&self, loc: &TaskLocation) -> Result<&Task> {
        self.workspace
            .task(loc)
            .ok_or_else(|| TrackerError::structural(format!("no task at {}:{}", loc.project, loc.path)))
    }

    /// Bumped on every committed change; the UI uses it to notice updates.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn last_save_error(&self) -> Option<&str> {
        self.last_save_error.as_deref()
    }

    pub fn can_undo(&self) -> bool {
        self.undo.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.undo.can_redo()
    }

    // --- Commit plumbing ---

    /// Run `f` against the live workspace; restore it on error, commit on
    /// success.
    fn transact<T>(&mut self, action: &str, f: impl FnOnce(&mut Workspace) -> Result<T>) -> Result<T> {
        let before = self.workspace.clone();
        match f(&mut self.workspace) {
            Ok(value) => {
                completion::recompute_workspace(&mut self.workspace);
                for project in &mut self.workspace.projects {
                    let unchanged = before
                        .projects
                        .iter()
                        .any(|p| p.id == project.id && p == &*project);
                    if !unchanged {
                        project.touch();
                    }
                }
                self.undo.push(before);
                self.commit(action);
                Ok(value)
            }
            Err(e) => {
                self.workspace = before;
                warn!(action, error = %e, "change rejected");
                Err(e)
            }
        }
    }

    fn commit(&mut self, action: &str) {
        self.revision += 1;
        info!(action, revision = self.revision, "data changed");
        self.persist();
    }

    fn persist(&mut self) {
        match self.store.save(&self.workspace) {
            Ok(()) => self.last_save_error = None,
            Err(e) => {
                error!(error = %e, "failed to save workspace");
                self.last_save_error = Some(e.to_string());
            }
        }
    }

    fn reject<T>(&self, action: &str, e: TrackerError) -> Result<T> {
        warn!(action, error = %e, "change rejected");
        Err(e)
    }

    // --- Task scheduling ---

    /// Direct edit of a task's window. Rejects inverted ranges and dues that
    /// would cut into the task's sub-tasks before touching anything.
    pub fn set_task_dates(&mut self, loc: &TaskLocation, start: NaiveDate, due: NaiveDate) -> Result<()> {
        if start > due {
            return self.reject("set dates", TrackerError::InvalidDateRange { start, due });
        }
        let task = self.task(loc)?;
        if let Some(latest) = propagate::required_due(task, start) {
            if due < latest {
                return self.reject("set dates", TrackerError::DueBeforeSubTasks { due, latest });
            }
        }
        self.reschedule(loc, start, due)
    }

    /// Move a task's window, propagate to descendants and ancestors, and keep
    /// the result only if no PIC is double-booked.
    pub fn reschedule(&mut self, loc: &TaskLocation, start: NaiveDate, due: NaiveDate) -> Result<()> {
        self.transact("reschedule", |ws| {
            let project = project_mut(ws, loc.project)?;
            schedule::reschedule(project, &loc.path, start, due)
        })
    }

    /// What the project would look like after rescheduling, without the
    /// overlap gate and without touching the live state.
    pub fn preview_dates(&self, loc: &TaskLocation, start: NaiveDate, due: NaiveDate) -> Result<Project> {
        let mut project = self
            .project(loc.project)
            .cloned()
            .ok_or_else(|| TrackerError::structural(format!("no project at index {}", loc.project)))?;
        schedule::apply_window(&mut project, &loc.path, start, due)?;
        Ok(project)
    }

    // --- Task fields ---

    pub fn set_task_completion(&mut self, loc: &TaskLocation, value: u8) -> Result<()> {
        self.transact("set completion", |ws| {
            let task = task_mut(ws, loc)?;
            if !task.is_leaf() {
                return Err(TrackerError::NotALeaf);
            }
            task.completion = value.min(100);
            Ok(())
        })
    }

    /// Assign a PIC; rejected if it double-books that person.
    pub fn set_task_pic(&mut self, loc: &TaskLocation, pic: Option<String>) -> Result<()> {
        self.transact("set pic", |ws| {
            let task = task_mut(ws, loc)?;
            task.set_pic(pic);
            if let Some(pic) = task.pic.clone() {
                ws.register_pic(&pic);
            }
            check_overlap(project_mut(ws, loc.project)?)
        })
    }

    pub fn rename_task(&mut self, loc: &TaskLocation, name: &str) -> Result<()> {
        self.transact("rename task", |ws| {
            task_mut(ws, loc)?.name = non_empty_name(name, "Untitled Task");
            Ok(())
        })
    }

    pub fn set_task_notes(&mut self, loc: &TaskLocation, notes: &str) -> Result<()> {
        self.transact("set notes", |ws| {
            task_mut(ws, loc)?.notes = notes.to_string();
            Ok(())
        })
    }

    /// Tag or untag a sub-task as following its parent's start date. Dates
    /// are left alone until the parent next moves.
    pub fn set_follows_parent(&mut self, loc: &TaskLocation, follows: bool) -> Result<()> {
        self.transact("set dependency", |ws| {
            task_mut(ws, loc)?.set_follows_parent(follows);
            Ok(())
        })
    }

    /// View-only: saved, but not recorded for undo.
    pub fn toggle_collapsed(&mut self, loc: &TaskLocation) -> Result<()> {
        let task = task_mut(&mut self.workspace, loc)?;
        task.collapsed = !task.collapsed;
        self.commit("toggle collapsed");
        Ok(())
    }

    // --- Task lifecycle ---

    /// Add a task. Sub-tasks start out following their parent.
    pub fn add_task(&mut self, parent: &TaskParent, attrs: NewTask) -> Result<TaskLocation> {
        if attrs.start_date > attrs.due {
            return self.reject(
                "add task",
                TrackerError::InvalidDateRange {
                    start: attrs.start_date,
                    due: attrs.due,
                },
            );
        }
        self.transact("add task", |ws| {
            let mut task = Task::new(
                non_empty_name(&attrs.name, "New Task"),
                attrs.start_date,
                attrs.due,
            );
            task.set_pic(attrs.pic);
            task.notes = attrs.notes;
            task.completion = attrs.completion.min(100);
            if let Some(pic) = task.pic.clone() {
                ws.register_pic(&pic);
            }

            let loc = match parent {
                TaskParent::Project(index) => {
                    let project = project_mut(ws, *index)?;
                    project.tasks.push(task);
                    TaskLocation::new(*index, TaskPath::top_level(project.tasks.len() - 1))
                }
                TaskParent::Task(parent_loc) => {
                    task.set_follows_parent(true);
                    let parent_task = task_mut(ws, parent_loc)?;
                    parent_task.sub_tasks.push(task);
                    let path = parent_loc.path.child(parent_task.sub_tasks.len() - 1);
                    TaskLocation::new(parent_loc.project, path)
                }
            };

            let project = project_mut(ws, loc.project)?;
            propagate::envelope_ancestors(project, &loc.path);
            check_overlap(project)?;
            Ok(loc)
        })
    }

    /// Remove a task and its subtree. The previous state stays on the undo
    /// stack.
    pub fn delete_task(&mut self, loc: &TaskLocation) -> Result<Task> {
        self.transact("delete task", |ws| {
            let project = project_mut(ws, loc.project)?;
            let siblings = project
                .siblings_mut(loc.path.parent().as_ref())
                .ok_or_else(|| TrackerError::structural(format!("no parent for {}", loc.path)))?;
            if loc.path.index() >= siblings.len() {
                return Err(TrackerError::structural(format!("no task at {}", loc.path)));
            }
            Ok(siblings.remove(loc.path.index()))
        })
    }

    // --- Projects ---

    pub fn add_project(&mut self, name: &str) -> Result<usize> {
        self.transact("add project", |ws| {
            ws.projects
                .push(Project::new(non_empty_name(name, "Untitled Project")));
            Ok(ws.projects.len() - 1)
        })
    }

    pub fn rename_project(&mut self, index: usize, name: &str) -> Result<()> {
        self.transact("rename project", |ws| {
            project_mut(ws, index)?.name = non_empty_name(name, "Untitled Project");
            Ok(())
        })
    }

    pub fn set_project_pic(&mut self, index: usize, pic: Option<String>) -> Result<()> {
        self.transact("set project pic", |ws| {
            let pic = pic.map(|p| p.trim().to_string()).filter(|p| !p.is_empty());
            if let Some(pic) = &pic {
                ws.register_pic(pic);
            }
            project_mut(ws, index)?.pic = pic;
            Ok(())
        })
    }

    pub fn delete_project(&mut self, index: usize) -> Result<Project> {
        self.transact("delete project", |ws| {
            project_mut(ws, index)?;
            Ok(ws.projects.remove(index))
        })
    }

    pub fn set_archived(&mut self, index: usize, archived: bool) -> Result<()> {
        self.transact("archive project", |ws| {
            project_mut(ws, index)?.is_archived = archived;
            Ok(())
        })
    }

    pub fn toggle_archived(&mut self, index: usize) -> Result<bool> {
        let archived = !self
            .project(index)
            .ok_or_else(|| TrackerError::structural(format!("no project at index {index}")))?
            .is_archived;
        self.set_archived(index, archived)?;
        Ok(archived)
    }

    // --- PIC list ---

    /// Returns false if the name was blank or already known.
    pub fn add_pic(&mut self, name: &str) -> Result<bool> {
        if name.trim().is_empty() || self.workspace.pic_list.iter().any(|p| p == name.trim()) {
            return Ok(false);
        }
        self.transact("add pic", |ws| Ok(ws.register_pic(name)))
    }

    /// Forget a PIC and unassign it everywhere.
    pub fn remove_pic(&mut self, name: &str) -> Result<()> {
        let name = name.trim().to_string();
        self.transact("remove pic", |ws| {
            ws.pic_list.retain(|p| *p != name);
            for project in &mut ws.projects {
                if project.pic.as_deref() == Some(name.as_str()) {
                    project.pic = None;
                }
                for task in &mut project.tasks {
                    task.walk_mut(&mut |t| {
                        if t.assignee() == Some(name.as_str()) {
                            t.pic = None;
                        }
                    });
                }
            }
            Ok(())
        })
    }

    // --- Import / export ---

    /// Import tracker CSV. Dates with `start > due` are repaired by moving the
    /// due date up, envelopes and completion are re-derived, and the batch is
    /// refused as a whole if it is malformed or double-books a PIC.
    pub fn import_csv(&mut self, text: &str, mode: ImportMode) -> Result<ImportSummary> {
        let mut imported = match io::parse_csv(text.as_bytes()) {
            Ok(ws) => ws,
            Err(e) => return self.reject("import", e),
        };
        if let Err(e) = Self::repair_import(&mut imported) {
            return self.reject("import", e);
        }

        let summary = ImportSummary {
            projects: imported.projects.len(),
            tasks: imported.projects.iter().map(Project::task_count).sum(),
        };
        self.transact("import", |ws| {
            match mode {
                ImportMode::Replace => *ws = imported,
                ImportMode::Merge => {
                    for pic in &imported.pic_list {
                        ws.register_pic(pic);
                    }
                    for project in imported.projects {
                        match ws.project_index(&project.id) {
                            Some(i) => ws.projects[i] = project,
                            None => ws.projects.push(project),
                        }
                    }
                }
            }
            Ok(())
        })?;
        info!(projects = summary.projects, tasks = summary.tasks, ?mode, "csv imported");
        Ok(summary)
    }

    pub fn import_csv_file(&mut self, path: &Path, mode: ImportMode) -> Result<ImportSummary> {
        let text = std::fs::read_to_string(path)?;
        self.import_csv(&text, mode)
    }

    fn repair_import(imported: &mut Workspace) -> Result<()> {
        repair_dates(imported, "import");
        for project in &imported.projects {
            check_overlap(project)?;
        }
        Ok(())
    }

    pub fn export_csv(&self) -> Result<String> {
        io::to_csv_string(&self.workspace)
    }

    pub fn export_csv_file(&self, path: &Path) -> Result<usize> {
        let count = io::export_csv(&self.workspace, path)?;
        info!(count, path = %path.display(), "csv exported");
        Ok(count)
    }

    // --- History / reload ---

    pub fn undo(&mut self) -> bool {
        match self.undo.undo(&self.workspace) {
            Some(snapshot) => {
                self.workspace = snapshot;
                self.commit("undo");
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.undo.redo(&self.workspace) {
            Some(snapshot) => {
                self.workspace = snapshot;
                self.commit("redo");
                true
            }
            None => false,
        }
    }

    /// Throw away in-memory state and re-read the store.
    pub fn reload(&mut self) -> Result<()> {
        let mut workspace = self.store.load()?;
        repair_dates(&mut workspace, "reload");
        self.workspace = workspace;
        self.undo.clear();
        self.revision += 1;
        info!("workspace reloaded");
        Ok(())
    }
}

/// Clamp `start > due` windows to a single day, restore every envelope and
/// recompute completion. Used on data that did not come through `transact`.
fn repair_dates(ws: &mut Workspace, source: &str) {
    for project in &mut ws.projects {
        for task in &mut project.tasks {
            task.walk_mut(&mut |t| {
                if t.start_date > t.due {
                    warn!(source, task = %t.name, start = %t.start_date, due = %t.due, "start after due; clamping due");
                    t.due = t.start_date;
                }
            });
            if propagate::envelope_subtree(task) {
                warn!(source, task = %task.name, "parent ended before a sub-task; extended");
            }
        }
    }
    completion::recompute_workspace(ws);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{MemoryStore, Store};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn tracker() -> (Tracker, MemoryStore) {
        let store = MemoryStore::default();
        let tracker = Tracker::new(Box::new(store.clone()), Workspace::default());
        (tracker, store)
    }

    fn top(project: usize, i: usize) -> TaskLocation {
        TaskLocation::new(project, TaskPath::top_level(i))
    }

    #[test]
    fn add_task_persists_and_bumps_revision() {
        let (mut tracker, store) = tracker();
        let p = tracker.add_project("Website").unwrap();
        let loc = tracker
            .add_task(&TaskParent::Project(p), NewTask::new("Design", d(2025, 1, 1), d(2025, 1, 5)))
            .unwrap();
        assert_eq!(loc, top(0, 0));
        assert_eq!(tracker.revision(), 2);
        assert!(store.saved_len().is_some());
        assert_eq!(store.load().unwrap(), *tracker.workspace());
    }

    #[test]
    fn new_subtasks_follow_parent_and_extend_it() {
        let (mut tracker, _) = tracker();
        let p = tracker.add_project("P").unwrap();
        let parent = tracker
            .add_task(&TaskParent::Project(p), NewTask::new("Parent", d(2025, 1, 1), d(2025, 1, 5)))
            .unwrap();
        let child = tracker
            .add_task(&TaskParent::Task(parent.clone()), NewTask::new("Child", d(2025, 1, 2), d(2025, 1, 9)))
            .unwrap();
        assert_eq!(child.path, TaskPath::nested(0, 0));
        assert!(tracker.task(&child).unwrap().follows_parent());
        assert_eq!(tracker.task(&parent).unwrap().due, d(2025, 1, 9));
    }

    #[test]
    fn inverted_range_is_rejected_untouched() {
        let (mut tracker, _) = tracker();
        let p = tracker.add_project("P").unwrap();
        let loc = tracker
            .add_task(&TaskParent::Project(p), NewTask::new("A", d(2025, 1, 1), d(2025, 1, 5)))
            .unwrap();
        let before = tracker.workspace().clone();
        let err = tracker.set_task_dates(&loc, d(2025, 1, 6), d(2025, 1, 5)).unwrap_err();
        assert!(matches!(err, TrackerError::InvalidDateRange { .. }));
        assert_eq!(tracker.workspace(), &before);
    }

    #[test]
    fn shrinking_a_parent_below_children_is_rejected() {
        let (mut tracker, _) = tracker();
        let p = tracker.add_project("P").unwrap();
        let parent = tracker
            .add_task(&TaskParent::Project(p), NewTask::new("Parent", d(2025, 1, 1), d(2025, 1, 10)))
            .unwrap();
        let child = tracker
            .add_task(&TaskParent::Task(parent.clone()), NewTask::new("Child", d(2025, 1, 1), d(2025, 1, 8)))
            .unwrap();
        tracker.set_follows_parent(&child, false).unwrap();

        let err = tracker.set_task_dates(&parent, d(2025, 1, 1), d(2025, 1, 6)).unwrap_err();
        assert!(matches!(err, TrackerError::DueBeforeSubTasks { latest, .. } if latest == d(2025, 1, 8)));
        assert_eq!(tracker.task(&parent).unwrap().due, d(2025, 1, 10));
    }

    #[test]
    fn completion_edits_only_on_leaves() {
        let (mut tracker, _) = tracker();
        let p = tracker.add_project("P").unwrap();
        let parent = tracker
            .add_task(&TaskParent::Project(p), NewTask::new("Parent", d(2025, 1, 1), d(2025, 1, 10)))
            .unwrap();
        let a = tracker
            .add_task(&TaskParent::Task(parent.clone()), NewTask::new("A", d(2025, 1, 1), d(2025, 1, 2)))
            .unwrap();
        tracker
            .add_task(&TaskParent::Task(parent.clone()), NewTask::new("B", d(2025, 1, 1), d(2025, 1, 2)))
            .unwrap();

        assert!(matches!(tracker.set_task_completion(&parent, 50), Err(TrackerError::NotALeaf)));
        tracker.set_task_completion(&a, 255).unwrap();
        assert_eq!(tracker.task(&a).unwrap().completion, 100);
        assert_eq!(tracker.task(&parent).unwrap().completion, 50);
        assert_eq!(tracker.project(0).unwrap().completion, 50);
    }

    #[test]
    fn assigning_a_busy_pic_is_rejected() {
        let (mut tracker, _) = tracker();
        let p = tracker.add_project("P").unwrap();
        tracker
            .add_task(
                &TaskParent::Project(p),
                NewTask::new("A", d(2025, 1, 1), d(2025, 1, 5)).with_pic("Alice"),
            )
            .unwrap();
        let b = tracker
            .add_task(&TaskParent::Project(p), NewTask::new("B", d(2025, 1, 3), d(2025, 1, 8)))
            .unwrap();
        let err = tracker.set_task_pic(&b, Some("Alice".into())).unwrap_err();
        assert!(matches!(err, TrackerError::SchedulingConflict(_)));
        assert_eq!(tracker.task(&b).unwrap().pic, None);
        tracker.set_task_pic(&b, Some("Bob".into())).unwrap();
        assert_eq!(tracker.workspace().pic_list, vec!["Alice", "Bob"]);
    }

    #[test]
    fn delete_and_undo() {
        let (mut tracker, _) = tracker();
        let p = tracker.add_project("P").unwrap();
        let loc = tracker
            .add_task(&TaskParent::Project(p), NewTask::new("A", d(2025, 1, 1), d(2025, 1, 5)))
            .unwrap();
        let removed = tracker.delete_task(&loc).unwrap();
        assert_eq!(removed.name, "A");
        assert!(tracker.project(0).unwrap().tasks.is_empty());

        assert!(tracker.undo());
        assert_eq!(tracker.task(&loc).unwrap().name, "A");
        assert!(tracker.redo());
        assert!(tracker.project(0).unwrap().tasks.is_empty());
        assert!(tracker.delete_task(&loc).is_err());
    }

    #[test]
    fn removing_a_pic_unassigns_it() {
        let (mut tracker, _) = tracker();
        let p = tracker.add_project("P").unwrap();
        let parent = tracker
            .add_task(
                &TaskParent::Project(p),
                NewTask::new("A", d(2025, 1, 1), d(2025, 1, 5)).with_pic("Alice"),
            )
            .unwrap();
        let child = tracker
            .add_task(
                &TaskParent::Task(parent.clone()),
                NewTask::new("B", d(2025, 1, 5), d(2025, 1, 5)).with_pic("Carol"),
            )
            .unwrap();
        tracker.remove_pic("Alice").unwrap();
        assert_eq!(tracker.task(&parent).unwrap().pic, None);
        assert_eq!(tracker.task(&child).unwrap().pic.as_deref(), Some("Carol"));
        assert_eq!(tracker.workspace().pic_list, vec!["Carol"]);
    }

    #[test]
    fn archive_toggle() {
        let (mut tracker, _) = tracker();
        let p = tracker.add_project("Old").unwrap();
        assert!(tracker.toggle_archived(p).unwrap());
        assert_eq!(tracker.workspace().active_projects().count(), 0);
        assert!(!tracker.toggle_archived(p).unwrap());
        assert!(tracker.toggle_archived(7).is_err());
    }

    #[test]
    fn reload_reads_the_store_back() {
        let (mut tracker, _) = tracker();
        tracker.add_project("Saved").unwrap();
        tracker.reload().unwrap();
        assert_eq!(tracker.project(0).unwrap().name, "Saved");
        assert!(!tracker.can_undo());
    }
}
