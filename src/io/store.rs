use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::debug;

use crate::error::Result;
use crate::model::Workspace;

/// Where the workspace lives between sessions. Saves always write the whole
/// workspace; the last write wins.
pub trait Store {
    fn load(&self) -> Result<Workspace>;
    fn save(&self, workspace: &Workspace) -> Result<()>;
}

/// Pretty-printed JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Store for JsonFileStore {
    /// A missing file is an empty workspace, not an error.
    fn load(&self) -> Result<Workspace> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no data file yet");
            return Ok(Workspace::default());
        }
        let json = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&json)?)
    }

    fn save(&self, workspace: &Workspace) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(workspace)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

/// In-memory store. Clones share the same slot, so a test can keep a handle
/// after giving the store to a tracker.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Rc<RefCell<Option<String>>>,
}

impl MemoryStore {
    /// Number of bytes last saved, if anything was saved.
    pub fn saved_len(&self) -> Option<usize> {
        self.slot.borrow().as_ref().map(String::len)
    }
}

impl Store for MemoryStore {
    fn load(&self) -> Result<Workspace> {
        match self.slot.borrow().as_deref() {
            Some(json) => Ok(serde_json::from_str(json)?),
            None => Ok(Workspace::default()),
        }
    }

    fn save(&self, workspace: &Workspace) -> Result<()> {
        *self.slot.borrow_mut() = Some(serde_json::to_string(workspace)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Project, Task};
    use chrono::NaiveDate;

    fn sample() -> Workspace {
        let day = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let mut project = Project::new("Launch");
        let mut task = Task::new("Prepare", day, day).with_pic("Alice");
        task.sub_tasks
            .push(Task::new("Checklist", day, day).following_parent());
        project.tasks.push(task);
        Workspace {
            projects: vec![project],
            pic_list: vec!["Alice".into()],
        }
    }

    #[test]
    fn json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join("tracker.json"));
        let ws = sample();
        store.save(&ws).unwrap();
        assert_eq!(store.load().unwrap(), ws);
    }

    #[test]
    fn missing_file_loads_empty_workspace() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("absent.json"));
        assert_eq!(store.load().unwrap(), Workspace::default());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(JsonFileStore::new(path).load().is_err());
    }

    #[test]
    fn memory_store_shares_its_slot() {
        let store = MemoryStore::default();
        let handle = store.clone();
        assert_eq!(handle.saved_len(), None);
        let ws = sample();
        store.save(&ws).unwrap();
        assert!(handle.saved_len().unwrap() > 0);
        assert_eq!(handle.load().unwrap(), ws);
    }
}
