use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::path::TaskLocation;
use super::project::Project;
use super::task::Task;

/// Everything the tracker persists: the project list and the known PICs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub pic_list: Vec<String>,
}

impl Workspace {
    pub fn project_index(&self, id: &str) -> Option<usize> {
        self.projects.iter().position(|p| p.id == id)
    }

    /// Indices of projects shown by default (not archived).
    pub fn active_projects(&self) -> impl Iterator<Item = usize> + '_ {
        self.projects
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.is_archived)
            .map(|(i, _)| i)
    }

    pub fn task(&self, loc: &TaskLocation) -> Option<&Task> {
        self.projects.get(loc.project)?.task(&loc.path)
    }

    pub fn task_mut(&mut self, loc: &TaskLocation) -> Option<&mut Task> {
        self.projects.get_mut(loc.project)?.task_mut(&loc.path)
    }

    /// Locate a task anywhere in the workspace by id.
    pub fn locate(&self, id: Uuid) -> Option<TaskLocation> {
        self.projects.iter().enumerate().find_map(|(i, project)| {
            project
                .find_path(id)
                .map(|path| TaskLocation::new(i, path))
        })
    }

    /// Add `pic` to the PIC list if it is new. Blank names are ignored.
    pub fn register_pic(&mut self, pic: &str) -> bool {
        let pic = pic.trim();
        if pic.is_empty() || self.pic_list.iter().any(|p| p == pic) {
            return false;
        }
        self.pic_list.push(pic.to_string());
        true
    }
}
