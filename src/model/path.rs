use std::fmt;

/// Position of a task inside a project's tree: the index chain from the
/// top-level task list down to the node.
///
/// A path of length one is a top-level task; anything longer is nested and
/// [`TaskPath::parent`] gives the owning task. Paths are positional, so they
/// are only valid until the next structural edit of the tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskPath(Vec<usize>);

impl TaskPath {
    pub fn top_level(index: usize) -> Self {
        Self(vec![index])
    }

    pub fn nested(parent: usize, sub: usize) -> Self {
        Self(vec![parent, sub])
    }

    /// Build a path from raw indices. Returns `None` for an empty chain.
    pub fn from_indices(indices: Vec<usize>) -> Option<Self> {
        if indices.is_empty() {
            None
        } else {
            Some(Self(indices))
        }
    }

    /// Path of this task's `index`-th sub-task.
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// The owning task's path, or `None` for a top-level task.
    pub fn parent(&self) -> Option<TaskPath> {
        if self.0.len() > 1 {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        } else {
            None
        }
    }

    /// Position within the sibling list.
    pub fn index(&self) -> usize {
        self.0[self.0.len() - 1]
    }

    /// 0 for top-level tasks.
    pub fn depth(&self) -> usize {
        self.0.len() - 1
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn is_top_level(&self) -> bool {
        self.0.len() == 1
    }

    /// Strict ancestry: a path is not its own ancestor.
    pub fn is_ancestor_of(&self, other: &TaskPath) -> bool {
        other.0.len() > self.0.len() && other.0.starts_with(&self.0)
    }

    /// All ancestor paths, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = TaskPath> + '_ {
        (1..self.0.len())
            .rev()
            .map(move |len| Self(self.0[..len].to_vec()))
    }
}

/// Dot-joined indices, e.g. `2.0`. Also the CSV `ParentTaskID` encoding.
impl fmt::Display for TaskPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, idx) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{idx}")?;
        }
        Ok(())
    }
}

impl std::str::FromStr for TaskPath {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let indices = s
            .trim()
            .split('.')
            .map(|part| part.trim().parse::<usize>())
            .collect::<Result<Vec<_>, _>>()?;
        // `split` always yields at least one part, so `indices` is non-empty.
        Ok(Self(indices))
    }
}

/// A task addressed across the whole workspace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskLocation {
    pub project: usize,
    pub path: TaskPath,
}

impl TaskLocation {
    pub fn new(project: usize, path: TaskPath) -> Self {
        Self { project, path }
    }

    pub fn parent(&self) -> Option<TaskLocation> {
        self.path.parent().map(|path| Self::new(self.project, path))
    }
}
