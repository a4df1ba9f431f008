use crate::model::Workspace;

/// Maximum number of snapshots kept on the undo stack.
pub const UNDO_LIMIT: usize = 50;

/// Snapshot-based undo/redo. Each entry is the whole workspace as it was
/// before a committed mutation.
#[derive(Debug, Default)]
pub struct UndoHistory {
    undo_stack: Vec<Workspace>,
    redo_stack: Vec<Workspace>,
}

impl UndoHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the state from before a mutation. Clears the redo stack.
    pub fn push(&mut self, before: Workspace) {
        self.undo_stack.push(before);
        if self.undo_stack.len() > UNDO_LIMIT {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }

    /// Pop the last snapshot, saving `current` for redo.
    pub fn undo(&mut self, current: &Workspace) -> Option<Workspace> {
        let snapshot = self.undo_stack.pop()?;
        self.redo_stack.push(current.clone());
        Some(snapshot)
    }

    pub fn redo(&mut self, current: &Workspace) -> Option<Workspace> {
        let snapshot = self.redo_stack.pop()?;
        self.undo_stack.push(current.clone());
        Some(snapshot)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
