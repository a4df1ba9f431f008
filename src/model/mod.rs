pub mod path;
pub mod project;
pub mod task;
pub mod timeline;
pub mod workspace;

pub use path::{TaskLocation, TaskPath};
pub use project::Project;
pub use task::{Task, PARENT_DEPENDENCY};
pub use timeline::{TimelineScale, TimelineViewport};
pub use workspace::Workspace;
