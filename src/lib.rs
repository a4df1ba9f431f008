//! Gantt Tracker - hierarchical projects, tasks and sub-tasks on a timeline.
//!
//! The library holds the scheduling core (task tree, completion roll-up,
//! date propagation, PIC overlap detection, drag controller, moves) and the
//! persistence/CSV collaborators. The `gantt-tracker` binary is an egui
//! front-end on top of [`tracker::Tracker`].

pub mod config;
pub mod date;
pub mod error;
pub mod io;
pub mod model;
pub mod schedule;
pub mod tracker;

pub use error::{Result, TrackerError};
pub use model::{Project, Task, TaskLocation, TaskPath, Workspace};
pub use tracker::Tracker;
