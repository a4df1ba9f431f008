use chrono::NaiveDate;
use thiserror::Error;

use crate::schedule::overlap::Conflict;

pub type Result<T> = std::result::Result<T, TrackerError>;

/// Every way a tracker operation can be rejected.
///
/// None of these are fatal: the offending operation is refused and the model
/// is left exactly as it was before the call.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("start date {start} is after due date {due}")]
    InvalidDateRange { start: NaiveDate, due: NaiveDate },

    #[error("due date {due} is earlier than the latest sub-task due date {latest}")]
    DueBeforeSubTasks { due: NaiveDate, latest: NaiveDate },

    #[error("scheduling conflict: {0}")]
    SchedulingConflict(Conflict),

    #[error("invalid structure: {0}")]
    Structural(String),

    #[error("completion can only be edited on tasks without sub-tasks")]
    NotALeaf,

    #[error("import row {row}: {reason}")]
    MalformedImportRow { row: usize, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl TrackerError {
    pub(crate) fn structural(msg: impl Into<String>) -> Self {
        Self::Structural(msg.into())
    }

    pub(crate) fn malformed(row: usize, reason: impl Into<String>) -> Self {
        Self::MalformedImportRow {
            row,
            reason: reason.into(),
        }
    }
}
