//! Gantt bar drag/resize gestures.
//!
//! A gesture goes `Idle → Dragging → Committed | Reverted`. While dragging
//! only the controller's tentative window changes; the model is written once,
//! on [`DragController::finish`], through [`Tracker::reschedule`], which
//! rolls the whole change back on a PIC conflict.

use chrono::NaiveDate;
use tracing::{debug, info};
use uuid::Uuid;

use super::overlap::Conflict;
use super::propagate::required_due;
use crate::date;
use crate::error::{Result, TrackerError};
use crate::model::{Task, TaskLocation, TimelineViewport, Workspace};
use crate::tracker::Tracker;

/// Which part of the bar is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Move,
    ResizeStart,
    ResizeEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    Dragging,
    Committed,
    Reverted,
}

/// Result of feeding a pointer position to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragUpdate {
    /// New tentative window, inside the rendered range.
    Tentative { start: NaiveDate, due: NaiveDate },
    /// The tentative window left the rendered range; the viewport was widened
    /// and the chart should be redrawn. Nothing is committed.
    Rescaled { start: NaiveDate, due: NaiveDate },
}

/// How a gesture ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// The pointer came back to where it started.
    Unchanged,
    Committed { start: NaiveDate, due: NaiveDate },
    /// The change would double-book a PIC; the model is as it was.
    Reverted(Conflict),
}

/// State captured on pointer-down.
#[derive(Debug, Clone)]
pub struct DragSession {
    pub task_id: Uuid,
    pub mode: DragMode,
    pub original_start: NaiveDate,
    pub original_due: NaiveDate,
    pub tentative_start: NaiveDate,
    pub tentative_due: NaiveDate,
    duration: i64,
    days_per_pixel: f64,
    /// Copy of the dragged subtree, used to compute sub-task clamps.
    scratch: Task,
}

impl DragSession {
    fn window_for(&self, day_delta: i64) -> (NaiveDate, NaiveDate) {
        if day_delta == 0 {
            return (self.original_start, self.original_due);
        }
        match self.mode {
            DragMode::Move => {
                let start = date::add_days(self.original_start, day_delta);
                let mut due = date::add_days(start, self.duration);
                if let Some(latest) = required_due(&self.scratch, start) {
                    due = due.max(latest);
                }
                (start, due)
            }
            DragMode::ResizeStart => {
                // A window already under a day keeps its start rather than
                // jumping left.
                let latest_start = date::add_days(self.original_due, -1).max(self.original_start);
                let start = date::add_days(self.original_start, day_delta).min(latest_start);
                (start, self.original_due)
            }
            DragMode::ResizeEnd => {
                let mut due = date::add_days(self.original_due, day_delta).max(self.original_start);
                if let Some(latest) = required_due(&self.scratch, self.original_start) {
                    due = due.max(latest);
                }
                (self.original_start, due)
            }
        }
    }

    fn is_unchanged(&self) -> bool {
        self.tentative_start == self.original_start && self.tentative_due == self.original_due
    }
}

/// Drives one drag gesture at a time.
#[derive(Debug)]
pub struct DragController {
    phase: DragPhase,
    session: Option<DragSession>,
    /// Days of slack added when the viewport has to grow.
    padding_days: i64,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new(7)
    }
}

impl DragController {
    pub fn new(padding_days: i64) -> Self {
        Self {
            phase: DragPhase::Idle,
            session: None,
            padding_days,
        }
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Tentative window of `task_id` if it is the task being dragged.
    pub fn tentative_window(&self, task_id: Uuid) -> Option<(NaiveDate, NaiveDate)> {
        self.session
            .as_ref()
            .filter(|s| s.task_id == task_id)
            .map(|s| (s.tentative_start, s.tentative_due))
    }

    /// Pointer-down on a bar or one of its handles.
    pub fn begin(
        &mut self,
        workspace: &Workspace,
        location: &TaskLocation,
        mode: DragMode,
        viewport: &TimelineViewport,
    ) -> Result<()> {
        if self.session.is_some() {
            // The release of the previous gesture never arrived.
            self.cancel();
        }
        let task = workspace
            .task(location)
            .ok_or_else(|| TrackerError::structural("drag started on a missing task"))?;
        debug!(task = %task.name, ?mode, "drag started");
        self.session = Some(DragSession {
            task_id: task.id,
            mode,
            original_start: task.start_date,
            original_due: task.due,
            tentative_start: task.start_date,
            tentative_due: task.due,
            duration: task.duration_days(),
            days_per_pixel: viewport.days_per_pixel(),
            scratch: task.clone(),
        });
        self.phase = DragPhase::Dragging;
        Ok(())
    }

    /// Pointer-move with the cumulative horizontal delta since pointer-down.
    /// Returns `None` when no gesture is active.
    pub fn update(&mut self, delta_px: f32, viewport: &mut TimelineViewport) -> Option<DragUpdate> {
        let session = self.session.as_mut()?;
        let day_delta = (f64::from(delta_px) * session.days_per_pixel).round() as i64;
        let (start, due) = session.window_for(day_delta);
        session.tentative_start = start;
        session.tentative_due = due;

        if viewport.contains_window(start, due) {
            Some(DragUpdate::Tentative { start, due })
        } else {
            viewport.widen_to(start, due, self.padding_days);
            debug!(%start, %due, "timeline widened during drag");
            Some(DragUpdate::Rescaled { start, due })
        }
    }

    /// Pointer-up: write the tentative window into the model.
    pub fn finish(&mut self, tracker: &mut Tracker) -> Result<DragOutcome> {
        let session = self
            .session
            .take()
            .ok_or_else(|| TrackerError::structural("no drag in progress"))?;

        if session.is_unchanged() {
            self.phase = DragPhase::Idle;
            return Ok(DragOutcome::Unchanged);
        }

        let Some(location) = tracker.workspace().locate(session.task_id) else {
            self.phase = DragPhase::Reverted;
            return Err(TrackerError::structural("dragged task no longer exists"));
        };

        let (start, due) = (session.tentative_start, session.tentative_due);
        match tracker.reschedule(&location, start, due) {
            Ok(()) => {
                info!(%start, %due, "drag committed");
                self.phase = DragPhase::Committed;
                Ok(DragOutcome::Committed { start, due })
            }
            Err(TrackerError::SchedulingConflict(conflict)) => {
                self.phase = DragPhase::Reverted;
                Ok(DragOutcome::Reverted(conflict))
            }
            Err(e) => {
                self.phase = DragPhase::Reverted;
                Err(e)
            }
        }
    }

    /// Abandon the gesture without touching the model.
    pub fn cancel(&mut self) {
        if let Some(session) = self.session.take() {
            debug!(task_id = %session.task_id, "drag cancelled");
        }
        self.phase = DragPhase::Idle;
    }
}
