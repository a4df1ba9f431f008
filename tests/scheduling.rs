use chrono::NaiveDate;
use gantt_tracker::io::MemoryStore;
use gantt_tracker::model::{TimelineViewport, PARENT_DEPENDENCY};
use gantt_tracker::schedule::{has_overlap, DragController, DragMode, DragOutcome, DragPhase, DragUpdate};
use gantt_tracker::tracker::{DropMode, NewTask, TaskParent};
use gantt_tracker::{TaskLocation, TaskPath, Tracker, TrackerError, Workspace};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn top(i: usize) -> TaskLocation {
    TaskLocation::new(0, TaskPath::top_level(i))
}

fn nested(parent: usize, sub: usize) -> TaskLocation {
    TaskLocation::new(0, TaskPath::nested(parent, sub))
}

fn empty_tracker() -> Tracker {
    let mut tracker = Tracker::new(Box::new(MemoryStore::default()), Workspace::default());
    tracker.add_project("Roadmap").unwrap();
    tracker
}

/// Two Alice tasks, 2025-01-01..05 and 2025-01-10..15.
fn alice_tracker() -> Tracker {
    let mut tracker = empty_tracker();
    let project = TaskParent::Project(0);
    tracker
        .add_task(&project, NewTask::new("Write brief", d(2025, 1, 1), d(2025, 1, 5)).with_pic("Alice"))
        .unwrap();
    tracker
        .add_task(&project, NewTask::new("Review", d(2025, 1, 10), d(2025, 1, 15)).with_pic("Alice"))
        .unwrap();
    tracker
}

fn window(tracker: &Tracker, loc: &TaskLocation) -> (NaiveDate, NaiveDate) {
    let task = tracker.task(loc).unwrap();
    (task.start_date, task.due)
}

#[test]
fn conflicting_reschedule_is_rolled_back() {
    let mut tracker = alice_tracker();
    let before = tracker.workspace().clone();

    let preview = tracker.preview_dates(&top(0), d(2025, 1, 8), d(2025, 1, 12)).unwrap();
    assert!(has_overlap(&preview));

    let err = tracker.reschedule(&top(0), d(2025, 1, 8), d(2025, 1, 12)).unwrap_err();
    assert!(matches!(err, TrackerError::SchedulingConflict(ref c) if c.pic == "Alice"));

    assert_eq!(*tracker.workspace(), before);
    assert_eq!(window(&tracker, &top(0)), (d(2025, 1, 1), d(2025, 1, 5)));
    assert_eq!(window(&tracker, &top(1)), (d(2025, 1, 10), d(2025, 1, 15)));
    assert!(!has_overlap(&tracker.workspace().projects[0]));
}

#[test]
fn conflicting_drag_reverts() {
    let mut tracker = alice_tracker();
    let before = tracker.workspace().clone();
    let revision = tracker.revision();

    let mut viewport = TimelineViewport::new(d(2024, 12, 25), d(2025, 1, 31));
    viewport.pixels_per_day = 10.0;
    let mut drag = DragController::new(7);
    drag.begin(tracker.workspace(), &top(0), DragMode::Move, &viewport).unwrap();

    // 70px at 10px/day is one week later.
    let update = drag.update(70.0, &mut viewport).unwrap();
    assert_eq!(
        update,
        DragUpdate::Tentative {
            start: d(2025, 1, 8),
            due: d(2025, 1, 12)
        }
    );
    // Nothing is written while dragging.
    assert_eq!(*tracker.workspace(), before);

    let outcome = drag.finish(&mut tracker).unwrap();
    assert!(matches!(outcome, DragOutcome::Reverted(_)));
    assert_eq!(drag.phase(), DragPhase::Reverted);
    assert_eq!(*tracker.workspace(), before);
    assert_eq!(tracker.revision(), revision);
}

#[test]
fn drag_commits_and_widens_viewport() {
    let mut tracker = alice_tracker();
    let mut viewport = TimelineViewport::new(d(2025, 1, 1), d(2025, 1, 20));
    viewport.pixels_per_day = 10.0;
    let mut drag = DragController::new(7);

    drag.begin(tracker.workspace(), &top(1), DragMode::ResizeEnd, &viewport).unwrap();
    let update = drag.update(100.0, &mut viewport).unwrap();
    assert_eq!(
        update,
        DragUpdate::Rescaled {
            start: d(2025, 1, 10),
            due: d(2025, 1, 25)
        }
    );
    assert_eq!(viewport.end, d(2025, 2, 1));

    let outcome = drag.finish(&mut tracker).unwrap();
    assert_eq!(
        outcome,
        DragOutcome::Committed {
            start: d(2025, 1, 10),
            due: d(2025, 1, 25)
        }
    );
    assert_eq!(window(&tracker, &top(1)), (d(2025, 1, 10), d(2025, 1, 25)));
}

#[test]
fn resize_start_keeps_one_day() {
    let tracker = alice_tracker();
    let mut viewport = TimelineViewport::new(d(2024, 12, 1), d(2025, 2, 28));
    viewport.pixels_per_day = 10.0;
    let mut drag = DragController::new(7);

    drag.begin(tracker.workspace(), &top(0), DragMode::ResizeStart, &viewport).unwrap();
    let update = drag.update(500.0, &mut viewport).unwrap();
    assert_eq!(
        update,
        DragUpdate::Tentative {
            start: d(2025, 1, 4),
            due: d(2025, 1, 5)
        }
    );
    drag.cancel();
    assert!(!drag.is_dragging());
    assert_eq!(drag.phase(), DragPhase::Idle);
}

#[test]
fn parent_edit_slides_tagged_subtask() {
    let mut tracker = empty_tracker();
    let parent = tracker
        .add_task(&TaskParent::Project(0), NewTask::new("Parent", d(2025, 3, 1), d(2025, 3, 10)))
        .unwrap();
    let sub = tracker
        .add_task(&TaskParent::Task(parent.clone()), NewTask::new("Sub", d(2025, 3, 2), d(2025, 3, 4)))
        .unwrap();
    assert!(tracker.task(&sub).unwrap().follows_parent());

    tracker.set_task_dates(&parent, d(2025, 3, 5), d(2025, 3, 14)).unwrap();

    assert_eq!(window(&tracker, &parent), (d(2025, 3, 5), d(2025, 3, 14)));
    assert_eq!(window(&tracker, &sub), (d(2025, 3, 5), d(2025, 3, 7)));
}

#[test]
fn subtask_due_extends_parent_and_reanchors_siblings() {
    let mut tracker = empty_tracker();
    let parent = tracker
        .add_task(&TaskParent::Project(0), NewTask::new("Parent", d(2025, 4, 1), d(2025, 4, 15)))
        .unwrap();
    let first = tracker
        .add_task(&TaskParent::Task(parent.clone()), NewTask::new("First", d(2025, 4, 1), d(2025, 4, 10)))
        .unwrap();
    let second = tracker
        .add_task(&TaskParent::Task(parent.clone()), NewTask::new("Second", d(2025, 4, 5), d(2025, 4, 8)))
        .unwrap();

    tracker.set_task_dates(&first, d(2025, 4, 1), d(2025, 4, 20)).unwrap();

    assert_eq!(window(&tracker, &parent), (d(2025, 4, 1), d(2025, 4, 20)));
    assert_eq!(window(&tracker, &first), (d(2025, 4, 1), d(2025, 4, 20)));
    // Re-propagation anchors the tagged sibling to the parent's start.
    assert_eq!(window(&tracker, &second), (d(2025, 4, 1), d(2025, 4, 4)));
}

#[test]
fn completion_rolls_up_through_levels() {
    let mut tracker = empty_tracker();
    let parent = tracker
        .add_task(&TaskParent::Project(0), NewTask::new("Parent", d(2025, 5, 1), d(2025, 5, 20)))
        .unwrap();
    let a = tracker
        .add_task(&TaskParent::Task(parent.clone()), NewTask::new("A", d(2025, 5, 1), d(2025, 5, 5)))
        .unwrap();
    let b = tracker
        .add_task(&TaskParent::Task(parent.clone()), NewTask::new("B", d(2025, 5, 1), d(2025, 5, 5)))
        .unwrap();
    tracker
        .add_task(&TaskParent::Project(0), NewTask::new("Solo", d(2025, 5, 1), d(2025, 5, 2)))
        .unwrap();

    tracker.set_task_completion(&a, 100).unwrap();
    tracker.set_task_completion(&b, 50).unwrap();

    assert_eq!(tracker.task(&parent).unwrap().completion, 75);
    // (75 + 0) / 2 rounds up.
    assert_eq!(tracker.workspace().projects[0].completion, 38);
    assert!(matches!(
        tracker.set_task_completion(&parent, 10),
        Err(TrackerError::NotALeaf)
    ));
}

#[test]
fn moving_subtask_out_strips_parent_tag() {
    let mut tracker = empty_tracker();
    let parent = tracker
        .add_task(&TaskParent::Project(0), NewTask::new("Parent", d(2025, 6, 1), d(2025, 6, 10)))
        .unwrap();
    tracker
        .add_task(&TaskParent::Task(parent.clone()), NewTask::new("Sub", d(2025, 6, 1), d(2025, 6, 3)))
        .unwrap();
    assert_eq!(tracker.workspace().projects[0].tasks[0].sub_tasks.len(), 1);

    let moved = tracker.move_task(&nested(0, 0), &top(0), DropMode::After).unwrap();

    assert_eq!(moved, top(1));
    let task = tracker.task(&moved).unwrap();
    assert_eq!(task.name, "Sub");
    assert!(!task.dependencies.contains(PARENT_DEPENDENCY));
    assert!(tracker.task(&top(0)).unwrap().sub_tasks.is_empty());
}

#[test]
fn failed_moves_leave_workspace_identical() {
    let mut tracker = alice_tracker();
    tracker
        .add_task(&TaskParent::Task(top(0)), NewTask::new("Notes", d(2025, 1, 1), d(2025, 1, 2)))
        .unwrap();
    tracker.add_project("Other").unwrap();
    tracker
        .add_task(
            &TaskParent::Project(1),
            NewTask::new("Standup", d(2025, 1, 2), d(2025, 1, 4)).with_pic("Alice"),
        )
        .unwrap();
    let before = tracker.workspace().clone();
    let revision = tracker.revision();

    // Into its own sub-task.
    let err = tracker.move_task(&top(0), &nested(0, 0), DropMode::Into).unwrap_err();
    assert!(matches!(err, TrackerError::Structural(_)));
    assert_eq!(*tracker.workspace(), before);

    // Out-of-range source.
    assert!(tracker.move_task(&top(9), &top(0), DropMode::Before).is_err());
    assert_eq!(*tracker.workspace(), before);

    // Alice's standup lands on top of "Write brief".
    let standup = TaskLocation::new(1, TaskPath::top_level(0));
    let err = tracker.move_task(&standup, &top(0), DropMode::Before).unwrap_err();
    assert!(matches!(err, TrackerError::SchedulingConflict(_)));
    assert_eq!(*tracker.workspace(), before);
    assert_eq!(tracker.revision(), revision);
}

#[test]
fn undo_restores_rescheduled_dates() {
    let mut tracker = alice_tracker();
    tracker.set_task_dates(&top(1), d(2025, 1, 20), d(2025, 1, 22)).unwrap();
    assert!(tracker.undo());
    assert_eq!(window(&tracker, &top(1)), (d(2025, 1, 10), d(2025, 1, 15)));
    assert!(tracker.redo());
    assert_eq!(window(&tracker, &top(1)), (d(2025, 1, 20), d(2025, 1, 22)));
}

/// Parent 2025-04-01..15 with two tagged sub-tasks: "Sub" 04-01..05 and
/// "Sibling" 04-03..06, which starts after the parent.
fn april_tracker() -> (Tracker, TaskLocation, TaskLocation, TaskLocation) {
    let mut tracker = empty_tracker();
    let parent = tracker
        .add_task(&TaskParent::Project(0), NewTask::new("Parent", d(2025, 4, 1), d(2025, 4, 15)))
        .unwrap();
    let sub = tracker
        .add_task(&TaskParent::Task(parent.clone()), NewTask::new("Sub", d(2025, 4, 1), d(2025, 4, 5)))
        .unwrap();
    let sibling = tracker
        .add_task(&TaskParent::Task(parent.clone()), NewTask::new("Sibling", d(2025, 4, 3), d(2025, 4, 6)))
        .unwrap();
    (tracker, parent, sub, sibling)
}

fn april_viewport() -> TimelineViewport {
    let mut viewport = TimelineViewport::new(d(2025, 3, 1), d(2025, 6, 1));
    viewport.pixels_per_day = 10.0;
    viewport
}

#[test]
fn edited_subtask_keeps_its_window_when_parent_extends() {
    let (mut tracker, parent, sub, sibling) = april_tracker();
    assert_eq!(window(&tracker, &sibling), (d(2025, 4, 3), d(2025, 4, 6)));

    tracker.set_task_dates(&sub, d(2025, 4, 10), d(2025, 4, 20)).unwrap();

    assert_eq!(window(&tracker, &sub), (d(2025, 4, 10), d(2025, 4, 20)));
    assert_eq!(window(&tracker, &parent), (d(2025, 4, 1), d(2025, 4, 20)));
    assert_eq!(window(&tracker, &sibling), (d(2025, 4, 1), d(2025, 4, 4)));
}

#[test]
fn dragged_subtask_commits_the_window_it_reports() {
    let (mut tracker, parent, sub, _) = april_tracker();
    let mut viewport = april_viewport();
    let mut drag = DragController::new(7);
    drag.begin(tracker.workspace(), &sub, DragMode::Move, &viewport).unwrap();
    assert_eq!(
        drag.update(150.0, &mut viewport),
        Some(DragUpdate::Tentative {
            start: d(2025, 4, 16),
            due: d(2025, 4, 20)
        })
    );

    let outcome = drag.finish(&mut tracker).unwrap();
    assert_eq!(
        outcome,
        DragOutcome::Committed {
            start: d(2025, 4, 16),
            due: d(2025, 4, 20)
        }
    );
    assert_eq!(window(&tracker, &sub), (d(2025, 4, 16), d(2025, 4, 20)));
    assert_eq!(window(&tracker, &parent).1, d(2025, 4, 20));
}

#[test]
fn resized_subtask_end_pushes_parent_without_moving_start() {
    let (mut tracker, parent, _, sibling) = april_tracker();
    let mut viewport = april_viewport();
    let mut drag = DragController::new(7);
    drag.begin(tracker.workspace(), &sibling, DragMode::ResizeEnd, &viewport).unwrap();
    drag.update(140.0, &mut viewport).unwrap();

    let outcome = drag.finish(&mut tracker).unwrap();
    assert_eq!(
        outcome,
        DragOutcome::Committed {
            start: d(2025, 4, 3),
            due: d(2025, 4, 20)
        }
    );
    assert_eq!(window(&tracker, &sibling), (d(2025, 4, 3), d(2025, 4, 20)));
    assert_eq!(window(&tracker, &parent), (d(2025, 4, 1), d(2025, 4, 20)));
}

#[test]
fn added_subtask_past_parent_due_keeps_its_window() {
    let (mut tracker, parent, _, _) = april_tracker();
    let late = tracker
        .add_task(&TaskParent::Task(parent.clone()), NewTask::new("Late", d(2025, 4, 12), d(2025, 4, 22)))
        .unwrap();

    assert!(tracker.task(&late).unwrap().follows_parent());
    assert_eq!(window(&tracker, &late), (d(2025, 4, 12), d(2025, 4, 22)));
    assert_eq!(window(&tracker, &parent), (d(2025, 4, 1), d(2025, 4, 22)));
}

#[test]
fn task_dropped_into_parent_keeps_its_window() {
    let (mut tracker, parent, _, _) = april_tracker();
    let loose = tracker
        .add_task(&TaskParent::Project(0), NewTask::new("Loose", d(2025, 4, 12), d(2025, 4, 25)))
        .unwrap();

    let moved = tracker.move_task(&loose, &parent, DropMode::Into).unwrap();

    assert_eq!(moved, nested(0, 2));
    assert!(tracker.task(&moved).unwrap().follows_parent());
    assert_eq!(window(&tracker, &moved), (d(2025, 4, 12), d(2025, 4, 25)));
    assert_eq!(window(&tracker, &parent), (d(2025, 4, 1), d(2025, 4, 25)));
}
