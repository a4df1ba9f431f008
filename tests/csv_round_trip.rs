use chrono::NaiveDate;
use gantt_tracker::io::MemoryStore;
use gantt_tracker::tracker::{ImportMode, NewTask, TaskParent};
use gantt_tracker::{Task, TaskLocation, TaskPath, Tracker, TrackerError, Workspace};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn tracker() -> Tracker {
    Tracker::new(Box::new(MemoryStore::default()), Workspace::default())
}

fn populated() -> Tracker {
    let mut tracker = tracker();
    tracker.add_project("Website").unwrap();
    tracker.add_project("Empty").unwrap();
    tracker.set_archived(1, true).unwrap();
    tracker.add_pic("Carol").unwrap();

    let design = tracker
        .add_task(
            &TaskParent::Project(0),
            NewTask::new("Design", d(2025, 2, 1), d(2025, 2, 20)).with_pic("Alice"),
        )
        .unwrap();
    let wireframes = tracker
        .add_task(
            &TaskParent::Task(design.clone()),
            NewTask::new("Wireframes", d(2025, 2, 1), d(2025, 2, 5)).with_pic("Bob"),
        )
        .unwrap();
    tracker
        .add_task(
            &TaskParent::Task(wireframes.clone()),
            NewTask::new("Mobile, tablet", d(2025, 2, 1), d(2025, 2, 3)),
        )
        .unwrap();
    let review = tracker
        .add_task(
            &TaskParent::Task(design.clone()),
            NewTask::new("Review", d(2025, 2, 6), d(2025, 2, 8)),
        )
        .unwrap();
    tracker.set_follows_parent(&review, false).unwrap();
    tracker
        .set_task_completion(&TaskLocation::new(0, TaskPath::from_indices(vec![0, 0, 0]).unwrap()), 40)
        .unwrap();
    tracker.set_task_completion(&review, 100).unwrap();
    tracker.set_task_notes(&review, "Sign-off from \"legal\"").unwrap();
    tracker
        .add_task(&TaskParent::Project(0), NewTask::new("Launch", d(2025, 3, 1), d(2025, 3, 1)))
        .unwrap();
    tracker
}

/// The parts of a task that survive CSV, depth-first.
fn flatten(tasks: &[Task]) -> Vec<(String, NaiveDate, NaiveDate, u8, Option<String>, bool, String, usize)> {
    let mut out = Vec::new();
    for task in tasks {
        task.walk(0, &mut |t, depth| {
            out.push((
                t.name.clone(),
                t.start_date,
                t.due,
                t.completion,
                t.pic.clone(),
                t.follows_parent(),
                t.notes.clone(),
                depth,
            ));
        });
    }
    out
}

#[test]
fn export_then_import_keeps_tasks() {
    let source = populated();
    let csv = source.export_csv().unwrap();
    assert!(csv.starts_with("ProjectID,ProjectName,TaskName,DueDate"));

    let mut target = tracker();
    let summary = target.import_csv(&csv, ImportMode::Replace).unwrap();
    assert_eq!(summary.projects, 2);
    assert_eq!(summary.tasks, 5);

    let (a, b) = (source.workspace(), target.workspace());
    assert_eq!(a.projects.len(), b.projects.len());
    for (pa, pb) in a.projects.iter().zip(&b.projects) {
        assert_eq!(pa.id, pb.id);
        assert_eq!(pa.name, pb.name);
        assert_eq!(pa.is_archived, pb.is_archived);
        assert_eq!(pa.completion, pb.completion);
        assert_eq!(flatten(&pa.tasks), flatten(&pb.tasks));
    }

    let mut pics_a = a.pic_list.clone();
    let mut pics_b = b.pic_list.clone();
    pics_a.sort();
    pics_b.sort();
    assert_eq!(pics_a, pics_b);
}

#[test]
fn merge_replaces_same_id_projects() {
    let mut tracker = populated();
    let csv = tracker.export_csv().unwrap();

    tracker.rename_project(0, "Renamed").unwrap();
    tracker.add_project("Local only").unwrap();
    tracker.import_csv(&csv, ImportMode::Merge).unwrap();

    let names: Vec<&str> = tracker
        .workspace()
        .projects
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names, ["Website", "Empty", "Local only"]);
}

#[test]
fn malformed_row_rejects_whole_import() {
    let mut tracker = populated();
    let before = tracker.workspace().clone();
    let csv = "ProjectID,ProjectName,TaskName,DueDate,StartDate\n\
               p1,Ops,Good,2025-01-05,2025-01-01\n\
               p1,Ops,Bad,not-a-date,2025-01-01\n";

    let err = tracker.import_csv(csv, ImportMode::Replace).unwrap_err();
    assert!(matches!(err, TrackerError::MalformedImportRow { row: 3, .. }));
    assert_eq!(*tracker.workspace(), before);
}

#[test]
fn import_repairs_inverted_dates_and_envelopes() {
    let mut tracker = tracker();
    let csv = "Project ID,Project Name,Task Name,Due Date,Sub-Task Level,Parent Task ID,Start Date,Completion\n\
               p1,Ops,Parent,2025-01-03,0,,2025-01-01,90\n\
               p1,Ops,Child,2025-01-10,1,0,2025-01-02,20\n\
               p1,Ops,Backwards,2025-01-01,0,,2025-01-04,\n";

    tracker.import_csv(csv, ImportMode::Replace).unwrap();

    let project = &tracker.workspace().projects[0];
    let parent = &project.tasks[0];
    assert_eq!(parent.due, d(2025, 1, 10));
    let child = &parent.sub_tasks[0];
    assert_eq!((child.start_date, child.due), (d(2025, 1, 2), d(2025, 1, 10)));
    // Aggregate wins over the imported 90.
    assert_eq!(parent.completion, 20);
    let backwards = &project.tasks[1];
    assert_eq!((backwards.start_date, backwards.due), (d(2025, 1, 4), d(2025, 1, 4)));
}

#[test]
fn overlapping_import_is_refused() {
    let mut tracker = tracker();
    let csv = "ProjectID,ProjectName,TaskName,DueDate,StartDate,PIC\n\
               p1,Ops,One,2025-01-05,2025-01-01,Alice\n\
               p1,Ops,Two,2025-01-08,2025-01-04,Alice\n";

    let err = tracker.import_csv(csv, ImportMode::Replace).unwrap_err();
    assert!(matches!(err, TrackerError::SchedulingConflict(_)));
    assert!(tracker.workspace().projects.is_empty());
}

#[test]
fn file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("export.csv");
    let source = populated();
    let count = source.export_csv_file(&path).unwrap();
    assert_eq!(count, 5);

    let mut target = tracker();
    target.import_csv_file(&path, ImportMode::Replace).unwrap();
    assert_eq!(
        flatten(&source.workspace().projects[0].tasks),
        flatten(&target.workspace().projects[0].tasks)
    );
}
