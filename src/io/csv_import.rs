use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use super::csv_export::{DEPENDENCY_SEPARATOR, PIC_LIST_MARKER};
use crate::date;
use crate::error::{Result, TrackerError};
use crate::model::{Project, Task, TaskPath, Workspace};

/// Columns the importer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Column {
    ProjectId,
    ProjectName,
    TaskName,
    DueDate,
    SubTaskLevel,
    ParentTaskId,
    Pic,
    Completion,
    Notes,
    StartDate,
    Dependencies,
    IsArchived,
}

/// Normalize a header string to a canonical column key.
fn normalize_header(h: &str) -> String {
    h.trim().to_lowercase().replace([' ', '-', '_'], "")
}

fn header_to_column(normalized: &str) -> Option<Column> {
    match normalized {
        "projectid" => Some(Column::ProjectId),
        "projectname" | "project" => Some(Column::ProjectName),
        "taskname" | "task" | "name" => Some(Column::TaskName),
        "duedate" | "due" | "enddate" | "end" => Some(Column::DueDate),
        "subtasklevel" | "level" => Some(Column::SubTaskLevel),
        "parenttaskid" | "parentid" | "parent" => Some(Column::ParentTaskId),
        "pic" | "assignee" | "owner" => Some(Column::Pic),
        "completion" | "progress" | "done" => Some(Column::Completion),
        "notes" | "note" | "description" => Some(Column::Notes),
        "startdate" | "start" => Some(Column::StartDate),
        "dependencies" | "deps" => Some(Column::Dependencies),
        "isarchived" | "archived" => Some(Column::IsArchived),
        _ => None,
    }
}

fn parse_bool(s: &str) -> bool {
    matches!(s.trim().to_lowercase().as_str(), "true" | "yes" | "1")
}

fn parse_completion(s: &str) -> Option<u8> {
    let s = s.trim().trim_end_matches('%').trim();
    if s.is_empty() {
        return Some(0);
    }
    let value: f64 = s.parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some(value.round().min(100.0) as u8)
}

/// Parse tracker CSV. Any malformed row rejects the whole input.
///
/// The result is raw: dates are not repaired and completion is not
/// recomputed. [`crate::Tracker::import_csv`] does both before accepting it.
pub fn parse_csv<R: std::io::Read>(reader: R) -> Result<Workspace> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let columns: HashMap<Column, usize> = headers
        .iter()
        .enumerate()
        .filter_map(|(i, h)| header_to_column(&normalize_header(h)).map(|c| (c, i)))
        .collect();

    for required in [Column::ProjectId, Column::TaskName, Column::DueDate] {
        if !columns.contains_key(&required) {
            let found: Vec<&str> = headers.iter().collect();
            return Err(TrackerError::malformed(
                1,
                format!("missing {required:?} column (found {found:?})"),
            ));
        }
    }

    let mut workspace = Workspace::default();
    let mut project_by_id: HashMap<String, usize> = HashMap::new();

    for (i, result) in reader.records().enumerate() {
        let row = i + 2;
        let record = result.map_err(|e| TrackerError::malformed(row, e.to_string()))?;

        if record.get(0) == Some(PIC_LIST_MARKER) {
            for pic in record.iter().skip(1) {
                workspace.register_pic(pic);
            }
            continue;
        }
        if record.iter().all(str::is_empty) {
            continue;
        }

        let field = |column: Column| -> &str {
            columns
                .get(&column)
                .and_then(|&idx| record.get(idx))
                .unwrap_or("")
        };

        let project_id = field(Column::ProjectId);
        if project_id.is_empty() {
            return Err(TrackerError::malformed(row, "empty ProjectID"));
        }
        let project_idx = *project_by_id
            .entry(project_id.to_string())
            .or_insert_with(|| {
                let mut project = Project::new(field(Column::ProjectName));
                project.id = project_id.to_string();
                project.is_archived = parse_bool(field(Column::IsArchived));
                workspace.projects.push(project);
                workspace.projects.len() - 1
            });

        let name = field(Column::TaskName);
        if name.is_empty() {
            // Project-only row.
            continue;
        }

        let due_text = field(Column::DueDate);
        let due = date::parse_flexible_date(due_text)
            .ok_or_else(|| TrackerError::malformed(row, format!("invalid due date '{due_text}'")))?;
        let start_text = field(Column::StartDate);
        let start = if start_text.is_empty() {
            due
        } else {
            date::parse_flexible_date(start_text).ok_or_else(|| {
                TrackerError::malformed(row, format!("invalid start date '{start_text}'"))
            })?
        };

        let completion_text = field(Column::Completion);
        let completion = parse_completion(completion_text).ok_or_else(|| {
            TrackerError::malformed(row, format!("invalid completion '{completion_text}'"))
        })?;

        let level_text = field(Column::SubTaskLevel);
        let level: usize = if level_text.is_empty() {
            0
        } else {
            level_text.parse().map_err(|_| {
                TrackerError::malformed(row, format!("invalid sub-task level '{level_text}'"))
            })?
        };

        let mut task = Task::new(name, start, due);
        task.completion = completion;
        task.set_pic(Some(field(Column::Pic).to_string()));
        task.notes = field(Column::Notes).to_string();
        task.dependencies = field(Column::Dependencies)
            .split(DEPENDENCY_SEPARATOR)
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .collect();
        if let Some(pic) = task.pic.clone() {
            workspace.register_pic(&pic);
        }

        let project = &mut workspace.projects[project_idx];
        if level == 0 {
            project.tasks.push(task);
            continue;
        }

        let parent_text = field(Column::ParentTaskId);
        let parent_path: TaskPath = parent_text.parse().map_err(|_| {
            TrackerError::malformed(row, format!("invalid parent task id '{parent_text}'"))
        })?;
        if parent_path.depth() + 1 != level {
            return Err(TrackerError::malformed(
                row,
                format!("parent task id '{parent_text}' does not match level {level}"),
            ));
        }
        let parent = project.task_mut(&parent_path).ok_or_else(|| {
            TrackerError::malformed(row, format!("parent task '{parent_text}' not found"))
        })?;
        parent.sub_tasks.push(task);
    }

    debug!(
        projects = workspace.projects.len(),
        pics = workspace.pic_list.len(),
        "parsed csv"
    );
    Ok(workspace)
}

/// Import a CSV file.
pub fn import_csv(path: &Path) -> Result<Workspace> {
    let file = std::fs::File::open(path)?;
    parse_csv(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    const SAMPLE: &str = "\
ProjectID,ProjectName,TaskName,DueDate,SubTaskLevel,ParentTaskID,PIC,Completion,Notes,StartDate,Dependencies,isArchived
p1,Website,Design,2025-01-10,0,,Alice,0,,2025-01-01,,false
p1,Website,Wireframes,2025-01-04,1,0,Bob,100,first pass,2025-01-01,parent,false
p1,Website,Build,2025-02-01,0,,,25,,2025-01-11,,false
p2,Archive,,,,,,,,,,true
PICList,Alice,Bob,Carol
";

    #[test]
    fn parses_projects_tasks_and_pics() {
        let ws = parse_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(ws.projects.len(), 2);
        assert_eq!(ws.pic_list, vec!["Alice", "Bob", "Carol"]);

        let website = &ws.projects[0];
        assert_eq!(website.id, "p1");
        assert_eq!(website.tasks.len(), 2);
        let design = &website.tasks[0];
        assert_eq!(design.start_date, d(2025, 1, 1));
        assert_eq!(design.pic.as_deref(), Some("Alice"));
        let wireframes = &design.sub_tasks[0];
        assert_eq!(wireframes.completion, 100);
        assert!(wireframes.follows_parent());
        assert_eq!(wireframes.notes, "first pass");
        assert_eq!(website.tasks[1].pic, None);

        let archive = &ws.projects[1];
        assert!(archive.is_archived);
        assert!(archive.tasks.is_empty());
    }

    #[test]
    fn header_matching_is_forgiving() {
        let csv = "project id,Project Name,task_name,Due-Date,start date\nx,X,T,2025-03-02,2025-03-01\n";
        let ws = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(ws.projects[0].tasks[0].start_date, d(2025, 3, 1));
    }

    #[test]
    fn bad_date_rejects_everything() {
        let csv = SAMPLE.replace("2025-02-01", "soon");
        let err = parse_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, TrackerError::MalformedImportRow { row: 4, .. }));
    }

    #[test]
    fn unknown_parent_is_rejected() {
        let csv = SAMPLE.replace("1,0,Bob", "1,5,Bob");
        let err = parse_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, TrackerError::MalformedImportRow { row: 3, .. }));
    }

    #[test]
    fn missing_required_column_is_rejected() {
        let csv = "ProjectName,TaskName\nA,B\n";
        assert!(matches!(
            parse_csv(csv.as_bytes()),
            Err(TrackerError::MalformedImportRow { row: 1, .. })
        ));
    }

    #[test]
    fn completion_accepts_percent_and_clamps() {
        assert_eq!(parse_completion("50%"), Some(50));
        assert_eq!(parse_completion(""), Some(0));
        assert_eq!(parse_completion("140"), Some(100));
        assert_eq!(parse_completion("-3"), None);
        assert_eq!(parse_completion("lots"), None);
    }
}
