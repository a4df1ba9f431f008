use std::path::Path;

use crate::date;
use crate::error::{Result, TrackerError};
use crate::model::Workspace;

/// Column headers, in export order.
pub const HEADERS: [&str; 12] = [
    "ProjectID",
    "ProjectName",
    "TaskName",
    "DueDate",
    "SubTaskLevel",
    "ParentTaskID",
    "PIC",
    "Completion",
    "Notes",
    "StartDate",
    "Dependencies",
    "isArchived",
];

/// First cell of the trailing row that carries the PIC list.
pub const PIC_LIST_MARKER: &str = "PICList";

/// Separator for the dependency tags column.
pub const DEPENDENCY_SEPARATOR: char = '|';

/// Flatten the workspace into one row per task, depth-first.
///
/// A project without tasks still gets a row (with an empty task name) so it
/// survives a round trip.
fn rows(workspace: &Workspace) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    for project in &workspace.projects {
        let archived = project.is_archived.to_string();
        if project.tasks.is_empty() {
            let mut row = vec![String::new(); HEADERS.len()];
            row[0] = project.id.clone();
            row[1] = project.name.clone();
            row[11] = archived;
            rows.push(row);
            continue;
        }
        project.visit(&mut |path, task| {
            let deps: Vec<&str> = task.dependencies.iter().map(String::as_str).collect();
            rows.push(vec![
                project.id.clone(),
                project.name.clone(),
                task.name.clone(),
                date::format_local_date(task.due),
                path.depth().to_string(),
                path.parent().map(|p| p.to_string()).unwrap_or_default(),
                task.pic.clone().unwrap_or_default(),
                task.completion.to_string(),
                task.notes.clone(),
                date::format_local_date(task.start_date),
                deps.join(&DEPENDENCY_SEPARATOR.to_string()),
                archived.clone(),
            ]);
        });
    }
    rows
}

/// Write the workspace as CSV. Returns the number of task rows written.
pub fn write_csv<W: std::io::Write>(workspace: &Workspace, writer: W) -> Result<usize> {
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(writer);

    wtr.write_record(HEADERS)?;

    let rows = rows(workspace);
    let task_rows = rows.iter().filter(|r| !r[2].is_empty()).count();
    for row in &rows {
        wtr.write_record(row)?;
    }

    let mut pic_row = vec![PIC_LIST_MARKER.to_string()];
    pic_row.extend(workspace.pic_list.iter().cloned());
    wtr.write_record(&pic_row)?;

    wtr.flush()?;
    Ok(task_rows)
}

/// Render the workspace as a CSV string.
pub fn to_csv_string(workspace: &Workspace) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(workspace, &mut buf)?;
    String::from_utf8(buf)
        .map_err(|e| TrackerError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// Export the workspace to a CSV file.
pub fn export_csv(workspace: &Workspace, path: &Path) -> Result<usize> {
    let file = std::fs::File::create(path)?;
    write_csv(workspace, file)
}
