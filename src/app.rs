use chrono::Local;
use gantt_tracker::config::Settings;
use gantt_tracker::model::TimelineViewport;
use gantt_tracker::schedule::{has_overlap, DragController, DragOutcome, DragUpdate};
use gantt_tracker::tracker::{ImportMode, MoveSource, MoveTarget, Moved, NewTask, TaskParent};
use gantt_tracker::{date, TaskLocation, Tracker, TrackerError};
use tracing::{info, warn};
use uuid::Uuid;

use crate::ui;
use crate::ui::theme;
use crate::ui::dialogs::{DialogState, TaskDraft};
use crate::ui::project_list::ProjectListAction;
use crate::ui::task_editor::EditorAction;
use crate::ui::task_table::TaskTableAction;

/// Main application state.
pub struct TrackerApp {
    pub tracker: Tracker,
    pub settings: Settings,
    pub viewport: TimelineViewport,
    pub drag: DragController,
    /// The tentative drag window would double-book someone.
    pub drag_conflict: bool,
    selected_project_id: Option<String>,
    pub selected_task: Option<Uuid>,
    pub dialogs: DialogState,
    pub status_message: String,
}

impl TrackerApp {
    pub fn new(cc: &eframe::CreationContext<'_>, tracker: Tracker, settings: Settings, status: String) -> Self {
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        let today = Local::now().date_naive();
        let mut viewport = TimelineViewport::new(today, date::add_days(today, 30));
        viewport.pixels_per_day = settings.pixels_per_day;

        let selected_project_id = tracker
            .workspace()
            .active_projects()
            .next()
            .and_then(|i| tracker.project(i))
            .map(|p| p.id.clone());

        let mut app = Self {
            drag: DragController::new(settings.timeline_padding_days),
            tracker,
            settings,
            viewport,
            drag_conflict: false,
            selected_project_id,
            selected_task: None,
            dialogs: DialogState::default(),
            status_message: status,
        };
        app.fit_viewport();
        app
    }

    pub fn selected_project(&self) -> Option<usize> {
        self.selected_project_id
            .as_deref()
            .and_then(|id| self.tracker.workspace().project_index(id))
    }

    fn select_project(&mut self, index: usize) {
        self.selected_project_id = self.tracker.project(index).map(|p| p.id.clone());
        self.selected_task = None;
        self.fit_viewport();
    }

    /// Keep the selection pointing at something that still exists.
    fn fix_selection(&mut self) {
        if self.selected_project().is_none() {
            self.selected_project_id = self
                .tracker
                .workspace()
                .active_projects()
                .next()
                .and_then(|i| self.tracker.project(i))
                .map(|p| p.id.clone());
        }
        if let Some(id) = self.selected_task {
            if self.tracker.workspace().locate(id).is_none() {
                self.selected_task = None;
            }
        }
    }

    fn selected_location(&self) -> Option<TaskLocation> {
        self.selected_task
            .and_then(|id| self.tracker.workspace().locate(id))
    }

    fn select_task(&mut self, loc: &TaskLocation) {
        self.selected_task = self.tracker.workspace().task(loc).map(|t| t.id);
    }

    pub fn fit_viewport(&mut self) {
        let span = self.selected_project().and_then(|i| self.tracker.project(i)).and_then(|p| p.date_span());
        self.viewport
            .fit_to(span, Local::now().date_naive(), self.settings.timeline_padding_days);
    }

    pub fn save_settings(&mut self) {
        self.settings.pixels_per_day = self.viewport.pixels_per_day;
        if let Err(e) = self.settings.save() {
            warn!(error = %e, "failed to save settings");
        }
    }

    /// Show the outcome of a tracker call. Conflicts also open the conflict
    /// notice.
    fn report<T>(&mut self, result: gantt_tracker::Result<T>, done: impl FnOnce(&T) -> String) -> Option<T> {
        match result {
            Ok(value) => {
                self.status_message = done(&value);
                Some(value)
            }
            Err(TrackerError::SchedulingConflict(conflict)) => {
                self.status_message = format!("Change undone: {conflict}");
                self.dialogs.conflict = Some(conflict);
                None
            }
            Err(e) => {
                self.status_message = e.to_string();
                None
            }
        }
    }

    // --- File operations ---

    pub fn import_csv(&mut self, mode: ImportMode) {
        if mode == ImportMode::Replace && !self.tracker.workspace().projects.is_empty() {
            let confirm = rfd::MessageDialog::new()
                .set_title("Import CSV")
                .set_description("This will replace all current projects. Continue?")
                .set_buttons(rfd::MessageButtons::YesNo)
                .show();
            if confirm != rfd::MessageDialogResult::Yes {
                return;
            }
        }
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv", "txt"])
            .pick_file()
        else {
            return;
        };
        let result = self.tracker.import_csv_file(&path, mode);
        if self
            .report(result, |s| {
                format!("Imported {} tasks in {} projects", s.tasks, s.projects)
            })
            .is_some()
        {
            self.fix_selection();
            self.fit_viewport();
        }
    }

    pub fn export_csv(&mut self) {
        if self.tracker.workspace().projects.is_empty() {
            self.status_message = "Nothing to export".to_string();
            return;
        }
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name("tracker.csv")
            .save_file()
        {
            let result = self.tracker.export_csv_file(&path);
            self.report(result, |count| format!("Exported {count} tasks to CSV"));
        }
    }

    pub fn reload(&mut self) {
        self.drag.cancel();
        let result = self.tracker.reload();
        if self.report(result, |_| "Reloaded from disk".to_string()).is_some() {
            self.fix_selection();
            self.fit_viewport();
        }
    }

    pub fn open_data_folder(&mut self) {
        let path = self.settings.data_path();
        let dir = path.parent().map(|p| p.to_path_buf()).unwrap_or(path);
        if let Err(e) = std::fs::create_dir_all(&dir).and_then(|()| open::that(&dir)) {
            warn!(error = %e, dir = %dir.display(), "could not open data folder");
            self.status_message = format!("Could not open {}: {e}", dir.display());
        }
    }

    // --- Edits ---

    pub fn undo(&mut self) {
        self.drag.cancel();
        self.status_message = if self.tracker.undo() { "Undo" } else { "Nothing to undo" }.to_string();
        self.fix_selection();
    }

    pub fn redo(&mut self) {
        self.drag.cancel();
        self.status_message = if self.tracker.redo() { "Redo" } else { "Nothing to redo" }.to_string();
        self.fix_selection();
    }

    /// Returns false if the tracker refused the task.
    pub fn create_task(&mut self, draft: &TaskDraft) -> bool {
        let mut attrs = NewTask::new(draft.name.clone(), draft.start, draft.due);
        attrs.pic = draft.pic.clone();
        let result = self.tracker.add_task(&draft.parent, attrs);
        match self.report(result, |_| format!("Added '{}'", draft.name.trim())) {
            Some(loc) => {
                self.select_task(&loc);
                true
            }
            None => false,
        }
    }

    pub fn create_project(&mut self, name: &str) {
        let result = self.tracker.add_project(name);
        if let Some(index) = self.report(result, |_| "Project added".to_string()) {
            self.select_project(index);
        }
    }

    pub fn add_pic(&mut self, name: &str) {
        let result = self.tracker.add_pic(name);
        self.report(result, |added| {
            if *added {
                format!("Added PIC '{}'", name.trim())
            } else {
                "PIC already exists".to_string()
            }
        });
    }

    pub fn remove_pic(&mut self, name: &str) {
        let result = self.tracker.remove_pic(name);
        self.report(result, |_| format!("Removed PIC '{name}'"));
    }

    fn open_task_draft(&mut self, parent: TaskParent) {
        let today = Local::now().date_naive();
        let (parent_name, start, due) = match &parent {
            TaskParent::Project(i) => (
                self.tracker.project(*i).map(|p| p.name.clone()).unwrap_or_default(),
                today,
                date::add_days(today, 7),
            ),
            TaskParent::Task(loc) => match self.tracker.task(loc) {
                Ok(task) => (task.name.clone(), task.start_date, task.due),
                Err(_) => return,
            },
        };
        self.dialogs.add_task = Some(TaskDraft {
            parent,
            parent_name,
            name: String::new(),
            start,
            due,
            pic: None,
        });
    }

    fn apply_project_action(&mut self, action: ProjectListAction) {
        match action {
            ProjectListAction::None => {}
            ProjectListAction::Select(index) => self.select_project(index),
            ProjectListAction::Add => self.dialogs.add_project = Some(String::new()),
            ProjectListAction::Rename(index, name) => {
                let result = self.tracker.rename_project(index, &name);
                self.report(result, |_| "Project renamed".to_string());
            }
            ProjectListAction::ToggleArchived(index) => {
                let result = self.tracker.toggle_archived(index);
                self.report(result, |archived| {
                    if *archived { "Project archived" } else { "Project restored" }.to_string()
                });
                self.fix_selection();
            }
            ProjectListAction::Delete(index) => {
                let name = self.tracker.project(index).map(|p| p.name.clone()).unwrap_or_default();
                let confirm = rfd::MessageDialog::new()
                    .set_title("Delete project")
                    .set_description(format!("Delete '{name}' and all of its tasks?"))
                    .set_buttons(rfd::MessageButtons::YesNo)
                    .show();
                if confirm == rfd::MessageDialogResult::Yes {
                    let result = self.tracker.delete_project(index);
                    self.report(result, |p| format!("Deleted '{}' (Ctrl+Z to restore)", p.name));
                    self.fix_selection();
                }
            }
            ProjectListAction::Move { source, target, mode } => {
                let result = self.tracker.move_item(&source, &target, mode);
                if let Some(Moved::Task(loc)) = self.report(result, |_| "Moved".to_string()) {
                    self.select_task(&loc);
                }
            }
        }
    }

    fn apply_table_action(&mut self, action: TaskTableAction) {
        match action {
            TaskTableAction::None => {}
            TaskTableAction::Select(loc) => self.select_task(&loc),
            TaskTableAction::Delete(loc) => {
                let result = self.tracker.delete_task(&loc);
                self.report(result, |t| format!("Deleted '{}' (Ctrl+Z to restore)", t.name));
                self.fix_selection();
            }
            TaskTableAction::Add => {
                if let Some(index) = self.selected_project() {
                    self.open_task_draft(TaskParent::Project(index));
                }
            }
            TaskTableAction::AddSubtask(loc) => self.open_task_draft(TaskParent::Task(loc)),
            TaskTableAction::ToggleCollapse(loc) => {
                if let Err(e) = self.tracker.toggle_collapsed(&loc) {
                    self.status_message = e.to_string();
                }
            }
            TaskTableAction::Move { source, target, .. } if source == target => {}
            TaskTableAction::Move { source, target, mode } => {
                let result = self.tracker.move_item(&MoveSource::Task(source), &MoveTarget::Task(target), mode);
                if let Some(Moved::Task(loc)) = self.report(result, |_| "Moved".to_string()) {
                    self.select_task(&loc);
                }
            }
        }
    }

    fn apply_editor_action(&mut self, loc: TaskLocation, action: EditorAction) {
        match action {
            EditorAction::None => {}
            EditorAction::Rename(name) => {
                let result = self.tracker.rename_task(&loc, &name);
                self.report(result, |_| "Task renamed".to_string());
            }
            EditorAction::SetDates(start, due) => {
                let result = self.tracker.set_task_dates(&loc, start, due);
                self.report(result, |_| format!("Rescheduled to {start} → {due}"));
            }
            EditorAction::SetCompletion(value) => {
                let result = self.tracker.set_task_completion(&loc, value);
                self.report(result, |_| format!("Completion set to {value}%"));
            }
            EditorAction::SetPic(pic) => {
                let result = self.tracker.set_task_pic(&loc, pic);
                self.report(result, |_| "PIC updated".to_string());
            }
            EditorAction::SetNotes(notes) => {
                let result = self.tracker.set_task_notes(&loc, &notes);
                self.report(result, |_| "Notes saved".to_string());
            }
            EditorAction::SetFollowsParent(follows) => {
                let result = self.tracker.set_follows_parent(&loc, follows);
                self.report(result, |_| {
                    if follows { "Now follows its parent" } else { "No longer follows its parent" }.to_string()
                });
            }
            EditorAction::AddSubtask => self.open_task_draft(TaskParent::Task(loc)),
        }
    }

    // --- Drag gestures ---

    /// Whether committing `[start, due]` for the dragged task would be
    /// rolled back.
    fn preview_conflict(&self, start: chrono::NaiveDate, due: chrono::NaiveDate) -> bool {
        let Some(session) = self.drag.session() else {
            return false;
        };
        let Some(loc) = self.tracker.workspace().locate(session.task_id) else {
            return false;
        };
        self.tracker
            .preview_dates(&loc, start, due)
            .map(|project| has_overlap(&project))
            .unwrap_or(false)
    }

    fn handle_chart(&mut self, interaction: ui::gantt_chart::ChartInteraction, ctx: &egui::Context) {
        if let Some(loc) = &interaction.select {
            self.select_task(loc);
        } else if interaction.clear_selection {
            self.selected_task = None;
        }
        if let Some(loc) = interaction.toggle_collapse {
            if let Err(e) = self.tracker.toggle_collapsed(&loc) {
                self.status_message = e.to_string();
            }
        }

        if let Some((loc, mode)) = interaction.drag_begin {
            self.drag_conflict = false;
            if let Err(e) = self.drag.begin(self.tracker.workspace(), &loc, mode, &self.viewport) {
                self.status_message = e.to_string();
            }
        }
        if let Some(delta) = interaction.drag_delta {
            if let Some(update) = self.drag.update(delta, &mut self.viewport) {
                let (start, due) = match update {
                    DragUpdate::Tentative { start, due } => (start, due),
                    DragUpdate::Rescaled { start, due } => {
                        ctx.request_repaint();
                        (start, due)
                    }
                };
                self.drag_conflict = self.preview_conflict(start, due);
                self.status_message = format!("{start} → {due}");
            }
        }

        if interaction.drag_released {
            self.finish_drag();
        } else if self.drag.is_dragging()
            && (!ctx.input(|i| i.pointer.any_down()) || ctx.input(|i| i.key_pressed(egui::Key::Escape)))
        {
            // The release never reached a bar, or the user backed out.
            self.drag.cancel();
            self.drag_conflict = false;
            self.status_message = "Drag cancelled".to_string();
        }
    }

    fn finish_drag(&mut self) {
        self.drag_conflict = false;
        match self.drag.finish(&mut self.tracker) {
            Ok(DragOutcome::Unchanged) => {}
            Ok(DragOutcome::Committed { start, due }) => {
                self.status_message = format!("Rescheduled to {start} → {due}");
            }
            Ok(DragOutcome::Reverted(conflict)) => {
                self.status_message = format!("Change undone: {conflict}");
                self.dialogs.conflict = Some(conflict);
            }
            Err(e) => self.status_message = e.to_string(),
        }
    }
}

impl eframe::App for TrackerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        theme::apply_theme(ctx);
        self.fix_selection();

        let typing = ctx.wants_keyboard_input();
        let should_undo =
            ctx.input(|i| i.modifiers.ctrl && !i.modifiers.shift && i.key_pressed(egui::Key::Z));
        let should_redo = ctx.input(|i| {
            i.modifiers.ctrl && (i.key_pressed(egui::Key::Y) || (i.modifiers.shift && i.key_pressed(egui::Key::Z)))
        });
        if !typing && should_undo {
            self.undo();
        }
        if !typing && should_redo {
            self.redo();
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(24.0)
            .frame(
                egui::Frame::default()
                    .fill(theme::BG_HEADER)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .size(11.0)
                            .color(theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let ws = self.tracker.workspace();
                        let tasks: usize = ws.projects.iter().map(|p| p.task_count()).sum();
                        ui.label(
                            egui::RichText::new(format!(
                                "Projects: {} · Tasks: {} · Zoom: {:.0}%",
                                ws.projects.len(),
                                tasks,
                                self.viewport.pixels_per_day / Settings::default().pixels_per_day * 100.0
                            ))
                            .size(10.5)
                            .color(theme::TEXT_DIM),
                        );
                    });
                });
            });

        let project_index = self.selected_project();
        let selected_task = self.selected_task;
        let selected_loc = self.selected_location();

        let mut project_action = ProjectListAction::None;
        let mut table_action = TaskTableAction::None;
        let mut editor_action = EditorAction::None;
        egui::SidePanel::left("task_panel")
            .default_width(theme::SIDE_PANEL_WIDTH)
            .min_width(260.0)
            .resizable(true)
            .frame(
                egui::Frame::default()
                    .fill(theme::BG_PANEL)
                    .inner_margin(egui::Margin::same(8.0))
                    .stroke(egui::Stroke::new(1.0, theme::BORDER_SUBTLE)),
            )
            .show(ctx, |ui| {
                let ws = self.tracker.workspace();
                project_action =
                    ui::project_list::show_project_list(ws, project_index, self.settings.show_archived, ui);
                ui.separator();

                if let Some(loc) = &selected_loc {
                    if let Some(task) = ws.task(loc) {
                        editor_action =
                            ui::task_editor::show_task_editor(task, !loc.path.is_top_level(), &ws.pic_list, ui);
                        ui.add_space(4.0);
                        ui.separator();
                    }
                }

                match project_index.and_then(|i| ws.projects.get(i).map(|p| (i, p))) {
                    Some((index, project)) => {
                        let rows = ui::visible_rows(project);
                        table_action = ui::task_table::show_task_table(index, &rows, selected_task, ui);
                    }
                    None => {
                        ui.label(
                            egui::RichText::new("Create or select a project to add tasks.")
                                .color(theme::TEXT_DIM),
                        );
                    }
                }
            });

        self.apply_project_action(project_action);
        self.apply_table_action(table_action);
        if let Some(loc) = selected_loc {
            self.apply_editor_action(loc, editor_action);
        }

        let chart_frame = egui::Frame::default()
            .fill(theme::BG_DARK)
            .inner_margin(egui::Margin::ZERO);
        // Actions above may have deleted or reordered projects.
        let project_index = self.selected_project();
        let selected_task = self.selected_task;
        let mut interaction = None;
        egui::CentralPanel::default().frame(chart_frame).show(ctx, |ui| {
            let Some((index, project)) =
                project_index.and_then(|i| self.tracker.project(i).map(|p| (i, p)))
            else {
                return;
            };
            let rows = ui::visible_rows(project);
            interaction = Some(ui::gantt_chart::show_gantt_chart(
                index,
                &rows,
                &mut self.viewport,
                &self.drag,
                self.drag_conflict,
                selected_task,
                ui,
            ));
        });
        if let Some(interaction) = interaction {
            self.handle_chart(interaction, ctx);
        } else if self.drag.is_dragging() {
            self.drag.cancel();
        }

        if self.dialogs.add_task.is_some() {
            ui::dialogs::show_add_task_dialog(self, ctx);
        }
        if self.dialogs.add_project.is_some() {
            ui::dialogs::show_add_project_dialog(self, ctx);
        }
        if self.dialogs.show_pics {
            ui::dialogs::show_pics_dialog(self, ctx);
        }
        if self.dialogs.conflict.is_some() {
            ui::dialogs::show_conflict_dialog(self, ctx);
        }
        if self.dialogs.show_about {
            ui::dialogs::show_about_dialog(self, ctx);
        }
        if self.dialogs.show_csv_help {
            ui::dialogs::show_csv_help_dialog(self, ctx);
        }

        let zoom_changed = (self.viewport.pixels_per_day - self.settings.pixels_per_day).abs() > f32::EPSILON;
        if zoom_changed && !ctx.input(|i| i.pointer.any_down()) {
            self.save_settings();
            info!(pixels_per_day = self.viewport.pixels_per_day, "zoom saved");
        }
    }
}
