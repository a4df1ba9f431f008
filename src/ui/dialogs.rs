use chrono::NaiveDate;
use egui::{Color32, Context, RichText, Window};
use gantt_tracker::io::csv_export::HEADERS;
use gantt_tracker::schedule::Conflict;
use gantt_tracker::tracker::TaskParent;

use crate::app::TrackerApp;
use crate::ui::theme;

/// Fields of the "Add Task" dialog.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub parent: TaskParent,
    /// Shown in the title: project or parent task name.
    pub parent_name: String,
    pub name: String,
    pub start: NaiveDate,
    pub due: NaiveDate,
    pub pic: Option<String>,
}

/// Which dialogs are open, and their scratch fields.
#[derive(Debug, Default)]
pub struct DialogState {
    pub add_task: Option<TaskDraft>,
    pub add_project: Option<String>,
    pub show_pics: bool,
    pub new_pic: String,
    pub show_about: bool,
    pub show_csv_help: bool,
    pub conflict: Option<Conflict>,
}

fn accent_button(text: &str) -> egui::Button<'_> {
    egui::Button::new(RichText::new(text).color(Color32::WHITE))
        .fill(theme::ACCENT)
        .rounding(egui::Rounding::same(4.0))
}

/// Render the "Add Task" dialog.
pub fn show_add_task_dialog(app: &mut TrackerApp, ctx: &Context) {
    let Some(mut draft) = app.dialogs.add_task.take() else {
        return;
    };
    let mut close = false;
    let mut create = false;
    let pic_list = app.tracker.workspace().pic_list.clone();

    Window::new(RichText::new(format!("Add Task to '{}'", draft.parent_name)).strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([theme::DIALOG_WIDTH, 0.0])
        .show(ctx, |ui| {
            ui.visuals_mut().extreme_bg_color = theme::BG_FIELD;
            ui.add_space(4.0);

            egui::Grid::new("add_task_grid")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label(RichText::new("Name").color(theme::TEXT_SECONDARY));
                    ui.add_sized(
                        [220.0, 24.0],
                        egui::TextEdit::singleline(&mut draft.name).hint_text("Task name..."),
                    );
                    ui.end_row();

                    ui.label(RichText::new("Start").color(theme::TEXT_SECONDARY));
                    ui.add(egui_extras::DatePickerButton::new(&mut draft.start).id_salt("dlg_dp_start"));
                    ui.end_row();

                    ui.label(RichText::new("Due").color(theme::TEXT_SECONDARY));
                    ui.add(egui_extras::DatePickerButton::new(&mut draft.due).id_salt("dlg_dp_due"));
                    ui.end_row();

                    ui.label(RichText::new("PIC").color(theme::TEXT_SECONDARY));
                    egui::ComboBox::from_id_salt("dlg_pic")
                        .selected_text(draft.pic.as_deref().unwrap_or("Unassigned"))
                        .show_ui(ui, |ui| {
                            ui.selectable_value(&mut draft.pic, None, "Unassigned");
                            for pic in &pic_list {
                                ui.selectable_value(&mut draft.pic, Some(pic.clone()), pic.as_str());
                            }
                        });
                    ui.end_row();
                });

            if draft.start > draft.due {
                ui.label(
                    RichText::new("Due date is before the start date")
                        .size(10.0)
                        .color(theme::CONFLICT),
                );
            }

            ui.add_space(6.0);
            ui.separator();
            ui.horizontal(|ui| {
                let valid = draft.start <= draft.due;
                if ui.add_enabled(valid, accent_button("Create")).clicked() {
                    create = true;
                }
                if ui.add_sized([80.0, 28.0], egui::Button::new("Cancel")).clicked() {
                    close = true;
                }
            });
        });

    if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        close = true;
    }
    if create {
        // A rejected task keeps the dialog open so it can be fixed.
        if !app.create_task(&draft) {
            app.dialogs.add_task = Some(draft);
        }
    } else if !close {
        app.dialogs.add_task = Some(draft);
    }
}

/// Render the "Add Project" dialog.
pub fn show_add_project_dialog(app: &mut TrackerApp, ctx: &Context) {
    let Some(mut name) = app.dialogs.add_project.take() else {
        return;
    };
    let mut close = false;
    let mut create = false;

    Window::new(RichText::new("Add Project").strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([theme::DIALOG_WIDTH, 0.0])
        .show(ctx, |ui| {
            ui.visuals_mut().extreme_bg_color = theme::BG_FIELD;
            let edit = ui.add_sized(
                [ui.available_width(), 24.0],
                egui::TextEdit::singleline(&mut name).hint_text("Project name..."),
            );
            if edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                create = true;
            }
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                if ui.add(accent_button("Create")).clicked() {
                    create = true;
                }
                if ui.button("Cancel").clicked() {
                    close = true;
                }
            });
        });

    if create {
        app.create_project(&name);
    } else if !close && !ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.dialogs.add_project = Some(name);
    }
}

/// Render the PIC list manager.
pub fn show_pics_dialog(app: &mut TrackerApp, ctx: &Context) {
    let mut open = app.dialogs.show_pics;
    let mut remove: Option<String> = None;
    let mut add = false;

    Window::new(RichText::new("People in Charge").strong().size(14.0))
        .open(&mut open)
        .resizable(false)
        .collapsible(false)
        .default_width(theme::DIALOG_WIDTH)
        .show(ctx, |ui| {
            ui.visuals_mut().extreme_bg_color = theme::BG_FIELD;
            let pics = &app.tracker.workspace().pic_list;
            if pics.is_empty() {
                ui.label(RichText::new("No PICs yet").size(10.0).color(theme::TEXT_DIM));
            }
            for pic in pics {
                ui.horizontal(|ui| {
                    let (dot, _) = ui.allocate_exact_size(egui::vec2(8.0, 8.0), egui::Sense::hover());
                    ui.painter().circle_filled(dot.center(), 4.0, theme::pic_color(Some(pic)));
                    ui.label(pic);
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let del = ui.add(
                            egui::Button::new(RichText::new(egui_phosphor::regular::TRASH).color(theme::TEXT_DIM))
                                .frame(false),
                        );
                        if del.on_hover_text("Remove and unassign everywhere").clicked() {
                            remove = Some(pic.clone());
                        }
                    });
                });
            }
            ui.separator();
            ui.horizontal(|ui| {
                let edit = ui.add(egui::TextEdit::singleline(&mut app.dialogs.new_pic).hint_text("Name..."));
                let entered = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if ui.add(accent_button("Add")).clicked() || entered {
                    add = true;
                }
            });
        });

    app.dialogs.show_pics = open;
    if let Some(pic) = remove {
        app.remove_pic(&pic);
    }
    if add {
        let name = std::mem::take(&mut app.dialogs.new_pic);
        app.add_pic(&name);
    }
}

/// Shown when a change was rolled back because it double-booked someone.
pub fn show_conflict_dialog(app: &mut TrackerApp, ctx: &Context) {
    let Some(conflict) = app.dialogs.conflict.clone() else {
        return;
    };
    let mut close = false;
    Window::new(RichText::new("Scheduling conflict").strong().size(14.0).color(theme::CONFLICT))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([360.0, 0.0])
        .show(ctx, |ui| {
            ui.label(format!("{} would be working on two tasks at once:", conflict.pic));
            ui.add_space(4.0);
            for side in [&conflict.first, &conflict.second] {
                ui.label(
                    RichText::new(format!("• {}  ({} → {})", side.name, side.start_date, side.due))
                        .color(theme::TEXT_SECONDARY),
                );
            }
            ui.add_space(4.0);
            ui.label(RichText::new("The change was undone.").size(10.0).color(theme::TEXT_DIM));
            ui.add_space(6.0);
            if ui.add_sized([80.0, 28.0], egui::Button::new("OK")).clicked() {
                close = true;
            }
        });
    if close || ctx.input(|i| i.key_pressed(egui::Key::Escape) || i.key_pressed(egui::Key::Enter)) {
        app.dialogs.conflict = None;
    }
}

/// Render the "About" dialog.
pub fn show_about_dialog(app: &mut TrackerApp, ctx: &Context) {
    let mut should_close = false;
    Window::new("About")
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([300.0, 180.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(12.0);
                ui.heading(RichText::new("Gantt Tracker").strong());
                ui.add_space(2.0);
                ui.label(
                    RichText::new(format!("Version {}", env!("CARGO_PKG_VERSION"))).color(theme::TEXT_SECONDARY),
                );
                ui.add_space(10.0);
                ui.label("Projects, tasks and sub-tasks on a timeline.");
                ui.add_space(14.0);
                if ui.add_sized([100.0, 28.0], egui::Button::new("Close")).clicked() {
                    should_close = true;
                }
            });
        });
    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.dialogs.show_about = false;
    }
}

/// Render the "CSV Format" help dialog.
pub fn show_csv_help_dialog(app: &mut TrackerApp, ctx: &Context) {
    let mut should_close = false;

    Window::new(RichText::new("CSV Format").strong().size(14.0))
        .resizable(true)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .default_size([560.0, 460.0])
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.label(RichText::new("Columns").strong());
                ui.add_space(2.0);
                egui::Grid::new("csv_columns")
                    .num_columns(2)
                    .striped(true)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        let notes = [
                            "Project identifier; rows with the same id form one project",
                            "Project name",
                            "Task name; empty for a project without tasks",
                            "Due date",
                            "0 for top-level tasks, 1 for sub-tasks, and so on",
                            "Index path of the parent within the project, e.g. 2 or 2.0",
                            "Person in charge",
                            "Percent complete (leaf tasks)",
                            "Free text",
                            "Start date; empty means same as due",
                            "Tags separated by |; 'parent' follows the parent's start",
                            "true / false",
                        ];
                        for (header, note) in HEADERS.iter().zip(notes) {
                            ui.label(RichText::new(*header).strong().monospace());
                            ui.label(note);
                            ui.end_row();
                        }
                    });
                ui.add_space(8.0);

                ui.label(RichText::new("Dates").strong());
                for fmt in [
                    "YYYY-MM-DD   (e.g. 2025-06-15)",
                    "DD/MM/YYYY   (e.g. 15/06/2025)",
                    "MM/DD/YYYY   (e.g. 06/15/2025)",
                    "DD.MM.YYYY   (e.g. 15.06.2025)",
                ] {
                    ui.label(RichText::new(fmt).monospace().size(11.0));
                }
                ui.add_space(8.0);

                ui.label(RichText::new("Notes").strong());
                for note in [
                    "• A final row starting with PICList lists the known people.",
                    "• Header matching ignores case, spaces, hyphens and underscores.",
                    "• Parent rows must come before their sub-tasks.",
                    "• One bad row rejects the whole file; nothing is changed.",
                    "• Files that double-book a PIC are rejected.",
                ] {
                    ui.label(RichText::new(note).small());
                }
            });

            ui.separator();
            if ui.add_sized([80.0, 28.0], egui::Button::new("Close")).clicked() {
                should_close = true;
            }
        });

    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.dialogs.show_csv_help = false;
    }
}
