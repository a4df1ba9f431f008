use chrono::NaiveDate;
use egui::{Color32, Id, RichText, Ui};
use gantt_tracker::schedule::required_due;
use gantt_tracker::Task;

use crate::ui::theme;

/// Edits the editor wants applied. Each one becomes a single tracker
/// transaction.
pub enum EditorAction {
    None,
    Rename(String),
    SetDates(NaiveDate, NaiveDate),
    SetCompletion(u8),
    SetPic(Option<String>),
    SetNotes(String),
    SetFollowsParent(bool),
    AddSubtask,
}

fn field_label(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).size(10.0).color(theme::TEXT_DIM).strong());
}

/// A text field whose edits stay in a scratch buffer until focus leaves it.
/// Returns the new text when it was committed and differs from `current`.
fn buffered_text(ui: &mut Ui, id: Id, current: &str, multiline: bool) -> Option<String> {
    let mut buffer = ui
        .ctx()
        .data_mut(|d| d.get_temp::<String>(id))
        .unwrap_or_else(|| current.to_string());

    let edit = if multiline {
        egui::TextEdit::multiline(&mut buffer)
            .font(egui::FontId::proportional(11.0))
            .text_color(theme::TEXT_SECONDARY)
            .hint_text("Add notes...")
    } else {
        egui::TextEdit::singleline(&mut buffer)
            .font(egui::FontId::proportional(12.0))
            .text_color(theme::TEXT_PRIMARY)
    };
    let height = if multiline { 60.0 } else { 24.0 };
    let resp = ui.add_sized([ui.available_width(), height], edit);

    if resp.lost_focus() {
        ui.ctx().data_mut(|d| d.remove::<String>(id));
        return (buffer != current).then_some(buffer);
    }
    if resp.has_focus() {
        ui.ctx().data_mut(|d| d.insert_temp(id, buffer));
    }
    None
}

/// Render the editor for the selected task.
pub fn show_task_editor(task: &Task, is_nested: bool, pic_list: &[String], ui: &mut Ui) -> EditorAction {
    let mut action = EditorAction::None;

    ui.add_space(6.0);
    ui.label(
        RichText::new("Edit Task")
            .strong()
            .size(13.0)
            .color(theme::TEXT_PRIMARY),
    );
    ui.add_space(4.0);

    let frame = egui::Frame {
        fill: theme::BG_DARK,
        rounding: egui::Rounding::same(4.0),
        inner_margin: egui::Margin::same(8.0),
        stroke: egui::Stroke::new(1.0, theme::BORDER_SUBTLE),
        ..Default::default()
    };

    frame.show(ui, |ui| {
        ui.spacing_mut().item_spacing.y = 6.0;
        ui.visuals_mut().extreme_bg_color = theme::BG_FIELD;

        field_label(ui, "Name");
        if let Some(name) = buffered_text(ui, Id::new(("edit-name", task.id)), &task.name, false) {
            action = EditorAction::Rename(name);
        }

        // Moving the start carries the due along far enough to keep the
        // sub-tasks inside. Pulling the due in front of them is rejected.
        let mut start = task.start_date;
        let mut due = task.due;
        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                field_label(ui, "Start");
                if ui
                    .add(egui_extras::DatePickerButton::new(&mut start).id_salt("dp_start"))
                    .changed()
                {
                    if start > due {
                        due = gantt_tracker::date::add_days(start, task.duration_days());
                    }
                    if let Some(latest) = required_due(task, start) {
                        due = due.max(latest);
                    }
                    action = EditorAction::SetDates(start, due);
                }
            });
            ui.add_space(8.0);
            ui.vertical(|ui| {
                field_label(ui, "Due");
                if ui
                    .add(egui_extras::DatePickerButton::new(&mut due).id_salt("dp_due"))
                    .changed()
                {
                    action = EditorAction::SetDates(start, due);
                }
            });
        });
        if let Some(latest) = task.latest_child_due() {
            ui.label(
                RichText::new(format!("Sub-tasks run until {latest}"))
                    .size(9.5)
                    .color(theme::TEXT_DIM),
            );
        }

        // Completion: editable on leaves only, parents show the roll-up.
        field_label(ui, "Completion");
        if task.is_leaf() {
            let id = Id::new(("edit-completion", task.id));
            let mut value = ui
                .ctx()
                .data_mut(|d| d.get_temp::<u8>(id))
                .unwrap_or(task.completion);
            let resp = ui.add_sized(
                [ui.available_width(), 20.0],
                egui::Slider::new(&mut value, 0..=100).suffix("%"),
            );
            if resp.dragged() {
                ui.ctx().data_mut(|d| d.insert_temp(id, value));
            } else {
                ui.ctx().data_mut(|d| d.remove::<u8>(id));
                if (resp.changed() || resp.drag_stopped()) && value != task.completion {
                    action = EditorAction::SetCompletion(value);
                }
            }
        } else {
            ui.label(
                RichText::new(format!("{}%  (from sub-tasks)", task.completion))
                    .size(11.0)
                    .color(theme::TEXT_SECONDARY),
            );
        }

        field_label(ui, "PIC");
        let current = task.assignee();
        egui::ComboBox::from_id_salt("pic_combo")
            .selected_text(RichText::new(current.unwrap_or("Unassigned")).size(11.0))
            .width(ui.available_width())
            .show_ui(ui, |ui| {
                if ui.selectable_label(current.is_none(), "Unassigned").clicked() {
                    action = EditorAction::SetPic(None);
                }
                for pic in pic_list {
                    let chip = RichText::new(pic).color(theme::pic_color(Some(pic)));
                    if ui.selectable_label(current == Some(pic.as_str()), chip).clicked() {
                        action = EditorAction::SetPic(Some(pic.clone()));
                    }
                }
            });

        if is_nested {
            let mut follows = task.follows_parent();
            if ui
                .checkbox(&mut follows, RichText::new("Follow parent's start").size(11.0))
                .changed()
            {
                action = EditorAction::SetFollowsParent(follows);
            }
        }

        field_label(ui, "Notes");
        if let Some(notes) = buffered_text(ui, Id::new(("edit-notes", task.id)), &task.notes, true) {
            action = EditorAction::SetNotes(notes);
        }

        ui.add_space(4.0);
        let btn = egui::Button::new(
            RichText::new(format!("{}  Add Sub-task", egui_phosphor::regular::PLUS))
                .color(Color32::WHITE)
                .size(12.0),
        )
        .fill(theme::ACCENT)
        .rounding(egui::Rounding::same(4.0));
        if ui.add_sized([ui.available_width(), 26.0], btn).clicked() {
            action = EditorAction::AddSubtask;
        }
    });

    action
}
