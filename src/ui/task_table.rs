use egui::{Color32, RichText, Ui};
use gantt_tracker::tracker::DropMode;
use gantt_tracker::TaskLocation;
use uuid::Uuid;

use crate::ui::{theme, RowPayload, VisibleRow};

/// Actions that the task table can request.
pub enum TaskTableAction {
    None,
    Select(TaskLocation),
    Delete(TaskLocation),
    Add,
    AddSubtask(TaskLocation),
    ToggleCollapse(TaskLocation),
    Move {
        source: TaskLocation,
        target: TaskLocation,
        mode: DropMode,
    },
}

/// Which third of a row the pointer is in decides the drop mode.
fn drop_mode(rect: egui::Rect, pointer_y: f32) -> DropMode {
    let third = rect.height() / 3.0;
    if pointer_y < rect.top() + third {
        DropMode::Before
    } else if pointer_y > rect.bottom() - third {
        DropMode::After
    } else {
        DropMode::Into
    }
}

/// Render the task tree of the selected project.
pub fn show_task_table(
    project_index: usize,
    rows: &[VisibleRow<'_>],
    selected_task: Option<Uuid>,
    ui: &mut Ui,
) -> TaskTableAction {
    let mut action = TaskTableAction::None;

    ui.add_space(2.0);
    ui.horizontal(|ui| {
        ui.label(
            RichText::new("Tasks")
                .strong()
                .size(15.0)
                .color(theme::TEXT_PRIMARY),
        );
        ui.add_space(4.0);
        ui.label(
            RichText::new(format!("({})", rows.len()))
                .size(11.0)
                .color(theme::TEXT_DIM),
        );
    });
    ui.add_space(4.0);

    let btn = egui::Button::new(
        RichText::new(format!("{}  Add Task", egui_phosphor::regular::PLUS))
            .color(Color32::WHITE)
            .size(12.0),
    )
    .fill(theme::ACCENT)
    .rounding(egui::Rounding::same(5.0));
    if ui.add_sized([ui.available_width(), 30.0], btn).clicked() {
        action = TaskTableAction::Add;
    }

    ui.add_space(6.0);
    ui.separator();
    ui.add_space(2.0);

    egui::ScrollArea::vertical()
        .id_salt("task_table")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for (i, row) in rows.iter().enumerate() {
                let task = row.task;
                let loc = TaskLocation::new(project_index, row.path.clone());
                let is_selected = selected_task == Some(task.id);

                let row_bg = if is_selected {
                    theme::BG_SELECTED
                } else if i % 2 == 0 {
                    theme::BG_PANEL
                } else {
                    theme::BG_DARK
                };

                let drag_id = egui::Id::new(("task-row", task.id));
                let dragged = ui.dnd_drag_source(drag_id, RowPayload::Task(loc.clone()), |ui| {
                    let frame = egui::Frame {
                        fill: row_bg,
                        rounding: egui::Rounding::same(4.0),
                        inner_margin: egui::Margin::symmetric(6.0, 4.0),
                        ..Default::default()
                    };
                    frame
                        .show(ui, |ui| {
                            ui.set_width(ui.available_width());
                            ui.horizontal(|ui| {
                                ui.spacing_mut().item_spacing.x = 6.0;
                                ui.add_space(row.depth as f32 * theme::INDENT);

                                if task.is_leaf() {
                                    ui.add_space(14.0);
                                } else {
                                    let arrow = if task.collapsed {
                                        egui_phosphor::regular::CARET_RIGHT
                                    } else {
                                        egui_phosphor::regular::CARET_DOWN
                                    };
                                    let toggle = ui.add(
                                        egui::Button::new(RichText::new(arrow).size(11.0)).frame(false),
                                    );
                                    if toggle.clicked() {
                                        action = TaskTableAction::ToggleCollapse(loc.clone());
                                    }
                                }

                                let (dot_rect, _) =
                                    ui.allocate_exact_size(egui::vec2(6.0, 6.0), egui::Sense::hover());
                                ui.painter().circle_filled(
                                    dot_rect.center(),
                                    3.0,
                                    theme::pic_color(task.assignee()),
                                );

                                let mut name = RichText::new(&task.name).size(12.0).color(if is_selected {
                                    Color32::WHITE
                                } else {
                                    theme::TEXT_PRIMARY
                                });
                                if !task.is_leaf() {
                                    name = name.strong();
                                }
                                ui.add(egui::Label::new(name).truncate());

                                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                    ui.spacing_mut().item_spacing.x = 4.0;

                                    let del_btn = ui.add(
                                        egui::Button::new(
                                            RichText::new(egui_phosphor::regular::X)
                                                .size(10.0)
                                                .color(theme::TEXT_DIM),
                                        )
                                        .frame(false),
                                    );
                                    if del_btn.on_hover_text("Delete task").clicked() {
                                        action = TaskTableAction::Delete(loc.clone());
                                    }

                                    let pbar = egui::ProgressBar::new(f32::from(task.completion) / 100.0)
                                        .desired_width(42.0)
                                        .fill(theme::pic_color(task.assignee()))
                                        .rounding(egui::Rounding::same(3.0));
                                    ui.add(pbar);

                                    ui.label(
                                        RichText::new(task.due.format("%m/%d").to_string())
                                            .size(10.0)
                                            .color(theme::TEXT_SECONDARY),
                                    );
                                    ui.label(
                                        RichText::new(egui_phosphor::regular::ARROW_RIGHT)
                                            .size(9.0)
                                            .color(theme::TEXT_DIM),
                                    );
                                    ui.label(
                                        RichText::new(task.start_date.format("%m/%d").to_string())
                                            .size(10.0)
                                            .color(theme::TEXT_SECONDARY),
                                    );
                                    if task.follows_parent() {
                                        ui.label(
                                            RichText::new(egui_phosphor::regular::LINK)
                                                .size(10.0)
                                                .color(theme::TEXT_DIM),
                                        )
                                        .on_hover_text("Follows its parent's start date");
                                    }
                                });
                            });
                        })
                        .response
                });

                let row_rect = dragged.response.rect;
                let row_click = ui.interact(
                    row_rect,
                    egui::Id::new(("task-row-click", task.id)),
                    egui::Sense::click(),
                );
                if row_click.clicked() {
                    action = TaskTableAction::Select(loc.clone());
                }
                row_click.context_menu(|ui| {
                    if ui.button("Add sub-task").clicked() {
                        action = TaskTableAction::AddSubtask(loc.clone());
                        ui.close_menu();
                    }
                    if ui.button("Delete task").clicked() {
                        action = TaskTableAction::Delete(loc.clone());
                        ui.close_menu();
                    }
                });

                if let Some(payload) = row_click.dnd_hover_payload::<RowPayload>() {
                    if matches!(*payload, RowPayload::Task(_)) {
                        if let Some(pointer) = ui.ctx().pointer_interact_pos() {
                            let marker = match drop_mode(row_rect, pointer.y) {
                                DropMode::Before => egui::Rect::from_min_max(
                                    row_rect.left_top(),
                                    egui::pos2(row_rect.right(), row_rect.top() + 2.0),
                                ),
                                DropMode::After => egui::Rect::from_min_max(
                                    egui::pos2(row_rect.left(), row_rect.bottom() - 2.0),
                                    row_rect.right_bottom(),
                                ),
                                DropMode::Into => row_rect,
                            };
                            ui.painter().rect_filled(marker, 2.0, theme::BG_DROP_TARGET);
                        }
                    }
                }
                if let Some(payload) = row_click.dnd_release_payload::<RowPayload>() {
                    if let RowPayload::Task(source) = &*payload {
                        let pointer_y = ui
                            .ctx()
                            .pointer_interact_pos()
                            .map_or(row_rect.center().y, |p| p.y);
                        action = TaskTableAction::Move {
                            source: source.clone(),
                            target: loc.clone(),
                            mode: drop_mode(row_rect, pointer_y),
                        };
                    }
                }

                ui.add_space(1.0);
            }
        });

    action
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_thirds_map_to_drop_modes() {
        let rect = egui::Rect::from_min_size(egui::pos2(0.0, 30.0), egui::vec2(200.0, 30.0));
        assert_eq!(drop_mode(rect, 32.0), DropMode::Before);
        assert_eq!(drop_mode(rect, 45.0), DropMode::Into);
        assert_eq!(drop_mode(rect, 58.0), DropMode::After);
    }
}
