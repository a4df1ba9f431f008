use egui::{Color32, RichText, Ui};
use gantt_tracker::tracker::{DropMode, MoveSource, MoveTarget};
use gantt_tracker::Workspace;

use crate::ui::{theme, RowPayload};

/// Actions that the project list can request.
pub enum ProjectListAction {
    None,
    Select(usize),
    Add,
    Rename(usize, String),
    ToggleArchived(usize),
    Delete(usize),
    Move {
        source: MoveSource,
        target: MoveTarget,
        mode: DropMode,
    },
}

/// Render the project list at the top of the side panel.
pub fn show_project_list(
    workspace: &Workspace,
    selected: Option<usize>,
    show_archived: bool,
    ui: &mut Ui,
) -> ProjectListAction {
    let mut action = ProjectListAction::None;

    ui.add_space(2.0);
    ui.horizontal(|ui| {
        ui.label(
            RichText::new("Projects")
                .strong()
                .size(15.0)
                .color(theme::TEXT_PRIMARY),
        );
        ui.label(
            RichText::new(format!("({})", workspace.projects.len()))
                .size(11.0)
                .color(theme::TEXT_DIM),
        );
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let btn = egui::Button::new(
                RichText::new(format!("{}  Project", egui_phosphor::regular::PLUS))
                    .color(Color32::WHITE)
                    .size(11.0),
            )
            .fill(theme::ACCENT)
            .rounding(egui::Rounding::same(4.0));
            if ui.add(btn).clicked() {
                action = ProjectListAction::Add;
            }
        });
    });
    ui.add_space(4.0);

    egui::ScrollArea::vertical()
        .id_salt("project_list")
        .max_height(160.0)
        .auto_shrink([false, true])
        .show(ui, |ui| {
            for (index, project) in workspace.projects.iter().enumerate() {
                if project.is_archived && !show_archived {
                    continue;
                }
                let is_selected = selected == Some(index);

                let drag_id = egui::Id::new(("project-row", project.id.as_str()));
                let row = ui.dnd_drag_source(drag_id, RowPayload::Project(index), |ui| {
                    let frame = egui::Frame {
                        fill: if is_selected { theme::BG_SELECTED } else { theme::BG_DARK },
                        rounding: egui::Rounding::same(4.0),
                        inner_margin: egui::Margin::symmetric(6.0, 4.0),
                        ..Default::default()
                    };
                    frame.show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.horizontal(|ui| {
                            let icon = if project.is_archived {
                                egui_phosphor::regular::ARCHIVE
                            } else {
                                egui_phosphor::regular::FOLDER
                            };
                            ui.label(RichText::new(icon).color(theme::TEXT_DIM));
                            let color = if project.is_archived {
                                theme::TEXT_DIM
                            } else {
                                theme::TEXT_PRIMARY
                            };
                            ui.add(
                                egui::Label::new(RichText::new(&project.name).size(12.0).color(color))
                                    .truncate(),
                            );
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                ui.label(
                                    RichText::new(format!("{}%", project.completion))
                                        .size(10.0)
                                        .color(theme::TEXT_SECONDARY),
                                );
                                if let Some(pic) = &project.pic {
                                    ui.label(RichText::new(pic).size(10.0).color(theme::TEXT_DIM));
                                }
                            });
                        });
                    })
                    .response
                });

                let response = ui.interact(
                    row.response.rect,
                    egui::Id::new(("project-click", project.id.as_str())),
                    egui::Sense::click(),
                );
                if response.clicked() {
                    action = ProjectListAction::Select(index);
                }
                response.context_menu(|ui| {
                    let buffer_id = drag_id.with("rename");
                    let mut name = ui
                        .ctx()
                        .data_mut(|d| d.get_temp::<String>(buffer_id))
                        .unwrap_or_else(|| project.name.clone());
                    let mut committed = false;
                    ui.horizontal(|ui| {
                        ui.label("Name");
                        let edit = ui.text_edit_singleline(&mut name);
                        if edit.lost_focus() {
                            committed = true;
                            if name != project.name {
                                action = ProjectListAction::Rename(index, name.clone());
                            }
                        }
                    });
                    ui.ctx().data_mut(|d| {
                        if committed {
                            d.remove::<String>(buffer_id);
                        } else {
                            d.insert_temp(buffer_id, name);
                        }
                    });
                    ui.separator();
                    let label = if project.is_archived { "Unarchive" } else { "Archive" };
                    if ui.button(label).clicked() {
                        action = ProjectListAction::ToggleArchived(index);
                        ui.close_menu();
                    }
                    if ui.button("Delete project").clicked() {
                        action = ProjectListAction::Delete(index);
                        ui.close_menu();
                    }
                });

                // Drops: tasks go into the project, projects land above/below.
                if let Some(payload) = response.dnd_hover_payload::<RowPayload>() {
                    if !matches!(*payload, RowPayload::Project(i) if i == index) {
                        ui.painter()
                            .rect_filled(response.rect, 4.0, theme::BG_DROP_TARGET);
                    }
                }
                if let Some(payload) = response.dnd_release_payload::<RowPayload>() {
                    let pointer_y = ui
                        .ctx()
                        .pointer_interact_pos()
                        .map_or(response.rect.center().y, |p| p.y);
                    let mode = if pointer_y < response.rect.center().y {
                        DropMode::Before
                    } else {
                        DropMode::After
                    };
                    action = match &*payload {
                        RowPayload::Task(loc) => ProjectListAction::Move {
                            source: MoveSource::Task(loc.clone()),
                            target: MoveTarget::Project(index),
                            mode: DropMode::Into,
                        },
                        RowPayload::Project(from) => ProjectListAction::Move {
                            source: MoveSource::Project(*from),
                            target: MoveTarget::Project(index),
                            mode,
                        },
                    };
                }
                ui.add_space(1.0);
            }
        });

    action
}
