use chrono::{Datelike, NaiveDate};
use egui::{Color32, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};
use gantt_tracker::date;
use gantt_tracker::model::{TimelineScale, TimelineViewport};
use gantt_tracker::schedule::{DragController, DragMode};
use gantt_tracker::{Task, TaskLocation};
use uuid::Uuid;

use crate::ui::{theme, VisibleRow};

const ROW_HEIGHT: f32 = theme::ROW_HEIGHT;
const ROW_PADDING: f32 = theme::ROW_GAP;
const HEADER_HEIGHT: f32 = theme::HEADER_HEIGHT;
const HANDLE_WIDTH: f32 = theme::HANDLE_WIDTH;

/// Pointer events from the chart. The app turns these into drag-controller
/// calls; the chart never writes dates itself.
#[derive(Debug, Default)]
pub struct ChartInteraction {
    pub select: Option<TaskLocation>,
    pub clear_selection: bool,
    pub drag_begin: Option<(TaskLocation, DragMode)>,
    /// Horizontal pointer travel since the press, in screen pixels.
    pub drag_delta: Option<f32>,
    pub drag_released: bool,
    pub toggle_collapse: Option<TaskLocation>,
}

/// Render the Gantt chart area (central panel).
pub fn show_gantt_chart(
    project_index: usize,
    rows: &[VisibleRow<'_>],
    viewport: &mut TimelineViewport,
    drag: &DragController,
    drag_conflict: bool,
    selected_task: Option<Uuid>,
    ui: &mut Ui,
) -> ChartInteraction {
    let mut interaction = ChartInteraction::default();
    let available = ui.available_size();
    let chart_width = viewport.total_width().max(available.x);
    let chart_height = HEADER_HEIGHT + (rows.len() as f32 * (ROW_HEIGHT + ROW_PADDING)) + 40.0;

    // Ctrl+scroll zooms.
    let scroll_delta = ui.input(|i| i.smooth_scroll_delta);
    if ui.rect_contains_pointer(ui.max_rect()) && ui.input(|i| i.modifiers.ctrl) {
        if scroll_delta.y > 0.0 {
            viewport.zoom_in();
        } else if scroll_delta.y < 0.0 {
            viewport.zoom_out();
        }
    }

    let press_x = ui.input(|i| i.pointer.press_origin()).map(|p| p.x);

    egui::ScrollArea::both()
        .id_salt("gantt_chart")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let (response, painter) = ui.allocate_painter(
                Vec2::new(chart_width, chart_height.max(available.y)),
                Sense::click(),
            );
            let origin = response.rect.min;
            let mut consumed_click = false;

            painter.rect_filled(response.rect, 0.0, theme::BG_DARK);
            draw_timeline_header(&painter, origin, viewport, chart_width);
            draw_today_line(&painter, origin, viewport, chart_height);

            for i in 0..rows.len() {
                let y = origin.y + HEADER_HEIGHT + i as f32 * (ROW_HEIGHT + ROW_PADDING);
                let row_bg = if i % 2 == 0 { theme::BG_PANEL } else { theme::BG_DARK };
                painter.rect_filled(
                    Rect::from_min_size(Pos2::new(origin.x, y), Vec2::new(chart_width, ROW_HEIGHT + ROW_PADDING)),
                    0.0,
                    row_bg,
                );
                painter.line_segment(
                    [
                        Pos2::new(origin.x, y + ROW_HEIGHT + ROW_PADDING),
                        Pos2::new(origin.x + chart_width, y + ROW_HEIGHT + ROW_PADDING),
                    ],
                    Stroke::new(0.5, theme::BORDER_SUBTLE),
                );
            }

            for (i, row) in rows.iter().enumerate() {
                let task = row.task;
                let loc = TaskLocation::new(project_index, row.path.clone());
                let y = origin.y + HEADER_HEIGHT + i as f32 * (ROW_HEIGHT + ROW_PADDING) + ROW_PADDING;
                let is_selected = selected_task == Some(task.id);
                let tentative = drag.tentative_window(task.id);
                let (start, due) = tentative.unwrap_or((task.start_date, task.due));
                let conflict = tentative.is_some() && drag_conflict;

                let bar_rect = draw_task_bar(
                    &painter,
                    origin,
                    viewport,
                    BarStyle {
                        task,
                        start,
                        due,
                        is_selected,
                        conflict,
                    },
                    y,
                );

                let bar_response = ui.interact(
                    bar_rect,
                    ui.make_persistent_id(("task-bar", task.id)),
                    Sense::click_and_drag(),
                );
                let left_handle_rect = Rect::from_min_max(
                    Pos2::new(bar_rect.left() - HANDLE_WIDTH * 0.5, bar_rect.top()),
                    Pos2::new(bar_rect.left() + HANDLE_WIDTH * 0.5, bar_rect.bottom()),
                );
                let right_handle_rect = Rect::from_min_max(
                    Pos2::new(bar_rect.right() - HANDLE_WIDTH * 0.5, bar_rect.top()),
                    Pos2::new(bar_rect.right() + HANDLE_WIDTH * 0.5, bar_rect.bottom()),
                );
                let left_response = ui.interact(
                    left_handle_rect.expand(4.0),
                    ui.make_persistent_id(("task-resize-left", task.id)),
                    Sense::drag(),
                );
                let right_response = ui.interact(
                    right_handle_rect.expand(4.0),
                    ui.make_persistent_id(("task-resize-right", task.id)),
                    Sense::drag(),
                );

                if bar_response.clicked() {
                    interaction.select = Some(loc.clone());
                    consumed_click = true;
                }
                if bar_response.double_clicked() && !task.is_leaf() {
                    interaction.toggle_collapse = Some(loc.clone());
                }

                let gestures = [
                    (&left_response, DragMode::ResizeStart),
                    (&right_response, DragMode::ResizeEnd),
                    (&bar_response, DragMode::Move),
                ];
                for (resp, mode) in gestures {
                    if resp.drag_started() {
                        interaction.drag_begin = Some((loc.clone(), mode));
                        interaction.select = Some(loc.clone());
                        consumed_click = true;
                    }
                    if resp.dragged() {
                        let cursor = if mode == DragMode::Move {
                            egui::CursorIcon::Grabbing
                        } else {
                            egui::CursorIcon::ResizeHorizontal
                        };
                        ui.ctx().set_cursor_icon(cursor);
                        if let (Some(origin_x), Some(ptr)) = (press_x, resp.interact_pointer_pos()) {
                            interaction.drag_delta = Some(ptr.x - origin_x);
                        }
                    }
                    if resp.drag_stopped() {
                        interaction.drag_released = true;
                    }
                }

                if is_selected || left_response.hovered() || right_response.hovered() {
                    if left_response.hovered() || right_response.hovered() {
                        ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeHorizontal);
                    } else if bar_response.hovered() {
                        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                    }
                    let handle_h = bar_rect.height() * 0.55;
                    let handle_y = bar_rect.center().y - handle_h / 2.0;
                    let lh = Rect::from_min_size(Pos2::new(bar_rect.left() - 1.5, handle_y), Vec2::new(4.0, handle_h));
                    let rh = Rect::from_min_size(Pos2::new(bar_rect.right() - 2.5, handle_y), Vec2::new(4.0, handle_h));
                    painter.rect_filled(lh, Rounding::same(2.0), theme::HANDLE_COLOR);
                    painter.rect_filled(rh, Rounding::same(2.0), theme::HANDLE_COLOR);
                }

                if bar_response.hovered() && !drag.is_dragging() {
                    egui::show_tooltip_at_pointer(
                        ui.ctx(),
                        ui.layer_id(),
                        egui::Id::new(("task-tip", task.id)),
                        |ui| {
                            ui.strong(&task.name);
                            ui.label(format!(
                                "{} {} {}",
                                date::format_local_date(task.start_date),
                                egui_phosphor::regular::ARROW_RIGHT,
                                date::format_local_date(task.due),
                            ));
                            ui.label(format!("Completion: {}%", task.completion));
                            if let Some(pic) = task.assignee() {
                                ui.label(format!("PIC: {pic}"));
                            }
                        },
                    );
                }
            }

            if response.clicked() && !consumed_click {
                interaction.clear_selection = true;
            }
        });

    interaction
}

fn draw_timeline_header(painter: &egui::Painter, origin: Pos2, viewport: &TimelineViewport, width: f32) {
    painter.rect_filled(
        Rect::from_min_size(origin, Vec2::new(width, HEADER_HEIGHT)),
        0.0,
        theme::BG_HEADER,
    );
    painter.line_segment(
        [
            Pos2::new(origin.x, origin.y + HEADER_HEIGHT),
            Pos2::new(origin.x + width, origin.y + HEADER_HEIGHT),
        ],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );

    let grid_line = |x: f32| {
        painter.line_segment(
            [Pos2::new(x, origin.y + HEADER_HEIGHT), Pos2::new(x, origin.y + 2000.0)],
            Stroke::new(0.5, theme::GRID_LINE),
        );
    };
    let month_label = |x: f32, y: f32, d: NaiveDate| {
        painter.text(
            Pos2::new(x, origin.y + y),
            egui::Align2::LEFT_CENTER,
            d.format("%b %Y").to_string(),
            theme::font_header(),
            theme::TEXT_PRIMARY,
        );
    };

    let mut day = viewport.start;
    let end = viewport.end;

    match viewport.scale {
        TimelineScale::Days => {
            while day <= end {
                let x = origin.x + viewport.date_to_x(day);
                grid_line(x);
                if viewport.pixels_per_day >= 20.0 {
                    let is_weekend = day.weekday().num_days_from_monday() >= 5;
                    painter.text(
                        Pos2::new(x + 3.0, origin.y + 28.0),
                        egui::Align2::LEFT_CENTER,
                        day.format("%d").to_string(),
                        theme::font_sub(),
                        if is_weekend { theme::TEXT_DIM } else { theme::TEXT_SECONDARY },
                    );
                }
                if day.day() == 1 {
                    month_label(x + 3.0, 12.0, day);
                }
                day = date::add_days(day, 1);
            }
        }
        TimelineScale::Weeks => {
            day = date::add_days(day, -i64::from(day.weekday().num_days_from_monday()));
            while day <= end {
                let x = origin.x + viewport.date_to_x(day);
                grid_line(x);
                painter.text(
                    Pos2::new(x + 3.0, origin.y + 28.0),
                    egui::Align2::LEFT_CENTER,
                    day.format("W%V").to_string(),
                    theme::font_sub(),
                    theme::TEXT_SECONDARY,
                );
                if day.day() <= 7 {
                    month_label(x + 3.0, 12.0, day);
                }
                day = date::add_days(day, 7);
            }
        }
        TimelineScale::Months => {
            day = day.with_day(1).unwrap_or(day);
            while day <= end {
                let x = origin.x + viewport.date_to_x(day);
                grid_line(x);
                month_label(x + 5.0, 18.0, day);
                day = day
                    .checked_add_months(chrono::Months::new(1))
                    .unwrap_or_else(|| date::add_days(day, 31));
            }
        }
    }
}

fn draw_today_line(painter: &egui::Painter, origin: Pos2, viewport: &TimelineViewport, height: f32) {
    let today = chrono::Local::now().date_naive();
    if !viewport.contains_window(today, today) {
        return;
    }
    let x = origin.x + viewport.date_to_x(today);
    painter.line_segment(
        [Pos2::new(x, origin.y + HEADER_HEIGHT), Pos2::new(x, origin.y + height)],
        Stroke::new(1.5, theme::TODAY_LINE),
    );

    let badge_w = 42.0;
    let badge_rect = Rect::from_min_size(
        Pos2::new(x - badge_w / 2.0, origin.y + HEADER_HEIGHT - 1.0),
        Vec2::new(badge_w, 14.0),
    );
    painter.rect_filled(badge_rect, Rounding::same(3.0), theme::TODAY_LINE);
    painter.text(
        badge_rect.center(),
        egui::Align2::CENTER_CENTER,
        "Today",
        theme::font_small(),
        Color32::WHITE,
    );
}

struct BarStyle<'a> {
    task: &'a Task,
    start: NaiveDate,
    due: NaiveDate,
    is_selected: bool,
    conflict: bool,
}

/// A bar spans from the start of its first day to the end of its due day.
fn draw_task_bar(painter: &egui::Painter, origin: Pos2, viewport: &TimelineViewport, bar: BarStyle<'_>, y: f32) -> Rect {
    let task = bar.task;
    let x_start = origin.x + viewport.date_to_x(bar.start);
    let x_end = origin.x + viewport.date_to_x(date::add_days(bar.due, 1));
    let bar_width = (x_end - x_start).max(6.0);

    // Parents render as slimmer summary bars.
    let inset = if task.is_leaf() { theme::BAR_INSET } else { ROW_HEIGHT * 0.28 };
    let bar_rect = Rect::from_min_size(
        Pos2::new(x_start, y + inset),
        Vec2::new(bar_width, ROW_HEIGHT - inset * 2.0),
    );
    let rounding = Rounding::same(theme::BAR_ROUNDING);
    let fill = if task.is_leaf() {
        theme::pic_color(task.assignee())
    } else {
        theme::SUMMARY_BAR
    };

    painter.rect_filled(bar_rect.translate(Vec2::new(1.0, 2.0)), rounding, Color32::from_black_alpha(35));
    painter.rect_filled(bar_rect, rounding, fill);
    let highlight_rect = Rect::from_min_size(bar_rect.min, Vec2::new(bar_width, (bar_rect.height() * 0.45).max(4.0)));
    painter.rect_filled(
        highlight_rect,
        Rounding {
            nw: theme::BAR_ROUNDING,
            ne: theme::BAR_ROUNDING,
            sw: 0.0,
            se: 0.0,
        },
        Color32::from_white_alpha(25),
    );

    if task.completion > 0 {
        let progress = f32::from(task.completion.min(100)) / 100.0;
        let progress_width = bar_width * progress;
        let progress_rect = Rect::from_min_size(bar_rect.min, Vec2::new(progress_width, bar_rect.height()));
        painter.rect_filled(progress_rect, rounding, theme::PROGRESS_OVERLAY);
        if task.completion < 98 {
            let tick_x = bar_rect.left() + progress_width;
            painter.line_segment(
                [Pos2::new(tick_x, bar_rect.top() + 2.0), Pos2::new(tick_x, bar_rect.bottom() - 2.0)],
                Stroke::new(1.0, Color32::from_white_alpha(60)),
            );
        }
    }

    if bar.conflict {
        painter.rect_stroke(
            bar_rect.expand(1.5),
            Rounding::same(theme::BAR_ROUNDING + 1.5),
            Stroke::new(2.0, theme::CONFLICT),
        );
    } else if bar.is_selected {
        painter.rect_stroke(
            bar_rect.expand(1.5),
            Rounding::same(theme::BAR_ROUNDING + 1.5),
            Stroke::new(2.0, theme::BORDER_ACCENT),
        );
    }

    if bar_width > 30.0 && task.is_leaf() {
        let galley = painter.layout_no_wrap(task.name.clone(), theme::font_bar(), theme::TEXT_ON_BAR);
        let clipped = painter.with_clip_rect(bar_rect);
        let text_y = bar_rect.top() + (bar_rect.height() - galley.size().y) / 2.0;
        clipped.galley(Pos2::new(bar_rect.left() + 6.0, text_y), galley, Color32::TRANSPARENT);
    } else if !task.is_leaf() {
        painter.text(
            Pos2::new(bar_rect.right() + 6.0, bar_rect.center().y),
            egui::Align2::LEFT_CENTER,
            &task.name,
            theme::font_bar(),
            theme::TEXT_SECONDARY,
        );
    }

    bar_rect
}
