use egui::{menu, RichText, Ui};
use gantt_tracker::model::TimelineScale;
use gantt_tracker::tracker::ImportMode;

use crate::app::TrackerApp;
use crate::ui::theme;

/// Render the top menu bar.
pub fn show_toolbar(app: &mut TrackerApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button(RichText::new("  File  ").font(theme::font_menu()), |ui| {
            if ui.button("  Import CSV (replace)...").clicked() {
                app.import_csv(ImportMode::Replace);
                ui.close_menu();
            }
            if ui.button("  Import CSV (merge)...").clicked() {
                app.import_csv(ImportMode::Merge);
                ui.close_menu();
            }
            if ui.button("  Export CSV...").clicked() {
                app.export_csv();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Reload from disk").clicked() {
                app.reload();
                ui.close_menu();
            }
            if ui.button("  Open Data Folder").clicked() {
                app.open_data_folder();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  Edit  ").font(theme::font_menu()), |ui| {
            if ui
                .add_enabled(app.tracker.can_undo(), egui::Button::new("  Undo          Ctrl+Z"))
                .clicked()
            {
                app.undo();
                ui.close_menu();
            }
            if ui
                .add_enabled(app.tracker.can_redo(), egui::Button::new("  Redo          Ctrl+Y"))
                .clicked()
            {
                app.redo();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  People in Charge...").clicked() {
                app.dialogs.show_pics = true;
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  View  ").font(theme::font_menu()), |ui| {
            if ui.button("  Zoom In        Ctrl+Scroll ↑").clicked() {
                app.viewport.zoom_in();
                ui.close_menu();
            }
            if ui.button("  Zoom Out      Ctrl+Scroll ↓").clicked() {
                app.viewport.zoom_out();
                ui.close_menu();
            }
            if ui.button("  Fit to Project").clicked() {
                app.fit_viewport();
                ui.close_menu();
            }
            ui.separator();
            ui.label(RichText::new("Timeline Scale").small().weak());
            for (scale, label) in [
                (TimelineScale::Days, "Days"),
                (TimelineScale::Weeks, "Weeks"),
                (TimelineScale::Months, "Months"),
            ] {
                if ui.radio_value(&mut app.viewport.scale, scale, label).clicked() {
                    ui.close_menu();
                }
            }
            ui.separator();
            if ui
                .checkbox(&mut app.settings.show_archived, "Show archived projects")
                .changed()
            {
                app.save_settings();
            }
        });

        ui.menu_button(RichText::new("  Help  ").font(theme::font_menu()), |ui| {
            if ui.button("CSV Format").clicked() {
                app.dialogs.show_csv_help = true;
                ui.close_menu();
            }
            if ui.button("About").clicked() {
                app.dialogs.show_about = true;
                ui.close_menu();
            }
        });

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if let Some(err) = app.tracker.last_save_error() {
                ui.label(
                    RichText::new(format!("{} not saved", egui_phosphor::regular::WARNING))
                        .size(11.0)
                        .color(theme::CONFLICT),
                )
                .on_hover_text(err);
            }
            let name = app
                .selected_project()
                .and_then(|i| app.tracker.project(i))
                .map_or("No project", |p| p.name.as_str());
            ui.label(RichText::new(name).size(11.0).weak());
        });
    });
}
