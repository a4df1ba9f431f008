#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod ui;

use gantt_tracker::config::Settings;
use gantt_tracker::io::JsonFileStore;
use gantt_tracker::{Tracker, Workspace};
use tracing::{error, info};

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("gantt_tracker=info")),
        )
        .init();

    let settings = Settings::load();
    let data_path = settings.data_path();
    info!(path = %data_path.display(), "opening workspace");

    let (tracker, status) = match Tracker::open(Box::new(JsonFileStore::new(&data_path))) {
        Ok(tracker) => (tracker, format!("Loaded {}", data_path.display())),
        Err(e) => {
            // Keep the broken file untouched until the first edit overwrites it.
            error!(error = %e, "failed to load workspace, starting empty");
            let store = Box::new(JsonFileStore::new(&data_path));
            (
                Tracker::new(store, Workspace::default()),
                format!("Could not load {}: {e}", data_path.display()),
            )
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 400.0])
            .with_title("Gantt Tracker"),
        ..Default::default()
    };

    eframe::run_native(
        "Gantt Tracker",
        options,
        Box::new(move |cc| Ok(Box::new(app::TrackerApp::new(cc, tracker, settings, status)))),
    )
}
