//! User settings, persisted as JSON in the OS config directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::model::timeline::{MAX_PIXELS_PER_DAY, MIN_PIXELS_PER_DAY};

const APP_NAME: &str = "GanttTracker";
const SETTINGS_FILE: &str = "settings.json";
const DATA_FILE: &str = "tracker.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Workspace JSON file. `None` means the default under the data dir.
    pub data_file: Option<PathBuf>,
    /// Show archived projects in the project list.
    pub show_archived: bool,
    pub pixels_per_day: f32,
    /// Days of slack kept around task bars when the chart is fitted or
    /// widened during a drag.
    pub timeline_padding_days: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: None,
            show_archived: false,
            pixels_per_day: 18.0,
            timeline_padding_days: 7,
        }
    }
}

fn dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", APP_NAME)
}

/// Where settings live; falls back to the working directory.
pub fn settings_path() -> PathBuf {
    match dirs() {
        Some(dirs) => dirs.config_dir().join(SETTINGS_FILE),
        None => PathBuf::from(SETTINGS_FILE),
    }
}

fn default_data_path() -> PathBuf {
    match dirs() {
        Some(dirs) => dirs.data_dir().join(DATA_FILE),
        None => PathBuf::from(DATA_FILE),
    }
}

impl Settings {
    /// Load settings from `path`. A missing or unreadable file gives the
    /// defaults; settings never block start-up.
    pub fn load_from(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(_) => {
                debug!(path = %path.display(), "no settings file, using defaults");
                return Self::default();
            }
        };
        match serde_json::from_str::<Settings>(&text) {
            Ok(settings) => settings.sanitized(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring malformed settings");
                Self::default()
            }
        }
    }

    pub fn load() -> Self {
        Self::load_from(&settings_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&settings_path())
    }

    /// Resolved path of the workspace JSON file.
    pub fn data_path(&self) -> PathBuf {
        self.data_file.clone().unwrap_or_else(default_data_path)
    }

    fn sanitized(mut self) -> Self {
        self.pixels_per_day = if self.pixels_per_day.is_finite() {
            self.pixels_per_day.clamp(MIN_PIXELS_PER_DAY, MAX_PIXELS_PER_DAY)
        } else {
            Self::default().pixels_per_day
        };
        self.timeline_padding_days = self.timeline_padding_days.clamp(0, 365);
        self
    }
}
