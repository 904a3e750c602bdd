use std::path::Path;

use log::{info, warn};
use serde::Deserialize;

use crate::selection::SelectionPolicy;

// Window
pub const WINDOW_SIZE: [f32; 2] = [1280.0, 860.0];
pub const MIN_WINDOW_SIZE: [f32; 2] = [720.0, 480.0];
pub const APP_TITLE: &str = "学生数据分析系统";

// Charts
pub const GPA_AXIS_MAX: f64 = 4.0;
pub const RADAR_HEIGHT: f32 = 360.0;
pub const GPA_HEIGHT: f32 = 260.0;

// Optional settings file, looked up in the working directory
pub const CONFIG_FILE: &str = "student_lens.json";

/// User-tunable settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// What a new search does to the current selection.
    pub selection_policy: SelectionPolicy,
    /// Decimals shown for semester GPAs and their average.
    pub gpa_decimals: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            selection_policy: SelectionPolicy::default(),
            gpa_decimals: 2,
        }
    }
}

impl ViewerConfig {
    /// Read `path` if it exists. A missing or malformed file yields defaults.
    pub fn load(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(_) => return Self::default(),
        };
        match serde_json::from_str(&text) {
            Ok(cfg) => {
                info!("Loaded settings from {}", path.display());
                cfg
            }
            Err(e) => {
                warn!("Ignoring {}: {e}", path.display());
                Self::default()
            }
        }
    }
}
