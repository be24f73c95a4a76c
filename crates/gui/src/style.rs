//! Optional external stylesheet (JSON). Absent or broken files fall back to
//! the defaults; neither is fatal.

#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};

use eframe::egui;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const DEFAULT_STYLESHEET: &str = "stylesheet.json";

#[derive(Debug, thiserror::Error)]
pub enum StyleError {
    #[error("stylesheet {0} not found")]
    MissingResource(PathBuf),
    #[error("stylesheet {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("stylesheet {path}: {source}")]
    Parse { path: PathBuf, source: serde_json::Error },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stylesheet {
    /// None keeps egui's system default.
    pub dark_mode: Option<bool>,
    pub connected_color: [u8; 3],
    pub disconnected_color: [u8; 3],
    pub zebra: bool,
    pub monospace_keys: bool,
    pub row_height: f32,
    pub key_width: f32,
    pub value_width: f32,
}

impl Default for Stylesheet {
    fn default() -> Self {
        Self {
            dark_mode: None,
            connected_color: [52, 199, 89],
            disconnected_color: [255, 59, 48],
            zebra: true,
            monospace_keys: true,
            row_height: 18.0,
            key_width: 320.0,
            value_width: 260.0,
        }
    }
}

impl Stylesheet {
    pub fn load(path: &Path) -> Result<Self, StyleError> {
        let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StyleError::MissingResource(path.to_path_buf()),
            _ => StyleError::Io { path: path.to_path_buf(), source: e },
        })?;
        serde_json::from_str(&text).map_err(|source| StyleError::Parse { path: path.to_path_buf(), source })
    }

    /// Load `path` if given, logging and falling back to defaults on any error.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else { return Self::default() };
        match Self::load(path) {
            Ok(s) => {
                info!(path = %path.display(), "style: stylesheet loaded");
                s
            }
            Err(e) => {
                warn!(error = %e, "style: using default styling");
                Self::default()
            }
        }
    }

    /// Label colour keyed on the connection flag.
    pub fn connection_color(&self, connected: bool) -> egui::Color32 {
        let [r, g, b] = if connected { self.connected_color } else { self.disconnected_color };
        egui::Color32::from_rgb(r, g, b)
    }

    pub fn apply(&self, ctx: &egui::Context) {
        match self.dark_mode {
            Some(true) => ctx.set_visuals(egui::Visuals::dark()),
            Some(false) => ctx.set_visuals(egui::Visuals::light()),
            None => {}
        }
    }
}
