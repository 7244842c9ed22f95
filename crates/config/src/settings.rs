// Editor settings
// Loaded from ~/.config/enrichgrid/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Keyboard modifier style preference (primarily for macOS users)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierStyle {
    /// Use platform-native modifier (Cmd on macOS, Ctrl on Windows/Linux)
    #[default]
    Platform,
    /// Always label shortcuts with Ctrl
    Ctrl,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // History
    #[serde(rename = "history.maxDepth")]
    pub history_depth: usize,

    // Grid
    #[serde(rename = "grid.defaultColumnWidth")]
    pub default_column_width: f32,

    #[serde(rename = "grid.minColumnWidth")]
    pub min_column_width: f32,

    // Keyboard
    #[serde(rename = "keyboard.modifierStyle")]
    pub modifier_style: ModifierStyle,

    // Paste
    #[serde(rename = "paste.growGrid")]
    pub paste_grows_grid: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            history_depth: 50,
            default_column_width: 120.0,
            min_column_width: 40.0,
            modifier_style: ModifierStyle::default(),
            paste_grows_grid: true,
        }
    }
}

const DEFAULT_FILE: &str = r#"{
    // Undo depth (entries)
    "history.maxDepth": 50,

    // Column widths in pixels
    "grid.defaultColumnWidth": 120,
    "grid.minColumnWidth": 40,

    // Shortcut labels on macOS: "platform" = Cmd, "ctrl" = Ctrl
    "keyboard.modifierStyle": "platform",

    // Grow the grid when a paste runs past the last row/column
    "paste.growGrid": true
}
"#;

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("enrichgrid")
            .join("settings.json")
    }

    /// Load settings from the default location, creating it if missing
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            if let Err(e) = write_default_file(&path) {
                log::warn!("Error writing default settings.json: {}", e);
            }
            return Self::default();
        }
        Self::load_from(&path)
    }

    /// Load settings from `path`, falling back to defaults on any error
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match Self::parse(&contents) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Error parsing {}: {}; using default settings", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Error reading {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse settings JSON, ignoring `//` comment lines
    pub fn parse(contents: &str) -> Result<Self, String> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");

        serde_json::from_str(&cleaned).map_err(|e| e.to_string())
    }

    /// Save current settings to the default location
    pub fn save(&self) -> Result<(), String> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;

        fs::write(path, json).map_err(|e| e.to_string())
    }
}

fn write_default_file(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| e.to_string())?;
    }
    fs::write(path, DEFAULT_FILE).map_err(|e| e.to_string())
}
