//! Application settings management
//!
//! Handles loading and saving preferences that persist across sessions.
//! Settings are stored in `{config_dir}/sdfpad/settings.json`. Command line
//! flags override the stored values for a single run.

use anyhow::{Context, Result, bail};
use sdfpad_sdf::FragmentSource;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::Args;

/// Application settings that persist across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Main window title
    pub window_title: String,
    /// Initial window width in logical pixels
    pub window_width: u32,
    /// Initial window height in logical pixels
    pub window_height: u32,
    /// Directory holding `palette.wgsl` and `preview.wgsl`; embedded fragments if unset
    pub shader_dir: Option<PathBuf>,
    /// Rebuild the preview when fragments in `shader_dir` change
    pub watch_shaders: bool,
    /// Background behind the canvas quad (linear RGBA)
    pub clear_color: [f64; 4],
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_title: "SDFPad".to_string(),
            window_width: 1280,
            window_height: 720,
            shader_dir: None,
            watch_shaders: false,
            clear_color: [0.3, 0.4, 0.4, 1.0],
        }
    }
}

impl Settings {
    /// Apply command line overrides on top of stored settings
    pub fn with_overrides(mut self, args: &Args) -> Self {
        if let Some(dir) = &args.shader_dir {
            self.shader_dir = Some(dir.clone());
        }
        if args.watch {
            self.watch_shaders = true;
        }
        if let Some(width) = args.width {
            self.window_width = width;
        }
        if let Some(height) = args.height {
            self.window_height = height;
        }
        self
    }

    /// Where the canvas reads shader fragments from
    pub fn fragment_source(&self) -> FragmentSource {
        match &self.shader_dir {
            Some(dir) => FragmentSource::Directory(dir.clone()),
            None => FragmentSource::Embedded,
        }
    }

    /// Directory to watch for fragment edits, if hot reload applies
    pub fn watched_dir(&self) -> Option<&Path> {
        if self.watch_shaders {
            self.shader_dir.as_deref()
        } else {
            None
        }
    }
}

/// Get the path to the settings file
fn settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("sdfpad").join("settings.json"))
}

/// Load settings from disk, returning defaults if file doesn't exist or is invalid
pub fn load_settings() -> Settings {
    match settings_path() {
        Some(path) => load_settings_from(&path),
        None => Settings::default(),
    }
}

fn load_settings_from(path: &Path) -> Settings {
    if !path.exists() {
        return Settings::default();
    }

    match fs::read_to_string(path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
            tracing::warn!("Ignoring invalid settings file {}: {}", path.display(), e);
            Settings::default()
        }),
        Err(_) => Settings::default(),
    }
}

/// Save settings to disk
pub fn save_settings(settings: &Settings) -> Result<()> {
    let Some(path) = settings_path() else {
        bail!("Could not determine config directory");
    };
    save_settings_to(settings, &path)
}

fn save_settings_to(settings: &Settings, path: &Path) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    let json = serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;

    fs::write(path, json).context("Failed to write settings file")
}
