//! User settings for the Medinotes CLI.
//!
//! Stored as `settings.json` in an OS-appropriate config directory. The
//! `MEDINOTES_CONFIG_DIR` environment variable replaces that directory.

use anyhow::Context;
use medinotes_core::RenderOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that overrides [`config_dir`].
pub const CONFIG_DIR_ENV: &str = "MEDINOTES_CONFIG_DIR";

/// Persisted CLI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    /// Directory scanned for user `*.json` template definitions.
    #[serde(default = "default_template_directory")]
    pub template_directory: String,
    #[serde(default)]
    pub render: RenderOptions,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            template_directory: default_template_directory(),
            render: RenderOptions::default(),
        }
    }
}

/// Returns the config directory.
///
/// - `$MEDINOTES_CONFIG_DIR` when set and non-empty
/// - macOS / Linux: `~/.config/medinotes`
/// - Windows: `%APPDATA%/Medinotes`
pub fn config_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    #[cfg(target_os = "windows")]
    {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("Medinotes")
    }
    #[cfg(not(target_os = "windows"))]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("medinotes")
    }
}

pub fn settings_file_path() -> PathBuf {
    config_dir().join("settings.json")
}

fn default_template_directory() -> String {
    config_dir().join("templates").to_string_lossy().to_string()
}

/// Loads settings from the default location.
pub fn load_settings() -> AppSettings {
    load_settings_from(&settings_file_path())
}

/// Loads settings from `path`; returns defaults if the file is missing or corrupt.
pub fn load_settings_from(path: &Path) -> AppSettings {
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("ignoring corrupt settings file {}: {e}", path.display());
            AppSettings::default()
        }),
        Err(_) => {
            log::debug!("no settings at {}, using defaults", path.display());
            AppSettings::default()
        }
    }
}

/// Writes `settings` to `path` as pretty JSON, creating parent directories as needed.
pub fn save_settings_to(path: &Path, settings: &AppSettings) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create settings directory {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
