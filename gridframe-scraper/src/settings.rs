//! Persisted settings: API key, selected console and the two folders.
//!
//! Stored as JSON at `~/.config/gridframe/settings.json`. Environment
//! variables override the file; CLI flags override both (applied by the CLI).

use std::path::{Path, PathBuf};

use gridframe_core::SELECT_CONSOLE;
use serde::{Deserialize, Serialize};

use crate::error::ScrapeError;

pub const API_KEY_ENV: &str = "STEAMGRIDDB_API_KEY";
pub const OUTPUT_ENV: &str = "GRIDFRAME_OUTPUT";
pub const OVERLAYS_ENV: &str = "GRIDFRAME_OVERLAYS";

/// Default output folder name, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "Output";

/// Default overlays folder name, relative to the working directory.
pub const DEFAULT_OVERLAYS_DIR: &str = "icon_overlays";

/// Settings file contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub selected_console: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_folder: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlays_folder: Option<PathBuf>,
}

/// Where a setting's effective value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingSource {
    /// Loaded from an environment variable.
    EnvVar(&'static str),
    /// Loaded from the settings file.
    SettingsFile,
    /// Built-in default.
    Default,
    /// Not set anywhere.
    Missing,
}

impl std::fmt::Display for SettingSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EnvVar(var) => write!(f, "env ${}", var),
            Self::SettingsFile => write!(f, "settings file"),
            Self::Default => write!(f, "default"),
            Self::Missing => write!(f, "not set"),
        }
    }
}

/// Provenance of each setting.
#[derive(Debug)]
pub struct SettingSources {
    pub api_key: SettingSource,
    pub selected_console: SettingSource,
    pub output_folder: SettingSource,
    pub overlays_folder: SettingSource,
}

/// Canonical path to the settings file.
pub fn settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("gridframe").join("settings.json"))
}

impl Settings {
    /// Load the settings file, falling back to defaults if it is missing or unreadable.
    pub fn load() -> Self {
        match settings_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load from an explicit path. Never fails: problems are logged and
    /// defaults returned.
    pub fn load_from(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                log::warn!("Could not read settings {}: {}", path.display(), e);
                return Self::default();
            }
        };
        match serde_json::from_str(&contents) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring malformed settings {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load the settings file with environment overrides applied.
    pub fn load_effective() -> Self {
        Self::load().with_env(|var| std::env::var(var).ok())
    }

    /// Apply overrides from `lookup` (normally the process environment).
    /// Empty values are ignored.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        if let Some(key) = get(API_KEY_ENV) {
            self.api_key = key;
        }
        if let Some(dir) = get(OUTPUT_ENV) {
            self.output_folder = Some(PathBuf::from(dir));
        }
        if let Some(dir) = get(OVERLAYS_ENV) {
            self.overlays_folder = Some(PathBuf::from(dir));
        }
        self
    }

    /// Save to the canonical settings path. Returns the path written.
    pub fn save(&self) -> Result<PathBuf, ScrapeError> {
        let path = settings_path().ok_or_else(|| {
            ScrapeError::Config("Could not determine config directory".to_string())
        })?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Write pretty JSON to `path` via a temp file and rename.
    pub fn save_to(&self, path: &Path) -> Result<(), ScrapeError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Trimmed API key.
    pub fn api_key(&self) -> &str {
        self.api_key.trim()
    }

    /// The selected console, or the "Select Console" placeholder when unset.
    pub fn console(&self) -> &str {
        let console = self.selected_console.trim();
        if console.is_empty() {
            SELECT_CONSOLE
        } else {
            console
        }
    }

    pub fn output_root(&self) -> PathBuf {
        self.output_folder
            .clone()
            .unwrap_or_else(|| working_dir().join(DEFAULT_OUTPUT_DIR))
    }

    pub fn overlays_root(&self) -> PathBuf {
        self.overlays_folder
            .clone()
            .unwrap_or_else(|| working_dir().join(DEFAULT_OVERLAYS_DIR))
    }
}

fn working_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Determine where each setting is coming from.
pub fn setting_sources() -> SettingSources {
    sources_for(&Settings::load(), |var| std::env::var(var).ok())
}

pub(crate) fn sources_for(
    file: &Settings,
    lookup: impl Fn(&str) -> Option<String>,
) -> SettingSources {
    let env_set = |var: &str| lookup(var).is_some_and(|v| !v.trim().is_empty());

    let api_key = if env_set(API_KEY_ENV) {
        SettingSource::EnvVar(API_KEY_ENV)
    } else if !file.api_key.trim().is_empty() {
        SettingSource::SettingsFile
    } else {
        SettingSource::Missing
    };

    let selected_console = if file.selected_console.trim().is_empty() {
        SettingSource::Missing
    } else {
        SettingSource::SettingsFile
    };

    let output_folder = if env_set(OUTPUT_ENV) {
        SettingSource::EnvVar(OUTPUT_ENV)
    } else if file.output_folder.is_some() {
        SettingSource::SettingsFile
    } else {
        SettingSource::Default
    };

    let overlays_folder = if env_set(OVERLAYS_ENV) {
        SettingSource::EnvVar(OVERLAYS_ENV)
    } else if file.overlays_folder.is_some() {
        SettingSource::SettingsFile
    } else {
        SettingSource::Default
    };

    SettingSources {
        api_key,
        selected_console,
        output_folder,
        overlays_folder,
    }
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
