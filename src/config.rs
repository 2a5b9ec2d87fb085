//! Dashboard configuration file support.
//!
//! Settings are read from `loadings.toml`. Every field has a default, so a
//! missing file or a partial file is fine.

use crate::stats::TermLabels;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "LOADINGS_CONFIG";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub ui: UiSettings,
    #[serde(default)]
    pub export: ExportSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Roster sources and the term names shown for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSettings {
    #[serde(default = "default_fall_path")]
    pub fall_path: PathBuf,
    #[serde(default = "default_spring_path")]
    pub spring_path: PathBuf,
    #[serde(default = "default_fall_label")]
    pub fall_label: String,
    #[serde(default = "default_spring_label")]
    pub spring_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSettings {
    #[serde(default = "default_display_name")]
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiSettings {
    #[serde(default = "default_window_width")]
    pub window_width: f32,
    #[serde(default = "default_window_height")]
    pub window_height: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportSettings {
    #[serde(default)]
    pub open_after_export: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_fall_path() -> PathBuf {
    PathBuf::from("data/source/Fall-2024-PIN-PWL.xlsx")
}

fn default_spring_path() -> PathBuf {
    PathBuf::from("data/source/Spring-2025-PIN-PWL.xlsx")
}

fn default_fall_label() -> String {
    "Fall 2024".to_string()
}

fn default_spring_label() -> String {
    "Spring 2025".to_string()
}

fn default_display_name() -> String {
    "Faculty Viewer".to_string()
}

fn default_window_width() -> f32 {
    1400.0
}

fn default_window_height() -> f32 {
    900.0
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            fall_path: default_fall_path(),
            spring_path: default_spring_path(),
            fall_label: default_fall_label(),
            spring_label: default_spring_label(),
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            display_name: default_display_name(),
        }
    }
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl DataSettings {
    pub fn term_labels(&self) -> TermLabels {
        TermLabels {
            fall: self.fall_label.clone(),
            spring: self.spring_label.clone(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Locate the config file.
    ///
    /// Searches `$LOADINGS_CONFIG`, then `loadings.toml` and
    /// `config/loadings.toml` in the current directory.
    pub fn locate() -> Option<PathBuf> {
        if let Ok(explicit) = env::var(CONFIG_ENV) {
            return Some(PathBuf::from(explicit));
        }

        [
            PathBuf::from("loadings.toml"),
            PathBuf::from("config/loadings.toml"),
        ]
        .into_iter()
        .find(|path| path.exists())
    }

    /// Load the located config file, or defaults when there is none.
    pub fn load() -> Result<(Self, Option<PathBuf>), ConfigError> {
        match Self::locate() {
            Some(path) => Ok((Self::from_file(&path)?, Some(path))),
            None => Ok((Self::default(), None)),
        }
    }
}
