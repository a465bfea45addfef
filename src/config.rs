use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::installers::{AmbiguityPolicy, PlanOptions};
use crate::modplan_path;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

// ============================================================================
// Main App Config
// ============================================================================

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Suffix of the staging directory the host extracts archives into
    pub working_suffix: String,
    /// Separator for destination paths in generated plans
    pub path_separator: char,
    pub ambiguity_policy: AmbiguityPolicy,
    /// Write a timestamped log under the data directory
    pub log_to_file: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            working_suffix: ".installing".to_string(),
            path_separator: '/',
            ambiguity_policy: AmbiguityPolicy::FirstMatch,
            log_to_file: true,
        }
    }
}

impl AppConfig {
    pub fn get_path() -> PathBuf {
        modplan_path!("config.json")
    }

    /// Directory log files are written to
    pub fn log_dir() -> PathBuf {
        modplan_path!("logs")
    }

    /// Load the user's config, falling back to defaults
    pub fn load() -> Self {
        let path = Self::get_path();
        if path.exists() {
            if let Ok(config) = Self::load_from(&path) {
                return config;
            }
        }
        Self::default()
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::get_path())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(io_err)
    }

    pub fn plan_options(&self) -> PlanOptions {
        PlanOptions::from(self)
    }
}
