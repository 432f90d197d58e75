use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Default API base URL, overridable via config file or `ANIVAULT_API_URL`.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api/v1";

/// Environment variable that overrides the configured API base URL.
pub const API_URL_ENV: &str = "ANIVAULT_API_URL";

/// Get the app data directory for the current platform
pub fn app_data_dir() -> PathBuf {
    // On desktop, use ./data directory
    PathBuf::from("./data")
}

/// Application configuration, persisted as TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the Anivault backend API
    pub api_url: String,
    /// Directory for persisted client state (credential file)
    pub data_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            data_dir: app_data_dir(),
        }
    }
}

impl AppConfig {
    /// Loads the configuration from `path`, falling back to defaults when
    /// the file does not exist. The `ANIVAULT_API_URL` environment variable
    /// takes precedence over both.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let mut config = if path.exists() {
            let contents = fs::read_to_string(path)?;
            toml::from_str(&contents).map_err(|e| AppError::Config(e.to_string()))?
        } else {
            Self::default()
        };

        if let Ok(url) = std::env::var(API_URL_ENV) {
            let trimmed = url.trim();
            if !trimmed.is_empty() {
                config.api_url = trimmed.to_string();
            }
        }

        Ok(config)
    }

    /// Persists the configuration to `path`.
    pub fn save(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))?;
        fs::write(path, contents)?;
        Ok(())
    }
}
