//! Editor configuration persistence
//!
//! Stores user preferences in `~/.config/marknote/config.yaml`

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::bridge::OcrClient;
use crate::model::{FileFilters, ViewMode, DEFAULT_HISTORY_LIMIT};
use crate::search::SearchOptions;

/// Default outline refresh delay after the last edit
pub const DEFAULT_OUTLINE_DEBOUNCE_MS: u64 = 300;

/// Where OCR requests are sent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:5000/ocr".to_string(),
            timeout_secs: 30,
        }
    }
}

impl OcrConfig {
    pub fn client(&self) -> OcrClient {
        OcrClient::new(self.endpoint.clone(), Duration::from_secs(self.timeout_secs))
    }
}

/// Editor configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Options the find bar starts with
    pub search: SearchOptions,
    /// View mode at startup
    pub view_mode: ViewMode,
    pub outline_debounce_ms: u64,
    /// Undo steps kept per tab
    pub history_limit: usize,
    /// Reload open files when they change on disk
    pub watch_files: bool,
    pub ocr: OcrConfig,
    pub file_filters: FileFilters,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            search: SearchOptions::default(),
            view_mode: ViewMode::default(),
            outline_debounce_ms: DEFAULT_OUTLINE_DEBOUNCE_MS,
            history_limit: DEFAULT_HISTORY_LIMIT,
            watch_files: true,
            ocr: OcrConfig::default(),
            file_filters: FileFilters::default(),
        }
    }
}

impl EditorConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load from an explicit path. Missing or invalid files give defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    /// Save config to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn outline_debounce(&self) -> Duration {
        Duration::from_millis(self.outline_debounce_ms)
    }
}
