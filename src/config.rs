//! Outliner configuration persistence
//!
//! Stores user preferences in `~/.config/outliner/config.yaml`

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::outline::{ScanOptions, ViewMode};

/// Configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineConfig {
    /// Initial view mode for markup outlines ("tree" or "essential")
    #[serde(default)]
    pub view_mode: ViewMode,

    /// Columns per tab when computing jump columns
    #[serde(default = "default_tab_size")]
    pub tab_size: usize,
}

fn default_tab_size() -> usize {
    4
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            view_mode: ViewMode::default(),
            tab_size: default_tab_size(),
        }
    }
}

impl OutlineConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from `path`, falling back to defaults on any failure
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

    /// Save config to `path`, creating parent directories as needed
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

    /// Scan options derived from this config
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            view_mode: self.view_mode,
            tab_size: self.tab_size,
        }
    }
}
