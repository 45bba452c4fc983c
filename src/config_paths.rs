//! Where outliner keeps its settings and diagnostics
//!
//! `config.yaml` and the rolling `logs/outliner.log` share one directory:
//! `$XDG_CONFIG_HOME/outliner` (or `~/.config/outliner`) on Unix and
//! `%APPDATA%\outliner` on Windows.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

const APP_DIR: &str = "outliner";
const CONFIG_FILE: &str = "config.yaml";
const LOGS_DIR: &str = "logs";

/// Directory holding `config.yaml` and `logs/`, if a home can be found
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var_os("APPDATA").map(|appdata| PathBuf::from(appdata).join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .map(|base| base.join(APP_DIR))
    }
}

/// Stored view mode and tab size
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE))
}

/// Create `logs/` under `base` and return it
pub fn logs_dir_in(base: &Path) -> Result<PathBuf, String> {
    let logs = base.join(LOGS_DIR);
    fs::create_dir_all(&logs)
        .map_err(|e| format!("Failed to create log directory {}: {}", logs.display(), e))?;
    Ok(logs)
}

/// Log directory for the tracing file layer, created on demand
pub fn ensure_logs_dir() -> Result<PathBuf, String> {
    let base = config_dir().ok_or_else(|| "No config directory available".to_string())?;
    logs_dir_in(&base)
}
