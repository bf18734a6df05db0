//! Centralized configuration paths for marknote
//!
//! All config files live under:
//! - Unix/macOS: `~/.config/marknote/`
//! - Windows: `%APPDATA%\marknote\`

use std::{env, fs, io, path::PathBuf};

const APP_DIR: &str = "marknote";

/// Prefix of the daily-rotated log files
pub const LOG_FILE_PREFIX: &str = "marknote.log";

/// Base config directory for marknote
///
/// Unix/macOS:
///   - If XDG_CONFIG_HOME is set: `$XDG_CONFIG_HOME/marknote`
///   - Else: `~/.config/marknote`
///
/// Windows:
///   - `%APPDATA%\marknote`
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|config| config.join(APP_DIR))
    }
}

/// `~/.config/marknote/config.yaml`
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

/// `~/.config/marknote/logs/`
pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

/// Create the logs directory (and its parents) if needed, returning it
pub fn ensure_logs_dir() -> io::Result<PathBuf> {
    let logs = logs_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no config directory available"))?;
    fs::create_dir_all(&logs)?;
    Ok(logs)
}
