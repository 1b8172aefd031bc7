//! Per-user application directories.
//!
//! - macOS: ~/Library/Application Support/caspier/{logs,exports}
//! - Linux: $XDG_DATA_HOME/caspier or ~/.local/share/caspier
//! - Windows: %APPDATA%\caspier

use std::path::PathBuf;

const APP_NAME: &str = "caspier";
const LOG_DIR: &str = "logs";
const EXPORT_DIR: &str = "exports";

fn get_app_data_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        std::env::var("HOME").ok().map(|home| {
            PathBuf::from(home)
                .join("Library/Application Support")
                .join(APP_NAME)
        })
    }

    #[cfg(target_os = "linux")]
    {
        if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
            Some(PathBuf::from(xdg).join(APP_NAME))
        } else {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".local/share").join(APP_NAME))
        }
    }

    #[cfg(target_os = "windows")]
    {
        std::env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_NAME))
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        None
    }
}

pub fn get_log_dir() -> Option<PathBuf> {
    get_app_data_dir().map(|p| p.join(LOG_DIR))
}

/// Where exported workspace archives are written.
pub fn get_export_dir() -> Option<PathBuf> {
    get_app_data_dir().map(|p| p.join(EXPORT_DIR))
}

pub fn ensure_log_dir() -> std::io::Result<PathBuf> {
    ensure_dir(get_log_dir(), "Cannot determine log directory")
}

pub fn ensure_export_dir() -> std::io::Result<PathBuf> {
    ensure_dir(get_export_dir(), "Cannot determine export directory")
}

fn ensure_dir(dir: Option<PathBuf>, missing: &'static str) -> std::io::Result<PathBuf> {
    let dir = dir.ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, missing))?;
    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
    }
    Ok(dir)
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/app_dirs.rs"]
mod tests;
