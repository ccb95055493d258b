//! Platform data directory resolution.

use std::env;
use std::path::PathBuf;

use super::error::PathError;

/// Environment variable overriding the data root.
pub const DATA_DIR_ENV: &str = "APPSHELF_DATA_DIR";

const APP_DIR: &str = "appshelf";

/// Root directory for application data.
///
/// Resolution order:
/// 1. `APPSHELF_DATA_DIR` environment variable
/// 2. System data directory (e.g. `~/.local/share/appshelf`)
pub fn data_root() -> Result<PathBuf, PathError> {
    if let Ok(path) = env::var(DATA_DIR_ENV) {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .ok_or(PathError::NoDataDir)
}

/// Default directory for downloaded artifacts.
pub fn default_download_dir() -> Result<PathBuf, PathError> {
    Ok(data_root()?.join("downloads"))
}

/// Default location of the catalog document.
pub fn default_catalog_path() -> Result<PathBuf, PathError> {
    Ok(data_root()?.join("catalog.json"))
}

/// Location of the settings file.
pub fn settings_path() -> Result<PathBuf, PathError> {
    Ok(data_root()?.join("settings.json"))
}

/// Location of the preferences file.
pub fn preferences_path() -> Result<PathBuf, PathError> {
    Ok(data_root()?.join("preferences.json"))
}
