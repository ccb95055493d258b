//! All resolved on-disk locations in one struct.
//!
//! Used by the CLI composition root and the `appshelf paths` command.

use std::fmt;
use std::path::{Path, PathBuf};

use super::{PathError, data_root};
use crate::settings::Settings;

const DOWNLOADS_DIR: &str = "downloads";
const CATALOG_FILE: &str = "catalog.json";
const SETTINGS_FILE: &str = "settings.json";
const PREFERENCES_FILE: &str = "preferences.json";

/// Every path the application reads or writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    /// Root directory for application data.
    pub data_root: PathBuf,
    /// Settings document.
    pub settings_path: PathBuf,
    /// Preference flags document.
    pub preferences_path: PathBuf,
    /// Catalog document.
    pub catalog_path: PathBuf,
    /// Directory receiving downloaded artifacts.
    pub download_dir: PathBuf,
}

impl ResolvedPaths {
    /// Resolve from an explicit root, or from [`data_root`] when `None`.
    pub fn resolve(data_dir: Option<&Path>) -> Result<Self, PathError> {
        let root = match data_dir {
            Some(dir) => dir.to_path_buf(),
            None => data_root()?,
        };
        Ok(Self::under(root))
    }

    /// Default layout beneath `root`.
    #[must_use]
    pub fn under(root: PathBuf) -> Self {
        Self {
            settings_path: root.join(SETTINGS_FILE),
            preferences_path: root.join(PREFERENCES_FILE),
            catalog_path: root.join(CATALOG_FILE),
            download_dir: root.join(DOWNLOADS_DIR),
            data_root: root,
        }
    }

    /// Apply `download_dir` and `catalog_path` overrides from settings.
    ///
    /// Relative overrides are taken relative to the data root.
    #[must_use]
    pub fn with_settings(mut self, settings: &Settings) -> Self {
        if let Some(dir) = non_blank(settings.download_dir.as_deref()) {
            self.download_dir = self.data_root.join(dir);
        }
        if let Some(path) = non_blank(settings.catalog_path.as_deref()) {
            self.catalog_path = self.data_root.join(path);
        }
        self
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl fmt::Display for ResolvedPaths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "data_root = {}", self.data_root.display())?;
        writeln!(f, "settings_path = {}", self.settings_path.display())?;
        writeln!(f, "preferences_path = {}", self.preferences_path.display())?;
        writeln!(f, "catalog_path = {}", self.catalog_path.display())?;
        write!(f, "download_dir = {}", self.download_dir.display())
    }
}
