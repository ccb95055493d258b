//! Settings persisted as a JSON document.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use appshelf_core::{Settings, SettingsError, SettingsRepository};

use crate::atomic::write_atomic;

/// [`SettingsRepository`] backed by a JSON file.
#[derive(Debug, Clone)]
pub struct JsonSettingsRepository {
    path: PathBuf,
}

impl JsonSettingsRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsRepository for JsonSettingsRepository {
    fn load(&self) -> Result<Settings, SettingsError> {
        match std::fs::read_to_string(&self.path) {
            Ok(document) => serde_json::from_str(&document)
                .map_err(|e| SettingsError::Storage(format!("{}: {e}", self.path.display()))),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No settings file, using defaults");
                Ok(Settings::with_defaults())
            }
            Err(e) => Err(SettingsError::Storage(e.to_string())),
        }
    }

    fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        let document = serde_json::to_vec_pretty(settings)
            .map_err(|e| SettingsError::Storage(e.to_string()))?;
        write_atomic(&self.path, &document).map_err(|e| SettingsError::Storage(e.to_string()))
    }
}
