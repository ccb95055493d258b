//! Settings service - validated reads and writes over the repository.

use std::sync::Arc;

use crate::ports::SettingsRepository;
use crate::settings::{Settings, SettingsError, SettingsUpdate, validate_settings};

/// Service for settings operations.
pub struct SettingsService {
    repo: Arc<dyn SettingsRepository>,
}

impl SettingsService {
    /// Create a new settings service.
    pub fn new(repo: Arc<dyn SettingsRepository>) -> Self {
        Self { repo }
    }

    /// Current settings.
    pub fn get(&self) -> Result<Settings, SettingsError> {
        self.repo.load()
    }

    /// Apply a partial update, validate, then persist.
    pub fn update(&self, update: &SettingsUpdate) -> Result<Settings, SettingsError> {
        let mut current = self.repo.load()?;
        current.merge(update);
        validate_settings(&current)?;
        self.repo.save(&current)?;
        Ok(current)
    }
}
