//! Settings repository trait definition.

use crate::settings::{Settings, SettingsError};

/// Repository for application settings persistence.
///
/// Implementations handle serialization internally.
pub trait SettingsRepository: Send + Sync {
    /// Load settings. Returns defaults if none are stored.
    fn load(&self) -> Result<Settings, SettingsError>;

    /// Save settings, replacing what was stored.
    fn save(&self, settings: &Settings) -> Result<(), SettingsError>;
}
