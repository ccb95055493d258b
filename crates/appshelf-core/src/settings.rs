//! Settings domain types and validation.
//!
//! Pure data with no infrastructure dependencies; persistence lives behind
//! [`crate::ports::SettingsRepository`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default transfer buffer size in bytes.
pub const DEFAULT_CHUNK_SIZE: usize = 8192;

/// Default minimum interval between OS notifications for one key.
pub const DEFAULT_NOTIFY_INTERVAL_MS: u64 = 500;

/// Default artifact file extension.
pub const DEFAULT_ARTIFACT_EXTENSION: &str = "apk";

const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_READ_TIMEOUT_SECS: u64 = 60;
const MIN_CHUNK_SIZE: usize = 512;
const MAX_CHUNK_SIZE: usize = 4 * 1024 * 1024;

/// Application settings.
///
/// All fields are optional so stored documents can be partial.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory for downloaded artifacts.
    pub download_dir: Option<String>,

    /// Location of the catalog document.
    pub catalog_path: Option<String>,

    /// Extension appended to artifact file names (no leading dot).
    pub artifact_extension: Option<String>,

    /// Minimum milliseconds between non-forced notifications per key.
    pub notify_interval_ms: Option<u64>,

    /// Transfer buffer size in bytes.
    pub chunk_size: Option<usize>,

    /// Hand finished artifacts to the installer automatically.
    pub auto_install: Option<bool>,

    /// HTTP connect timeout in seconds.
    pub connect_timeout_secs: Option<u64>,

    /// HTTP read timeout in seconds.
    pub read_timeout_secs: Option<u64>,

    /// External installer program; receives the artifact path as its argument.
    pub installer_command: Option<String>,
}

impl Settings {
    /// Settings with every default filled in.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            download_dir: None,
            catalog_path: None,
            artifact_extension: Some(DEFAULT_ARTIFACT_EXTENSION.to_string()),
            notify_interval_ms: Some(DEFAULT_NOTIFY_INTERVAL_MS),
            chunk_size: Some(DEFAULT_CHUNK_SIZE),
            auto_install: Some(true),
            connect_timeout_secs: Some(DEFAULT_CONNECT_TIMEOUT_SECS),
            read_timeout_secs: Some(DEFAULT_READ_TIMEOUT_SECS),
            installer_command: None,
        }
    }

    /// Artifact extension with default fallback.
    #[must_use]
    pub fn effective_artifact_extension(&self) -> &str {
        self.artifact_extension
            .as_deref()
            .unwrap_or(DEFAULT_ARTIFACT_EXTENSION)
    }

    /// Notification interval with default fallback.
    #[must_use]
    pub fn effective_notify_interval(&self) -> Duration {
        Duration::from_millis(
            self.notify_interval_ms
                .unwrap_or(DEFAULT_NOTIFY_INTERVAL_MS),
        )
    }

    /// Chunk size with default fallback.
    #[must_use]
    pub fn effective_chunk_size(&self) -> usize {
        self.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE)
    }

    /// Auto-install flag with default fallback.
    #[must_use]
    pub fn effective_auto_install(&self) -> bool {
        self.auto_install.unwrap_or(true)
    }

    /// Connect timeout with default fallback.
    #[must_use]
    pub fn effective_connect_timeout(&self) -> Duration {
        Duration::from_secs(
            self.connect_timeout_secs
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
        )
    }

    /// Read timeout with default fallback.
    #[must_use]
    pub fn effective_read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs.unwrap_or(DEFAULT_READ_TIMEOUT_SECS))
    }

    /// Merge an update into this one, only touching fields that are `Some`.
    pub fn merge(&mut self, other: &SettingsUpdate) {
        if let Some(ref dir) = other.download_dir {
            self.download_dir.clone_from(dir);
        }
        if let Some(ref path) = other.catalog_path {
            self.catalog_path.clone_from(path);
        }
        if let Some(ref ext) = other.artifact_extension {
            self.artifact_extension.clone_from(ext);
        }
        if let Some(interval) = other.notify_interval_ms {
            self.notify_interval_ms = interval;
        }
        if let Some(size) = other.chunk_size {
            self.chunk_size = size;
        }
        if let Some(flag) = other.auto_install {
            self.auto_install = flag;
        }
        if let Some(secs) = other.connect_timeout_secs {
            self.connect_timeout_secs = secs;
        }
        if let Some(secs) = other.read_timeout_secs {
            self.read_timeout_secs = secs;
        }
        if let Some(ref cmd) = other.installer_command {
            self.installer_command.clone_from(cmd);
        }
    }
}

/// Partial settings update.
///
/// Each field is `Option<Option<T>>`:
/// - `None` = don't change this field
/// - `Some(None)` = clear the field
/// - `Some(Some(value))` = set the field
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub download_dir: Option<Option<String>>,
    pub catalog_path: Option<Option<String>>,
    pub artifact_extension: Option<Option<String>>,
    pub notify_interval_ms: Option<Option<u64>>,
    pub chunk_size: Option<Option<usize>>,
    pub auto_install: Option<Option<bool>>,
    pub connect_timeout_secs: Option<Option<u64>>,
    pub read_timeout_secs: Option<Option<u64>>,
    pub installer_command: Option<Option<String>>,
}

/// Settings validation or persistence error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SettingsError {
    #[error("Chunk size must be between 512 and 4194304 bytes, got {0}")]
    InvalidChunkSize(usize),

    #[error("Artifact extension must be non-empty alphanumeric, got '{0}'")]
    InvalidExtension(String),

    #[error("Timeout must be at least 1 second")]
    InvalidTimeout,

    #[error("{0} cannot be empty")]
    EmptyPath(&'static str),

    #[error("Settings storage error: {0}")]
    Storage(String),
}

/// Validate settings values.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    if let Some(size) = settings.chunk_size {
        if !(MIN_CHUNK_SIZE..=MAX_CHUNK_SIZE).contains(&size) {
            return Err(SettingsError::InvalidChunkSize(size));
        }
    }

    if let Some(ref ext) = settings.artifact_extension {
        if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(SettingsError::InvalidExtension(ext.clone()));
        }
    }

    if settings.connect_timeout_secs == Some(0) || settings.read_timeout_secs == Some(0) {
        return Err(SettingsError::InvalidTimeout);
    }

    if settings
        .download_dir
        .as_ref()
        .is_some_and(|p| p.trim().is_empty())
    {
        return Err(SettingsError::EmptyPath("Download directory"));
    }

    if settings
        .catalog_path
        .as_ref()
        .is_some_and(|p| p.trim().is_empty())
    {
        return Err(SettingsError::EmptyPath("Catalog path"));
    }

    Ok(())
}
