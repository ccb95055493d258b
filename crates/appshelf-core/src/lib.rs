//! Core domain types, ports and services for appshelf.
//!
//! This crate has no networking or runtime dependencies. Adapters
//! (`appshelf-download`, `appshelf-store`, `appshelf-cli`) depend on it,
//! never the other way around.

pub mod domain;
pub mod download;
pub mod paths;
pub mod ports;
pub mod services;
pub mod settings;
pub mod utils;

// Re-export commonly used types at crate root
pub use domain::{Item, Permission};
pub use download::{
    DownloadError, DownloadEvent, DownloadKey, DownloadOutcome, ProgressEvent,
    TransferPercent, TransferState,
};
pub use ports::{
    CatalogError, CatalogPort, DownloadEventEmitterPort, InstallError, InstallerPort,
    NotificationId, NotificationPort, NotificationProgress, PermissionError,
    PermissionPort, PreferencesError, PreferencesPort, SettingsRepository,
};
pub use services::{
    CatalogService, CatalogView, OnboardingError, OnboardingService, OnboardingState,
    SettingsService,
};
pub use settings::{
    DEFAULT_ARTIFACT_EXTENSION, DEFAULT_CHUNK_SIZE, DEFAULT_NOTIFY_INTERVAL_MS, Settings,
    SettingsError, SettingsUpdate, validate_settings,
};
pub use utils::{artifact_file_name, sanitize_component};

// Re-export path utilities
pub use paths::{
    DATA_DIR_ENV, DirectoryCreationStrategy, PathError, ResolvedPaths, data_root,
    default_catalog_path, default_download_dir, ensure_directory, preferences_path,
    settings_path, verify_writable,
};
