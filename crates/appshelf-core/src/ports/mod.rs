//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces the core expects from the host: the catalog
//! source, preference storage, permission grants, OS notifications, the
//! package installer and the UI event sink. They use only domain types.

pub mod catalog;
pub mod download_event_emitter;
pub mod installer;
pub mod notification;
pub mod permissions;
pub mod preferences;
pub mod settings_repository;

pub use catalog::{CatalogError, CatalogPort};
pub use download_event_emitter::DownloadEventEmitterPort;
pub use installer::{InstallError, InstallerPort};
pub use notification::{NotificationId, NotificationPort, NotificationProgress};
pub use permissions::{PermissionError, PermissionPort};
pub use preferences::{PreferencesError, PreferencesPort};
pub use settings_repository::SettingsRepository;

#[cfg(any(test, feature = "test-utils"))]
pub use installer::MockInstallerPort;
#[cfg(any(test, feature = "test-utils"))]
pub use permissions::MockPermissionPort;
