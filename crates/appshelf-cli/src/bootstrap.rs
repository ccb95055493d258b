//! CLI bootstrap - the composition root.
//!
//! This module is the only place where concrete adapters are chosen:
//! - JSON stores for settings, preferences and the catalog (via appshelf-store)
//! - Console notifier, command installer and preference-backed grants (via crate::adapters)
//! - The reqwest transport and download manager (via appshelf-download)
//!
//! Command handlers receive the composed [`CliContext`].

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use appshelf_core::{
    CatalogService, DirectoryCreationStrategy, OnboardingService, ResolvedPaths, Settings,
    SettingsService, ensure_directory, validate_settings,
};
use appshelf_download::{
    DownloadBoard, DownloadManager, DownloadManagerConfig, DownloadManagerDeps, ReqwestTransport,
    TransportConfig, build_download_manager,
};
use appshelf_store::{JsonFileCatalog, JsonPreferences, JsonSettingsRepository};

use crate::adapters::{CommandInstaller, ConsoleNotifier, PreferencePermissions};

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Data root override (`--data-dir`).
    pub data_dir: Option<PathBuf>,
    /// Overrides the `auto_install` setting for this invocation.
    pub auto_install: Option<bool>,
}

impl CliConfig {
    pub fn new(data_dir: Option<PathBuf>) -> Self {
        Self {
            data_dir,
            auto_install: None,
        }
    }

    #[must_use]
    pub const fn with_auto_install(mut self, auto_install: bool) -> Self {
        self.auto_install = Some(auto_install);
        self
    }
}

/// Fully composed application context for CLI commands.
pub struct CliContext {
    pub paths: ResolvedPaths,
    pub settings: Settings,
    pub settings_service: SettingsService,
    pub catalog: CatalogService,
    pub onboarding: OnboardingService,
    pub permissions: Arc<PreferencePermissions>,
    pub notifier: Arc<ConsoleNotifier>,
    pub board: DownloadBoard,
    pub downloads: Arc<DownloadManager>,
}

impl CliContext {
    pub const fn paths(&self) -> &ResolvedPaths {
        &self.paths
    }

    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    pub const fn catalog(&self) -> &CatalogService {
        &self.catalog
    }

    pub const fn onboarding(&self) -> &OnboardingService {
        &self.onboarding
    }

    pub const fn downloads(&self) -> &Arc<DownloadManager> {
        &self.downloads
    }
}

/// Bootstrap the CLI application.
///
/// Resolves the data root, loads and validates settings, then wires every
/// adapter. The data root is created if missing.
pub fn bootstrap(config: CliConfig) -> Result<CliContext> {
    let paths = ResolvedPaths::resolve(config.data_dir.as_deref())?;
    ensure_directory(&paths.data_root, DirectoryCreationStrategy::AutoCreate)?;

    let settings_service =
        SettingsService::new(Arc::new(JsonSettingsRepository::new(paths.settings_path.clone())));
    let settings = settings_service.get()?;
    validate_settings(&settings)?;
    let paths = paths.with_settings(&settings);
    debug!(data_root = %paths.data_root.display(), "Resolved paths");

    let preferences = Arc::new(JsonPreferences::new(paths.preferences_path.clone()));
    let permissions = Arc::new(PreferencePermissions::new(preferences.clone()));
    let catalog = CatalogService::new(Arc::new(JsonFileCatalog::new(paths.catalog_path.clone())));
    let onboarding = OnboardingService::new(preferences, permissions.clone());

    let transport = ReqwestTransport::new(
        &TransportConfig::new()
            .with_connect_timeout(settings.effective_connect_timeout())
            .with_read_timeout(settings.effective_read_timeout()),
    )?;
    let notifier = Arc::new(ConsoleNotifier::new());
    let installer = Arc::new(CommandInstaller::new(settings.installer_command.clone()));
    let board = DownloadBoard::new();

    let mut manager_config =
        DownloadManagerConfig::from_settings(&settings, paths.download_dir.clone());
    if let Some(auto_install) = config.auto_install {
        manager_config = manager_config.with_auto_install(auto_install);
    }

    let downloads = Arc::new(build_download_manager(DownloadManagerDeps {
        transport: Arc::new(transport),
        permissions: permissions.clone(),
        notifier: notifier.clone(),
        installer,
        event_emitter: Arc::new(board.clone()),
        config: manager_config,
    }));

    Ok(CliContext {
        paths,
        settings,
        settings_service,
        catalog,
        onboarding,
        permissions,
        notifier,
        board,
        downloads,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use tokio_test::assert_ok;

    #[test]
    fn bootstrap_creates_data_root_and_uses_defaults() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("shelf");

        let ctx = assert_ok!(bootstrap(CliConfig::new(Some(root.clone()))));

        assert!(root.is_dir());
        assert_eq!(ctx.paths().download_dir, root.join("downloads"));
        assert!(ctx.downloads().config().auto_install);
        assert_eq!(ctx.downloads().config().artifact_extension, "apk");
    }

    #[test]
    fn auto_install_override_wins() {
        let dir = tempdir().unwrap();
        let ctx = assert_ok!(bootstrap(
            CliConfig::new(Some(dir.path().to_path_buf())).with_auto_install(false)
        ));
        assert!(!ctx.downloads().config().auto_install);
    }

    #[test]
    fn invalid_settings_file_is_rejected() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("settings.json"), r#"{"chunk_size": 1}"#).unwrap();

        let result = bootstrap(CliConfig::new(Some(dir.path().to_path_buf())));
        assert!(result.is_err());
    }
}
