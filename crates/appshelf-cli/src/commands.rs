//! Subcommands for the appshelf CLI.

use appshelf_core::Permission;
use clap::Subcommand;

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the packages in the catalog
    List,

    /// Download a package by key and hand it to the installer
    Download {
        /// Package key, e.g. "com.example.notes"
        key: String,
        /// Keep the artifact on disk without installing it
        #[arg(long)]
        no_install: bool,
    },

    /// Show or change permission grants
    Permissions {
        #[command(subcommand)]
        command: Option<PermissionsCommand>,
    },

    /// View or change download settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },

    /// Show resolved paths for all appshelf files and directories
    Paths,
}

/// Permission subcommands. Defaults to `status`.
#[derive(Debug, Subcommand)]
pub enum PermissionsCommand {
    /// Show the onboarding state
    Status,

    /// Record a grant
    Grant {
        /// install, background or notifications
        permission: Permission,
    },

    /// Remove a grant
    Revoke {
        /// install, background or notifications
        permission: Permission,
    },
}

/// Settings subcommands.
#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Show all current settings
    Show,

    /// Update settings
    Set {
        /// Directory for downloaded artifacts
        #[arg(long)]
        download_dir: Option<String>,
        /// Catalog document path
        #[arg(long)]
        catalog_path: Option<String>,
        /// Artifact file extension (default "apk")
        #[arg(long)]
        artifact_extension: Option<String>,
        /// Minimum milliseconds between progress notifications
        #[arg(long)]
        notify_interval_ms: Option<u64>,
        /// Transfer buffer size in bytes (512-4194304)
        #[arg(long)]
        chunk_size: Option<usize>,
        /// Install artifacts after download
        #[arg(long)]
        auto_install: Option<bool>,
        /// Connect timeout in seconds
        #[arg(long)]
        connect_timeout_secs: Option<u64>,
        /// Per-read timeout in seconds
        #[arg(long)]
        read_timeout_secs: Option<u64>,
        /// Installer command; the artifact path is appended
        #[arg(long)]
        installer_command: Option<String>,
    },
}
