//! Settings command handler.

use anyhow::Result;

use appshelf_core::{Settings, SettingsUpdate};

use crate::bootstrap::CliContext;
use crate::commands::SettingsCommand;
use crate::error::CliError;

/// Execute a settings subcommand.
pub fn execute(ctx: &CliContext, command: SettingsCommand) -> Result<()> {
    match command {
        SettingsCommand::Show => {
            println!("Current settings ({}):", ctx.paths().settings_path.display());
            print_settings(ctx.settings());
            Ok(())
        }
        SettingsCommand::Set {
            download_dir,
            catalog_path,
            artifact_extension,
            notify_interval_ms,
            chunk_size,
            auto_install,
            connect_timeout_secs,
            read_timeout_secs,
            installer_command,
        } => {
            let update = SettingsUpdate {
                download_dir: download_dir.map(Some),
                catalog_path: catalog_path.map(Some),
                artifact_extension: artifact_extension.map(Some),
                notify_interval_ms: notify_interval_ms.map(Some),
                chunk_size: chunk_size.map(Some),
                auto_install: auto_install.map(Some),
                connect_timeout_secs: connect_timeout_secs.map(Some),
                read_timeout_secs: read_timeout_secs.map(Some),
                installer_command: installer_command.map(Some),
            };
            if is_empty(&update) {
                println!("No settings provided. Use --help to see available options.");
                return Ok(());
            }

            let updated = ctx
                .settings_service
                .update(&update)
                .map_err(CliError::from)?;
            println!("✓ Settings updated successfully:");
            print_settings(&updated);
            Ok(())
        }
    }
}

const fn is_empty(update: &SettingsUpdate) -> bool {
    update.download_dir.is_none()
        && update.catalog_path.is_none()
        && update.artifact_extension.is_none()
        && update.notify_interval_ms.is_none()
        && update.chunk_size.is_none()
        && update.auto_install.is_none()
        && update.connect_timeout_secs.is_none()
        && update.read_timeout_secs.is_none()
        && update.installer_command.is_none()
}

fn print_settings(settings: &Settings) {
    println!("  download_dir:         {:?}", settings.download_dir);
    println!("  catalog_path:         {:?}", settings.catalog_path);
    println!("  artifact_extension:   {}", settings.effective_artifact_extension());
    println!("  notify_interval_ms:   {}", settings.effective_notify_interval().as_millis());
    println!("  chunk_size:           {}", settings.effective_chunk_size());
    println!("  auto_install:         {}", settings.effective_auto_install());
    println!("  connect_timeout_secs: {}", settings.effective_connect_timeout().as_secs());
    println!("  read_timeout_secs:    {}", settings.effective_read_timeout().as_secs());
    println!("  installer_command:    {:?}", settings.installer_command);
}
