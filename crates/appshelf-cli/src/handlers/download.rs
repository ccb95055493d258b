//! Download command handler.
//!
//! Looks the key up in the catalog, starts the download and waits for the
//! terminal outcome. Ctrl-C requests cooperative cancellation. When the
//! artifact is handed to the installer the command waits for the installer
//! before returning.

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use appshelf_core::{DownloadKey, DownloadOutcome, Permission, PermissionPort};
use appshelf_download::StartOutcome;

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Execute the download command.
pub async fn execute(ctx: &CliContext, key: &str) -> Result<()> {
    let view = ctx.catalog().load().await;
    if let Some(err) = CliError::from_catalog(&view) {
        return Err(err.into());
    }
    let Some(item) = view.find(key).cloned() else {
        return Err(CliError::Arguments(format!("No app with key '{key}' in the catalog")).into());
    };

    let download_key = DownloadKey::for_item(&item);

    let handle = match ctx.downloads().start_download(&item) {
        StartOutcome::Admitted(handle) => handle,
        StartOutcome::AlreadyActive => {
            let message = ctx
                .board
                .message(&download_key)
                .unwrap_or_else(|| format!("{} download is already active.", item.display_name));
            return Err(CliError::Download(message).into());
        }
        StartOutcome::Refused(outcome) => {
            return into_result(ctx, &download_key, outcome).map_err(Into::into);
        }
    };

    println!(
        "Downloading {} {} to {}",
        item.display_name,
        item.version,
        handle.destination().display()
    );
    if !ctx.permissions.is_granted(Permission::NotificationPost) {
        println!("Notifications are off, progress is not shown.");
        println!("Enable with: appshelf permissions grant notifications");
    }

    let downloads = Arc::clone(ctx.downloads());
    let cancel_key = download_key.clone();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!(key = %cancel_key, "Interrupted, cancelling download");
            downloads.cancel_download(&cancel_key);
        }
    });

    let outcome = handle.wait().await;
    interrupt.abort();

    let installing = outcome.is_success() && ctx.downloads().config().auto_install;
    into_result(ctx, &download_key, outcome)?;

    if let Some(message) = ctx.board.message(&download_key) {
        println!("✓ {message}");
    }
    if installing {
        info!(key = %download_key, "Waiting for installer");
        ctx.downloads().wait_for_installs().await;
    }
    Ok(())
}

/// Map an outcome to the command result, preferring the board's status text.
fn into_result(
    ctx: &CliContext,
    key: &DownloadKey,
    outcome: DownloadOutcome,
) -> Result<(), CliError> {
    match outcome {
        DownloadOutcome::Success { .. } => Ok(()),
        DownloadOutcome::Failure(e) => Err(CliError::Download(
            ctx.board.message(key).unwrap_or_else(|| e.user_message()),
        )),
        DownloadOutcome::Cancelled => Err(CliError::Cancelled),
    }
}
