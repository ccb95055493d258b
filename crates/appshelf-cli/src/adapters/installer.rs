//! Installer that runs a configured external command.
//!
//! The command line from settings is split on whitespace and the artifact
//! path is appended as the last argument. With no command configured the
//! artifact is left in place and its location logged.

use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::info;

use appshelf_core::{InstallError, InstallerPort};

/// [`InstallerPort`] spawning an external command.
#[derive(Debug, Clone, Default)]
pub struct CommandInstaller {
    command: Option<String>,
}

impl CommandInstaller {
    pub fn new(command: Option<String>) -> Self {
        let command = command
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        Self { command }
    }

    pub fn command(&self) -> Option<&str> {
        self.command.as_deref()
    }
}

#[async_trait]
impl InstallerPort for CommandInstaller {
    async fn install(&self, artifact: &Path) -> Result<(), InstallError> {
        if !artifact.is_file() {
            return Err(InstallError::NotFound(artifact.display().to_string()));
        }

        let Some(command) = self.command.as_deref() else {
            info!(path = %artifact.display(), "No installer command configured, artifact kept");
            return Ok(());
        };

        let mut parts = command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| InstallError::Failed("Installer command is empty".to_string()))?;

        info!(program, path = %artifact.display(), "Running installer");
        let status = Command::new(program)
            .args(parts)
            .arg(artifact)
            .status()
            .await
            .map_err(|e| InstallError::Failed(format!("Failed to run {program}: {e}")))?;

        if status.success() {
            Ok(())
        } else {
            Err(InstallError::Failed(format!("{program} exited with {status}")))
        }
    }
}
