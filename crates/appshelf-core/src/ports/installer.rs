//! Package installer port.

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from handing an artifact to the installer.
#[derive(Debug, Error)]
pub enum InstallError {
    /// The artifact does not exist.
    #[error("Artifact not found: {0}")]
    NotFound(String),

    /// The installer refused or failed.
    #[error("Install failed: {0}")]
    Failed(String),
}

/// Hands a finished artifact to the host package installer.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait InstallerPort: Send + Sync {
    /// Begin installing the artifact at `artifact`.
    async fn install(&self, artifact: &Path) -> Result<(), InstallError>;
}
