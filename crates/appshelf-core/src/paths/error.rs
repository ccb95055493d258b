//! Errors from locating and preparing the data root.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PathError {
    /// Neither `APPSHELF_DATA_DIR` nor a platform data directory is available.
    #[error("Cannot determine system data directory")]
    NoDataDir,

    #[error("{0} exists but is not a directory")]
    NotADirectory(PathBuf),

    /// Returned under [`super::DirectoryCreationStrategy::Disallow`].
    #[error("Directory {0} does not exist")]
    DirectoryNotFound(PathBuf),

    #[error("Failed to create directory {path}: {reason}")]
    CreateFailed { path: PathBuf, reason: String },

    /// The write check in [`super::verify_writable`] failed.
    #[error("Directory {path} is not writable: {reason}")]
    NotWritable { path: PathBuf, reason: String },
}
