//! Directory creation and verification.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use super::error::PathError;

const WRITE_TEST_FILE: &str = ".appshelf_write_test";

/// How to handle a missing directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirectoryCreationStrategy {
    /// Create the directory (and parents) if missing.
    #[default]
    AutoCreate,
    /// Return an error if missing.
    Disallow,
}

/// Ensure `path` exists as a writable directory.
pub fn ensure_directory(path: &Path, strategy: DirectoryCreationStrategy) -> Result<(), PathError> {
    if path.exists() {
        if !path.is_dir() {
            return Err(PathError::NotADirectory(path.to_path_buf()));
        }
    } else {
        match strategy {
            DirectoryCreationStrategy::AutoCreate => {
                fs::create_dir_all(path).map_err(|e| PathError::CreateFailed {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })?;
            }
            DirectoryCreationStrategy::Disallow => {
                return Err(PathError::DirectoryNotFound(path.to_path_buf()));
            }
        }
    }

    verify_writable(path)
}

/// Verify a directory is writable by creating and removing a scratch file.
pub fn verify_writable(path: &Path) -> Result<(), PathError> {
    let scratch = path.join(WRITE_TEST_FILE);
    let not_writable = |reason: String| PathError::NotWritable {
        path: path.to_path_buf(),
        reason,
    };

    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&scratch)
        .map_err(|e| not_writable(e.to_string()))?;
    file.write_all(b"ok").map_err(|e| not_writable(e.to_string()))?;
    drop(file);
    let _ = fs::remove_file(&scratch);
    Ok(())
}
