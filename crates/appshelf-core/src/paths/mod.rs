//! Centralized path resolution for appshelf.
//!
//! Every on-disk location (settings, preferences, catalog, downloaded
//! artifacts) is derived from [`data_root`].

mod ensure;
mod error;
mod platform;
mod resolver;

#[cfg(test)]
pub(crate) mod test_utils;

pub use ensure::{DirectoryCreationStrategy, ensure_directory, verify_writable};
pub use error::PathError;
pub use platform::{
    DATA_DIR_ENV, data_root, default_catalog_path, default_download_dir, preferences_path,
    settings_path,
};
pub use resolver::ResolvedPaths;
