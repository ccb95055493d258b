//! File-backed adapters for appshelf ports.
//!
//! - [`JsonFileCatalog`] reads the catalog from a JSON array document
//! - [`JsonPreferences`] stores boolean flags in a JSON object
//! - [`JsonSettingsRepository`] stores [`appshelf_core::Settings`]
//!
//! Writes go through a temp file in the target directory followed by a
//! rename, so readers never observe a half-written document.

mod atomic;
mod catalog;
mod preferences;
mod settings;

pub use catalog::JsonFileCatalog;
pub use preferences::JsonPreferences;
pub use settings::JsonSettingsRepository;
