//! Catalog backed by a JSON document.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use appshelf_core::{CatalogError, CatalogPort, Item};

/// Reads the catalog from a JSON array of items.
#[derive(Debug, Clone)]
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse a catalog document.
    pub fn parse(document: &str) -> Result<Vec<Item>, CatalogError> {
        serde_json::from_str(document).map_err(|e| CatalogError::Parse(e.to_string()))
    }
}

#[async_trait]
impl CatalogPort for JsonFileCatalog {
    async fn list(&self) -> Result<Vec<Item>, CatalogError> {
        let document = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => CatalogError::NotFound(self.path.display().to_string()),
                _ => CatalogError::Io(format!("{}: {e}", self.path.display())),
            })?;
        let items = Self::parse(&document)?;
        debug!(path = %self.path.display(), count = items.len(), "Loaded catalog");
        Ok(items)
    }
}
