//! Catalog source port.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::Item;

/// Errors from loading the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The catalog document does not exist.
    #[error("Catalog not found: {0}")]
    NotFound(String),

    /// The catalog could not be read.
    #[error("Catalog read failed: {0}")]
    Io(String),

    /// The catalog document is malformed.
    #[error("Catalog parse failed: {0}")]
    Parse(String),
}

/// Source of catalog items.
#[async_trait]
pub trait CatalogPort: Send + Sync {
    /// Load every item in the catalog.
    async fn list(&self) -> Result<Vec<Item>, CatalogError>;
}
