//! Catalog loading for listing screens.

use std::sync::Arc;

use tracing::warn;

use crate::domain::Item;
use crate::ports::{CatalogError, CatalogPort};

/// What a listing screen renders: the items, or an error line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogView {
    /// Loaded items (empty on failure).
    pub items: Vec<Item>,
    /// Set when loading failed.
    pub error_message: Option<String>,
    /// The failure behind `error_message`.
    pub error: Option<CatalogError>,
}

impl CatalogView {
    /// Look up an item by key.
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.key == key)
    }
}

/// Loads the catalog and folds failures into a [`CatalogView`].
pub struct CatalogService {
    catalog: Arc<dyn CatalogPort>,
}

impl CatalogService {
    pub fn new(catalog: Arc<dyn CatalogPort>) -> Self {
        Self { catalog }
    }

    /// Load items. Never fails; errors become `error_message`.
    pub async fn load(&self) -> CatalogView {
        match self.catalog.list().await {
            Ok(items) => CatalogView {
                items,
                ..CatalogView::default()
            },
            Err(e) => {
                warn!(error = %e, "Catalog load failed");
                CatalogView {
                    items: Vec::new(),
                    error_message: Some(format!("Failed to load apps: {e}")),
                    error: Some(e),
                }
            }
        }
    }
}
