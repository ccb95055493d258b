//! Download identity.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::Item;

/// Identifies a download job. At most one job per key runs at a time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DownloadKey(String);

impl DownloadKey {
    /// Create a key from any string-like value.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The key of a catalog item.
    #[must_use]
    pub fn for_item(item: &Item) -> Self {
        Self(item.key.clone())
    }

    /// Borrow the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DownloadKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DownloadKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for DownloadKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for DownloadKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
