//! Catalog item type.

use serde::{Deserialize, Deserializer, Serialize};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// A catalog entry identifying one downloadable artifact.
///
/// Items are supplied by a catalog collaborator and are immutable for the
/// lifetime of a download. The serde field names follow the catalog
/// document (`packageName`, `apkUrl`, `sizeMb`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier (the package name).
    #[serde(rename = "packageName")]
    pub key: String,
    /// Human-readable name.
    #[serde(rename = "name")]
    pub display_name: String,
    /// Version string, used for artifact file naming.
    #[serde(default)]
    pub version: String,
    /// Short description shown in listings.
    #[serde(default)]
    pub description: String,
    /// Optional icon URL.
    #[serde(rename = "iconUrl", default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    /// Where the artifact is fetched from.
    #[serde(rename = "apkUrl")]
    pub source_url: String,
    /// Approximate artifact size in bytes (catalog stores megabytes).
    #[serde(
        rename = "sizeMb",
        default,
        deserialize_with = "megabytes_to_bytes",
        serialize_with = "bytes_to_megabytes",
        skip_serializing_if = "Option::is_none"
    )]
    pub expected_size_hint: Option<u64>,
}

impl Item {
    /// Create an item with the fields the download path needs.
    pub fn new(
        key: impl Into<String>,
        display_name: impl Into<String>,
        source_url: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            display_name: display_name.into(),
            version: String::new(),
            description: String::new(),
            icon_url: None,
            source_url: source_url.into(),
            expected_size_hint: None,
        }
    }

    /// Set the version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Set the expected size hint in bytes.
    #[must_use]
    pub const fn with_size_hint(mut self, bytes: u64) -> Self {
        self.expected_size_hint = Some(bytes);
        self
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn megabytes_to_bytes<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let mb = Option::<f64>::deserialize(deserializer)?;
    Ok(mb
        .filter(|v| v.is_finite() && *v > 0.0)
        .map(|v| (v * BYTES_PER_MB).round() as u64))
}

#[allow(clippy::cast_precision_loss, clippy::ref_option)]
fn bytes_to_megabytes<S>(bytes: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match bytes {
        Some(b) => serializer.serialize_some(&(*b as f64 / BYTES_PER_MB)),
        None => serializer.serialize_none(),
    }
}
