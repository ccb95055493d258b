//! Artifact file naming.
//!
//! Artifacts are stored as `{key}_{version}.{ext}` where both components
//! have every character outside `[A-Za-z0-9._-]` replaced by `_`.

/// Replace every character outside `[A-Za-z0-9._-]` with `_`.
///
/// Replacement is per character, so multi-byte characters become a single
/// underscore.
#[must_use]
pub fn sanitize_component(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Build the artifact file name for an item.
///
/// `extension` is given without the leading dot.
#[must_use]
pub fn artifact_file_name(key: &str, version: &str, extension: &str) -> String {
    format!(
        "{}_{}.{}",
        sanitize_component(key),
        sanitize_component(version),
        extension.trim_start_matches('.')
    )
}
