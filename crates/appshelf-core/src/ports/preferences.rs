//! Persistent key/value flag storage.

use thiserror::Error;

/// Errors from the preferences store.
#[derive(Debug, Error)]
pub enum PreferencesError {
    /// Reading or writing the backing store failed.
    #[error("Preferences storage error: {0}")]
    Storage(String),

    /// The stored document is malformed.
    #[error("Preferences serialization error: {0}")]
    Serialization(String),
}

/// Durable boolean flags (e.g. `is_first_launch`).
///
/// Writes must be visible to subsequent reads from the same process.
pub trait PreferencesPort: Send + Sync {
    /// Read a flag. `Ok(None)` when it was never written.
    fn get_flag(&self, name: &str) -> Result<Option<bool>, PreferencesError>;

    /// Write a flag.
    fn set_flag(&self, name: &str, value: bool) -> Result<(), PreferencesError>;
}
