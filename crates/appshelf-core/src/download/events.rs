//! Download events: a discriminated union of every UI-visible state change.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::outcome::TransferPercent;
use super::types::DownloadKey;

/// Single discriminated union for all download events.
///
/// Serialized with a `type` tag so UI adapters can switch on it:
///
/// ```text
///   { "type": "download_started", "key": "..." }
///   { "type": "download_progress", "key": "...", "percent": { "known": 42 } }
///   { "type": "download_completed", "key": "...", "path": "..." }
///   { "type": "download_failed", "key": "...", "error": "..." }
///   { "type": "download_cancelled", "key": "..." }
///   { "type": "download_rejected", "key": "...", "reason": "..." }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DownloadEvent {
    /// A job was admitted and the transfer is starting.
    DownloadStarted {
        /// Key of the download.
        key: DownloadKey,
        /// Display name of the item.
        display_name: String,
    },

    /// Progress update. Emitted once per chunk written.
    DownloadProgress {
        /// Key of the download.
        key: DownloadKey,
        /// Current percent or the indeterminate marker.
        percent: TransferPercent,
    },

    /// The artifact was fully written and closed.
    DownloadCompleted {
        /// Key of the download.
        key: DownloadKey,
        /// Location of the artifact.
        path: PathBuf,
    },

    /// The download failed.
    DownloadFailed {
        /// Key of the download.
        key: DownloadKey,
        /// Human-readable reason.
        error: String,
    },

    /// The download was cancelled.
    DownloadCancelled {
        /// Key of the download.
        key: DownloadKey,
    },

    /// A start request was ignored because a job for the key is active.
    DownloadRejected {
        /// Key of the download.
        key: DownloadKey,
        /// Why it was ignored.
        reason: String,
    },
}

impl DownloadEvent {
    /// Whether this event ends a job.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::DownloadCompleted { .. } | Self::DownloadFailed { .. } | Self::DownloadCancelled { .. }
        )
    }

    /// Create a progress event.
    #[must_use]
    pub const fn progress(key: DownloadKey, percent: TransferPercent) -> Self {
        Self::DownloadProgress { key, percent }
    }

    /// Create a failure event.
    pub fn failed(key: DownloadKey, error: impl Into<String>) -> Self {
        Self::DownloadFailed {
            key,
            error: error.into(),
        }
    }

    /// Create a rejection event.
    pub fn rejected(key: DownloadKey, reason: impl Into<String>) -> Self {
        Self::DownloadRejected {
            key,
            reason: reason.into(),
        }
    }
}
