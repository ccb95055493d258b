//! Transfer progress and terminal outcomes.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::errors::DownloadError;
use super::types::DownloadKey;

/// Progress of a transfer: a floor percent when the total is known, or the
/// indeterminate marker when it is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferPercent {
    /// Integer percent in `[0, 100]`.
    Known(u8),
    /// Total length unknown.
    Indeterminate,
}

impl TransferPercent {
    /// Compute `floor(bytes * 100 / total)` clamped to `[0, 100]`.
    ///
    /// A missing or zero total yields [`TransferPercent::Indeterminate`].
    #[must_use]
    pub fn from_bytes(bytes: u64, total: Option<u64>) -> Self {
        match total {
            Some(total) if total > 0 => {
                let pct = (u128::from(bytes) * 100 / u128::from(total)).min(100);
                // Clamped to 100 above.
                #[allow(clippy::cast_possible_truncation)]
                Self::Known(pct as u8)
            }
            _ => Self::Indeterminate,
        }
    }

    /// The percent value, if known.
    #[must_use]
    pub const fn value(&self) -> Option<u8> {
        match self {
            Self::Known(p) => Some(*p),
            Self::Indeterminate => None,
        }
    }

    /// Whether this is a known 100%.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self, Self::Known(100))
    }
}

impl fmt::Display for TransferPercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(p) => write!(f, "{p}%"),
            Self::Indeterminate => f.write_str("…"),
        }
    }
}

/// One progress update for a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    /// Key of the job.
    pub key: DownloadKey,
    /// Current progress.
    pub percent: TransferPercent,
}

impl ProgressEvent {
    /// Create a progress event.
    #[must_use]
    pub const fn new(key: DownloadKey, percent: TransferPercent) -> Self {
        Self { key, percent }
    }
}

/// Lifecycle state of a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferState {
    /// Bytes are being copied.
    Running,
    /// Artifact written and closed.
    Succeeded,
    /// Stopped by an error.
    Failed,
    /// Stopped by cancellation.
    Cancelled,
}

impl TransferState {
    /// Whether the state is terminal.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// Terminal result of one transfer job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The artifact was fully written and closed.
    Success {
        /// Where the artifact lives.
        artifact: PathBuf,
        /// Bytes written.
        bytes: u64,
    },
    /// The transfer failed; any partial file has been removed.
    Failure(DownloadError),
    /// The transfer was cancelled; any partial file has been removed.
    Cancelled,
}

impl DownloadOutcome {
    /// Fold a result into an outcome, routing `DownloadError::Cancelled` to
    /// [`DownloadOutcome::Cancelled`].
    #[must_use]
    pub fn from_result(result: Result<(PathBuf, u64), DownloadError>) -> Self {
        match result {
            Ok((artifact, bytes)) => Self::Success { artifact, bytes },
            Err(DownloadError::Cancelled) => Self::Cancelled,
            Err(e) => Self::Failure(e),
        }
    }

    /// The terminal state this outcome represents.
    #[must_use]
    pub const fn state(&self) -> TransferState {
        match self {
            Self::Success { .. } => TransferState::Succeeded,
            Self::Failure(_) => TransferState::Failed,
            Self::Cancelled => TransferState::Cancelled,
        }
    }

    /// User-facing failure reason, if not a success.
    #[must_use]
    pub fn reason(&self) -> Option<String> {
        match self {
            Self::Success { .. } => None,
            Self::Failure(e) => Some(e.user_message()),
            Self::Cancelled => Some("Download cancelled".to_string()),
        }
    }

    /// Whether this is a success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}
