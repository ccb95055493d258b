//! OS notification port.

use std::fmt;

/// Identifies a notification slot. One slot per download key, so repeated
/// updates replace the previous notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationId(pub i32);

impl NotificationId {
    /// Stable id derived from a download key (31-multiplier string hash).
    #[must_use]
    pub fn for_key(key: &str) -> Self {
        let hash = key
            .encode_utf16()
            .fold(0_i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)));
        Self(hash)
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Progress indicator rendered in a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationProgress {
    /// Determinate bar at the given percent.
    Percent(u8),
    /// Indeterminate spinner.
    Indeterminate,
    /// No progress indicator.
    None,
}

/// Posts, updates and removes OS notifications.
pub trait NotificationPort: Send + Sync {
    /// Post or replace the notification in slot `id`.
    fn show(&self, id: NotificationId, title: &str, text: &str, progress: NotificationProgress);

    /// Remove the notification in slot `id`, if any.
    fn cancel(&self, id: NotificationId);
}
