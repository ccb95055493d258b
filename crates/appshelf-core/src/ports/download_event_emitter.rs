//! UI observer port.
//!
//! The progress bridge and completion handler report every job transition
//! here. Adapters decide how it reaches the user.

use crate::download::DownloadEvent;

/// Receives [`DownloadEvent`]s for all jobs.
///
/// Called once per progress event, so `emit` must return quickly and
/// never block on I/O.
pub trait DownloadEventEmitterPort: Send + Sync {
    fn emit(&self, event: DownloadEvent);
}
