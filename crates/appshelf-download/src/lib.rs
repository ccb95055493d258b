//! Download manager for appshelf.
//!
//! - `transport` - HTTP seam ([`HttpTransport`], [`ReqwestTransport`])
//! - `engine` - streaming transfer into a destination file
//! - `registry` - single running job per key
//! - `progress` - throttled notification bridge
//! - `completion` - terminal outcome handling and install hand-off
//! - `manager` - composition of the above behind [`DownloadManager`]
//! - `board` - UI-side progress state

// Re-export core types for convenience
pub use appshelf_core::download::{
    DownloadError, DownloadEvent, DownloadKey, DownloadOutcome, ProgressEvent, TransferPercent,
    TransferState,
};

mod board;
mod completion;
mod engine;
pub(crate) mod progress;
mod registry;
mod transport;

mod manager;

#[cfg(test)]
mod test_support;

pub use board::DownloadBoard;
pub use completion::CompletionHandler;
pub use engine::{TransferEngine, TransferRequest};
pub use manager::{
    DownloadHandle, DownloadManager, DownloadManagerConfig, DownloadManagerDeps, StartOutcome,
    build_download_manager,
};
pub use progress::{BridgeHandle, NotificationBridge, NotificationTexts, ProgressThrottle};
pub use registry::{Admission, JobRegistry, Lease};
pub use transport::{HttpTransport, ReqwestTransport, TransportConfig, TransportResponse};
