//! Download domain types: keys, errors, events and outcomes.
//!
//! These types carry no runtime dependencies so they can cross every
//! adapter boundary (CLI, UI bridges, tests).

mod errors;
mod events;
mod outcome;
mod types;

pub use errors::DownloadError;
pub use events::DownloadEvent;
pub use outcome::{DownloadOutcome, ProgressEvent, TransferPercent, TransferState};
pub use types::DownloadKey;
