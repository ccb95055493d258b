//! UI-side download state.
//!
//! [`DownloadBoard`] is an emitter adapter that keeps the latest percent of
//! every running download and the last status message per key.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use appshelf_core::{DownloadEvent, DownloadEventEmitterPort, DownloadKey, TransferPercent};

#[derive(Debug, Default)]
struct BoardState {
    progress: HashMap<DownloadKey, TransferPercent>,
    names: HashMap<DownloadKey, String>,
    messages: HashMap<DownloadKey, String>,
}

impl BoardState {
    fn name(&self, key: &DownloadKey) -> String {
        self.names
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    fn apply(&mut self, event: DownloadEvent) {
        match event {
            DownloadEvent::DownloadStarted { key, display_name } => {
                self.progress.insert(key.clone(), TransferPercent::Indeterminate);
                self.messages.remove(&key);
                self.names.insert(key, display_name);
            }
            DownloadEvent::DownloadProgress { key, percent } => {
                self.progress.insert(key, percent);
            }
            DownloadEvent::DownloadCompleted { key, path } => {
                self.progress.remove(&key);
                let message = format!("{} downloaded to {}", self.name(&key), path.display());
                self.messages.insert(key, message);
            }
            DownloadEvent::DownloadFailed { key, error } => {
                self.progress.remove(&key);
                let message = format!("Download failed for {}: {error}", self.name(&key));
                self.messages.insert(key, message);
            }
            DownloadEvent::DownloadCancelled { key } => {
                self.progress.remove(&key);
                let message = format!("Download cancelled for {}", self.name(&key));
                self.messages.insert(key, message);
            }
            DownloadEvent::DownloadRejected { key, reason } => {
                self.messages.insert(key, reason);
            }
        }
    }
}

/// Shared, cheaply clonable view of download state.
#[derive(Debug, Clone, Default)]
pub struct DownloadBoard {
    state: Arc<Mutex<BoardState>>,
}

impl DownloadBoard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BoardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current progress for `key`, if downloading.
    pub fn progress(&self, key: &DownloadKey) -> Option<TransferPercent> {
        self.lock().progress.get(key).copied()
    }

    /// Whether the board shows `key` as downloading.
    pub fn is_downloading(&self, key: &DownloadKey) -> bool {
        self.lock().progress.contains_key(key)
    }

    /// Last status message for `key`.
    pub fn message(&self, key: &DownloadKey) -> Option<String> {
        self.lock().messages.get(key).cloned()
    }

    /// All downloads in progress, sorted by key.
    pub fn snapshot(&self) -> Vec<(DownloadKey, TransferPercent)> {
        let mut entries: Vec<_> = self
            .lock()
            .progress
            .iter()
            .map(|(k, p)| (k.clone(), *p))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}

impl DownloadEventEmitterPort for DownloadBoard {
    fn emit(&self, event: DownloadEvent) {
        self.lock().apply(event);
    }
}
