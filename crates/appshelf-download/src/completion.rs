//! Terminal outcome handling.
//!
//! On success the artifact is handed to the installer on a detached task;
//! the caller is not blocked on installation. Detached installs are tracked
//! so a short-lived host can drain them before exiting. Failure and
//! cancellation are surfaced to the UI. Every outcome produces exactly one
//! terminal event. Partial files are the engine's to remove, never this
//! handler's: the destination may already belong to a newer job.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;
use tracing::{error, info, warn};

use appshelf_core::{
    DownloadEvent, DownloadEventEmitterPort, DownloadKey, DownloadOutcome, InstallerPort,
};

/// Reacts to a job's terminal outcome.
#[derive(Clone)]
pub struct CompletionHandler {
    installer: Arc<dyn InstallerPort>,
    emitter: Arc<dyn DownloadEventEmitterPort>,
    auto_install: bool,
    installs: TaskTracker,
    // Serializes close/wait/reopen on `installs`.
    draining: Arc<Mutex<()>>,
}

impl CompletionHandler {
    pub fn new(
        installer: Arc<dyn InstallerPort>,
        emitter: Arc<dyn DownloadEventEmitterPort>,
        auto_install: bool,
    ) -> Self {
        Self {
            installer,
            emitter,
            auto_install,
            installs: TaskTracker::new(),
            draining: Arc::new(Mutex::new(())),
        }
    }

    /// Wait until every install started so far has finished.
    ///
    /// Concurrent callers are served one at a time; each returns once the
    /// tracker is empty.
    pub async fn wait_for_installs(&self) {
        let _draining = self.draining.lock().await;
        self.installs.close();
        self.installs.wait().await;
        self.installs.reopen();
    }

    /// Act on `outcome` for `key`.
    ///
    /// Returns the detached install task, if one was started.
    pub fn on_outcome(&self, key: &DownloadKey, outcome: &DownloadOutcome) -> Option<JoinHandle<()>> {
        match outcome {
            DownloadOutcome::Success { artifact, bytes } => {
                info!(target: "appshelf.download", key = %key, bytes, path = %artifact.display(), "Download completed");
                self.emitter.emit(DownloadEvent::DownloadCompleted {
                    key: key.clone(),
                    path: artifact.clone(),
                });
                self.auto_install.then(|| self.spawn_install(key, artifact))
            }
            DownloadOutcome::Failure(e) => {
                warn!(target: "appshelf.download", key = %key, error = %e, "Download failed");
                self.emitter
                    .emit(DownloadEvent::failed(key.clone(), e.user_message()));
                None
            }
            DownloadOutcome::Cancelled => {
                info!(target: "appshelf.download", key = %key, "Download cancelled");
                self.emitter
                    .emit(DownloadEvent::DownloadCancelled { key: key.clone() });
                None
            }
        }
    }

    fn spawn_install(&self, key: &DownloadKey, artifact: &Path) -> JoinHandle<()> {
        let installer = Arc::clone(&self.installer);
        let key = key.clone();
        let artifact = artifact.to_path_buf();
        self.installs.spawn(async move {
            match installer.install(&artifact).await {
                Ok(()) => info!(key = %key, "Installer started"),
                Err(e) => error!(key = %key, error = %e, "Install failed"),
            }
        })
    }
}
