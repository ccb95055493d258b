//! Download manager: admission, transfer, progress fan-out and completion.
//!
//! # Flow
//!
//! 1. [`DownloadManager::start_download`] rejects keys already running,
//!    then refuses without any network I/O if the install grant is missing.
//! 2. The [`JobRegistry`] admits the job and spawns the transfer.
//! 3. The engine streams into the destination and reports progress over a
//!    channel; a [`NotificationBridge`] task fans that out.
//! 4. A supervisor task holds the job's [`Lease`](crate::Lease). It waits
//!    for the transfer and for the bridge to forward the last progress
//!    event, hands the outcome to the [`CompletionHandler`], lets the bridge
//!    post the terminal notification, drops the lease, then resolves the
//!    [`DownloadHandle`].
//!
//! A key is therefore not reusable until every side effect of its previous
//! job has happened, and `is_active` is already false when the handle
//! resolves.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tracing::{error, info, warn};

use appshelf_core::{
    DEFAULT_ARTIFACT_EXTENSION, DEFAULT_CHUNK_SIZE, DEFAULT_NOTIFY_INTERVAL_MS, DownloadError,
    DownloadEvent, DownloadEventEmitterPort, DownloadKey, DownloadOutcome, InstallerPort, Item,
    NotificationPort, Permission, PermissionPort, Settings, artifact_file_name,
};

use crate::completion::CompletionHandler;
use crate::engine::{TransferEngine, TransferRequest};
use crate::progress::NotificationBridge;
use crate::registry::JobRegistry;
use crate::transport::HttpTransport;

/// Configuration for the download manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadManagerConfig {
    /// Directory where artifacts are written.
    pub download_directory: PathBuf,
    /// Artifact file extension, without the dot.
    pub artifact_extension: String,
    /// Transfer buffer size in bytes.
    pub chunk_size: usize,
    /// Minimum interval between throttled notifications.
    pub notify_interval: Duration,
    /// Hand finished artifacts to the installer.
    pub auto_install: bool,
}

impl Default for DownloadManagerConfig {
    fn default() -> Self {
        Self {
            download_directory: PathBuf::from("."),
            artifact_extension: DEFAULT_ARTIFACT_EXTENSION.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            notify_interval: Duration::from_millis(DEFAULT_NOTIFY_INTERVAL_MS),
            auto_install: true,
        }
    }
}

impl DownloadManagerConfig {
    /// Create a config writing into `download_directory`.
    #[must_use]
    pub fn new(download_directory: PathBuf) -> Self {
        Self {
            download_directory,
            ..Default::default()
        }
    }

    /// Derive a config from settings, writing into `download_directory`.
    #[must_use]
    pub fn from_settings(settings: &Settings, download_directory: PathBuf) -> Self {
        Self {
            download_directory,
            artifact_extension: settings.effective_artifact_extension().to_string(),
            chunk_size: settings.effective_chunk_size(),
            notify_interval: settings.effective_notify_interval(),
            auto_install: settings.effective_auto_install(),
        }
    }

    /// Set the artifact extension.
    #[must_use]
    pub fn with_artifact_extension(mut self, extension: impl Into<String>) -> Self {
        self.artifact_extension = extension.into();
        self
    }

    /// Set the transfer buffer size.
    #[must_use]
    pub const fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Set the notification throttle interval.
    #[must_use]
    pub const fn with_notify_interval(mut self, interval: Duration) -> Self {
        self.notify_interval = interval;
        self
    }

    /// Enable or disable automatic installation.
    #[must_use]
    pub const fn with_auto_install(mut self, auto_install: bool) -> Self {
        self.auto_install = auto_install;
        self
    }
}

/// Dependencies for creating a download manager.
pub struct DownloadManagerDeps {
    /// HTTP transport for fetching artifacts.
    pub transport: Arc<dyn HttpTransport>,
    /// Host permission grants.
    pub permissions: Arc<dyn PermissionPort>,
    /// OS notification surface.
    pub notifier: Arc<dyn NotificationPort>,
    /// Package installer.
    pub installer: Arc<dyn InstallerPort>,
    /// UI event sink.
    pub event_emitter: Arc<dyn DownloadEventEmitterPort>,
    /// Configuration.
    pub config: DownloadManagerConfig,
}

/// Build a download manager from its dependencies.
pub fn build_download_manager(deps: DownloadManagerDeps) -> DownloadManager {
    DownloadManager::new(deps)
}

/// Result of a start request.
#[derive(Debug)]
pub enum StartOutcome {
    /// The job was admitted; await the handle for its outcome.
    Admitted(DownloadHandle),
    /// A job for this key is already running. Nothing was started.
    AlreadyActive,
    /// The request was refused before any I/O.
    Refused(DownloadOutcome),
}

impl StartOutcome {
    /// Whether a job was admitted.
    #[must_use]
    pub const fn is_admitted(&self) -> bool {
        matches!(self, Self::Admitted(_))
    }

    /// The handle, if admitted.
    #[must_use]
    pub fn into_handle(self) -> Option<DownloadHandle> {
        match self {
            Self::Admitted(handle) => Some(handle),
            _ => None,
        }
    }

    /// Wait for the terminal outcome.
    ///
    /// `AlreadyActive` resolves to `None`; a refusal resolves immediately to
    /// its outcome.
    pub async fn outcome(self) -> Option<DownloadOutcome> {
        match self {
            Self::Admitted(handle) => Some(handle.wait().await),
            Self::AlreadyActive => None,
            Self::Refused(outcome) => Some(outcome),
        }
    }
}

/// Handle to an admitted download.
#[derive(Debug)]
pub struct DownloadHandle {
    destination: PathBuf,
    result: oneshot::Receiver<DownloadOutcome>,
}

impl DownloadHandle {
    /// Where the artifact will be written.
    #[must_use]
    pub const fn destination(&self) -> &PathBuf {
        &self.destination
    }

    /// Wait for the terminal outcome. Resolves exactly once.
    pub async fn wait(self) -> DownloadOutcome {
        self.result.await.unwrap_or_else(|_| {
            DownloadOutcome::Failure(DownloadError::other("Download supervisor stopped"))
        })
    }
}

/// Concrete download manager.
pub struct DownloadManager {
    registry: Arc<JobRegistry>,
    engine: TransferEngine,
    bridge: NotificationBridge,
    completion: CompletionHandler,
    permissions: Arc<dyn PermissionPort>,
    event_emitter: Arc<dyn DownloadEventEmitterPort>,
    config: DownloadManagerConfig,
}

impl DownloadManager {
    fn new(deps: DownloadManagerDeps) -> Self {
        let engine = TransferEngine::new(deps.transport).with_chunk_size(deps.config.chunk_size);
        let bridge = NotificationBridge::new(
            Arc::clone(&deps.event_emitter),
            deps.notifier,
            Arc::clone(&deps.permissions),
            deps.config.notify_interval,
        );
        let completion = CompletionHandler::new(
            deps.installer,
            Arc::clone(&deps.event_emitter),
            deps.config.auto_install,
        );
        Self {
            registry: Arc::new(JobRegistry::new()),
            engine,
            bridge,
            completion,
            permissions: deps.permissions,
            event_emitter: deps.event_emitter,
            config: deps.config,
        }
    }

    /// The configuration in use.
    pub const fn config(&self) -> &DownloadManagerConfig {
        &self.config
    }

    /// Destination path for `item`'s artifact.
    pub fn destination_for(&self, item: &Item) -> PathBuf {
        self.config.download_directory.join(artifact_file_name(
            &item.key,
            &item.version,
            &self.config.artifact_extension,
        ))
    }

    /// Start downloading `item`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start_download(&self, item: &Item) -> StartOutcome {
        let key = DownloadKey::for_item(item);

        if self.registry.is_active(&key) {
            return self.reject_duplicate(item, &key);
        }

        if !self.permissions.is_granted(Permission::InstallFromSource) {
            let err = DownloadError::install_permission_denied();
            warn!(target: "appshelf.download", key = %key, "{err}");
            self.event_emitter
                .emit(DownloadEvent::failed(key, err.to_string()));
            return StartOutcome::Refused(DownloadOutcome::Failure(err));
        }

        let destination = self.destination_for(item);
        let request = TransferRequest {
            key: key.clone(),
            url: item.source_url.clone(),
            destination: destination.clone(),
        };
        let (progress_tx, progress_rx) = mpsc::unbounded_channel();
        let engine = self.engine.clone();

        let Some(admission) = self.registry.start_job(key.clone(), move |cancel| async move {
            engine.transfer(&request, &cancel, &progress_tx).await
        }) else {
            return self.reject_duplicate(item, &key);
        };
        let (transfer, lease) = admission.into_parts();

        info!(
            target: "appshelf.download",
            key = %key,
            url = %item.source_url,
            destination = %destination.display(),
            "Download admitted"
        );

        let (bridge_done_tx, bridge_done_rx) = oneshot::channel();
        let mut bridge_task = self.bridge.spawn(item, progress_rx, bridge_done_rx);
        let (result_tx, result_rx) = oneshot::channel();
        let completion = self.completion.clone();
        let supervisor_key = key;

        tokio::spawn(async move {
            let outcome = match transfer.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(target: "appshelf.download", key = %supervisor_key, error = %e, "Transfer task failed");
                    DownloadOutcome::Failure(DownloadError::other(format!(
                        "Transfer task failed: {e}"
                    )))
                }
            };
            bridge_task.drained().await;
            completion.on_outcome(&supervisor_key, &outcome);
            let _ = bridge_done_tx.send(outcome.clone());
            bridge_task.join().await;
            drop(lease);
            let _ = result_tx.send(outcome);
        });

        StartOutcome::Admitted(DownloadHandle {
            destination,
            result: result_rx,
        })
    }

    fn reject_duplicate(&self, item: &Item, key: &DownloadKey) -> StartOutcome {
        info!(target: "appshelf.download", key = %key, "Download already in progress");
        self.event_emitter.emit(DownloadEvent::rejected(
            key.clone(),
            format!("{} download is already active.", item.display_name),
        ));
        StartOutcome::AlreadyActive
    }

    /// Request cancellation. Returns whether a job for `key` was active.
    ///
    /// Cancellation is observed at the next chunk boundary. A job whose
    /// transfer has already ended keeps its outcome.
    pub fn cancel_download(&self, key: &DownloadKey) -> bool {
        let found = self.registry.cancel_job(key);
        if found {
            info!(target: "appshelf.download", key = %key, "Cancellation requested");
        }
        found
    }

    /// Whether a download for `key` is running.
    pub fn is_active(&self, key: &DownloadKey) -> bool {
        self.registry.is_active(key)
    }

    /// Keys of running downloads.
    pub fn active_downloads(&self) -> Vec<DownloadKey> {
        self.registry.active_keys()
    }

    /// Wait for detached installs to finish.
    pub async fn wait_for_installs(&self) {
        self.completion.wait_for_installs().await;
    }

    /// Cancel every running download for process shutdown.
    pub fn shutdown_cleanup(&self) -> usize {
        let count = self.registry.cancel_all();
        if count > 0 {
            info!(target: "appshelf.download", count, "Shutdown cleanup: cancelled downloads");
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        NotifierCall, RecordingEmitter, RecordingInstaller, RecordingNotifier, ScriptedTransport,
        TerminalGate, permissions,
    };
    use appshelf_core::{NotificationId, TransferPercent};
    use tempfile::{TempDir, tempdir};
    use tokio::sync::mpsc::UnboundedReceiver;

    struct Harness {
        manager: DownloadManager,
        transport: Arc<ScriptedTransport>,
        emitter: RecordingEmitter,
        events: UnboundedReceiver<DownloadEvent>,
        notifier: Arc<RecordingNotifier>,
        installer: Arc<RecordingInstaller>,
        dir: TempDir,
    }

    fn harness(transport: ScriptedTransport, install_granted: bool) -> Harness {
        let (emitter, events) = RecordingEmitter::new();
        harness_with(transport, install_granted, emitter, events)
    }

    fn gated_harness(transport: ScriptedTransport) -> (Harness, TerminalGate) {
        let (emitter, events, gate) = RecordingEmitter::gated();
        (harness_with(transport, true, emitter, events), gate)
    }

    fn harness_with(
        transport: ScriptedTransport,
        install_granted: bool,
        emitter: RecordingEmitter,
        events: UnboundedReceiver<DownloadEvent>,
    ) -> Harness {
        let dir = tempdir().unwrap();
        let transport = Arc::new(transport);
        let notifier = Arc::new(RecordingNotifier::default());
        let installer = Arc::new(RecordingInstaller::default());
        let manager = build_download_manager(DownloadManagerDeps {
            transport: transport.clone(),
            permissions: Arc::new(permissions(install_granted, true)),
            notifier: notifier.clone(),
            installer: installer.clone(),
            event_emitter: Arc::new(emitter.clone()),
            config: DownloadManagerConfig::new(dir.path().join("downloads")),
        });
        Harness {
            manager,
            transport,
            emitter,
            events,
            notifier,
            installer,
            dir,
        }
    }

    fn item() -> Item {
        Item::new("pkg.a", "Alpha", "https://cdn.example.com/alpha.apk").with_version("1.0")
    }

    async fn wait_for_progress(events: &mut UnboundedReceiver<DownloadEvent>, percent: u8) {
        while let Some(event) = events.recv().await {
            if event == DownloadEvent::progress(DownloadKey::new("pkg.a"), TransferPercent::Known(percent)) {
                return;
            }
        }
        panic!("event stream ended before {percent}%");
    }

    #[tokio::test]
    async fn successful_download_installs_and_evicts() {
        let h = harness(
            ScriptedTransport::ok(vec![vec![7; 500], vec![7; 500]], Some(1000)),
            true,
        );
        let handle = h.manager.start_download(&item()).into_handle().unwrap();
        let destination = handle.destination().clone();

        let outcome = handle.wait().await;

        assert_eq!(
            outcome,
            DownloadOutcome::Success {
                artifact: destination.clone(),
                bytes: 1000
            }
        );
        assert_eq!(
            destination,
            h.dir.path().join("downloads").join("pkg.a_1.0.apk")
        );
        assert_eq!(std::fs::read(&destination).unwrap().len(), 1000);
        assert!(!h.manager.is_active(&DownloadKey::new("pkg.a")));

        let percents: Vec<_> = h
            .emitter
            .events()
            .into_iter()
            .filter_map(|e| match e {
                DownloadEvent::DownloadProgress { percent, .. } => Some(percent),
                _ => None,
            })
            .collect();
        assert_eq!(
            percents,
            vec![TransferPercent::Known(50), TransferPercent::Known(100)]
        );
        assert_eq!(h.emitter.terminal_events().len(), 1);

        let last = h.notifier.shows().pop().unwrap();
        assert_eq!(last.title, "Alpha Download Complete");

        assert!(h.emitter.events().last().unwrap().is_terminal());

        h.manager.wait_for_installs().await;
        assert_eq!(h.installer.installed(), vec![destination]);
    }

    #[tokio::test]
    async fn cancel_after_first_chunk_removes_file() {
        let (transport, feed) = ScriptedTransport::live(Some(1000));
        let mut h = harness(transport, true);
        let key = DownloadKey::new("pkg.a");
        let handle = h.manager.start_download(&item()).into_handle().unwrap();
        let destination = handle.destination().clone();

        feed.send(vec![1; 500]);
        wait_for_progress(&mut h.events, 50).await;
        assert!(h.manager.cancel_download(&key));
        feed.send(vec![1; 500]);

        assert_eq!(handle.wait().await, DownloadOutcome::Cancelled);
        assert!(!destination.exists());
        assert!(!h.manager.is_active(&key));
        assert!(!h.manager.cancel_download(&key));
        assert!(h.installer.installed().is_empty());
        assert_eq!(
            h.notifier.calls().last(),
            Some(&NotifierCall::Cancel(NotificationId::for_key("pkg.a")))
        );
        assert_eq!(
            h.emitter.terminal_events(),
            vec![DownloadEvent::DownloadCancelled { key }]
        );
    }

    fn cancel_calls(notifier: &RecordingNotifier) -> usize {
        notifier
            .calls()
            .iter()
            .filter(|c| matches!(c, NotifierCall::Cancel(_)))
            .count()
    }

    #[tokio::test]
    async fn cancel_after_last_chunk_ends_with_single_cancellation() {
        let (transport, feed) = ScriptedTransport::live(Some(1000));
        let mut h = harness(transport, true);
        let key = DownloadKey::new("pkg.a");
        let handle = h.manager.start_download(&item()).into_handle().unwrap();
        let destination = handle.destination().clone();

        feed.send(vec![1; 500]);
        feed.send(vec![1; 500]);
        wait_for_progress(&mut h.events, 100).await;
        assert!(h.manager.cancel_download(&key));
        drop(feed);

        assert_eq!(handle.wait().await, DownloadOutcome::Cancelled);
        assert!(!destination.exists());
        assert_eq!(
            h.emitter.terminal_events(),
            vec![DownloadEvent::DownloadCancelled { key: key.clone() }]
        );
        assert_eq!(cancel_calls(&h.notifier), 1);
        assert_eq!(
            h.notifier.calls().last(),
            Some(&NotifierCall::Cancel(NotificationId::for_key("pkg.a")))
        );
        assert!(!h.manager.is_active(&key));
        assert!(h.installer.installed().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn cancel_during_completion_keeps_success() {
        let (h, mut gate) = gated_harness(ScriptedTransport::ok(vec![vec![3; 10]], Some(10)));
        let key = DownloadKey::new("pkg.a");
        let handle = h.manager.start_download(&item()).into_handle().unwrap();
        let destination = handle.destination().clone();

        gate.entered().await;
        // The transfer is over but its completion has not run yet.
        assert!(h.manager.is_active(&key));
        assert!(h.manager.cancel_download(&key));
        gate.release();

        assert!(handle.wait().await.is_success());
        assert!(destination.exists());
        assert_eq!(h.emitter.terminal_events().len(), 1);
        assert_eq!(cancel_calls(&h.notifier), 0);
        assert!(!h.manager.is_active(&key));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn restart_waits_for_previous_completion() {
        let (transport, first_feed) = ScriptedTransport::live(Some(1000));
        let (h, mut gate) = gated_harness(transport);
        let key = DownloadKey::new("pkg.a");
        let first = h.manager.start_download(&item()).into_handle().unwrap();
        let destination = first.destination().clone();

        first_feed.send(vec![1; 100]);
        first_feed.fail();
        gate.entered().await;

        // First job's completion is in flight: the key is still taken.
        assert!(h.manager.is_active(&key));
        assert!(matches!(
            h.manager.start_download(&item()),
            StartOutcome::AlreadyActive
        ));

        gate.release();
        assert!(first.wait().await.reason().unwrap().contains("reset"));
        assert!(!h.manager.is_active(&key));

        let second_feed = h.transport.next_body();
        let second = h.manager.start_download(&item()).into_handle().unwrap();
        second_feed.send(vec![2; 1000]);
        drop(second_feed);

        assert_eq!(
            second.wait().await,
            DownloadOutcome::Success {
                artifact: destination.clone(),
                bytes: 1000
            }
        );
        assert_eq!(std::fs::read(&destination).unwrap(), vec![2; 1000]);

        let events = h.emitter.events();
        let first_failed = events
            .iter()
            .position(|e| matches!(e, DownloadEvent::DownloadFailed { .. }))
            .unwrap();
        let second_started = events
            .iter()
            .rposition(|e| matches!(e, DownloadEvent::DownloadStarted { .. }))
            .unwrap();
        assert!(first_failed < second_started);
        assert_eq!(
            events.last(),
            Some(&DownloadEvent::DownloadCompleted {
                key,
                path: destination,
            })
        );

        let calls = h.notifier.calls();
        assert_eq!(cancel_calls(&h.notifier), 1);
        assert!(matches!(
            calls.last(),
            Some(NotifierCall::Show(show)) if show.title == "Alpha Download Complete"
        ));
    }

    #[tokio::test]
    async fn http_404_fails_with_status() {
        let h = harness(ScriptedTransport::status(404, "Not Found"), true);
        let handle = h.manager.start_download(&item()).into_handle().unwrap();
        let destination = handle.destination().clone();

        let outcome = handle.wait().await;

        assert!(outcome.reason().unwrap().contains("404"));
        assert!(!destination.exists());
        assert!(matches!(
            &h.emitter.terminal_events()[..],
            [DownloadEvent::DownloadFailed { error, .. }] if error.contains("404")
        ));
    }

    #[tokio::test]
    async fn duplicate_start_is_not_admitted() {
        let (transport, feed) = ScriptedTransport::live(Some(10));
        let h = harness(transport, true);

        let first = h.manager.start_download(&item());
        let second = h.manager.start_download(&item());

        assert!(first.is_admitted());
        assert!(matches!(second, StartOutcome::AlreadyActive));
        assert!(h.emitter.events().iter().any(|e| matches!(
            e,
            DownloadEvent::DownloadRejected { reason, .. } if reason == "Alpha download is already active."
        )));

        feed.send(vec![0; 10]);
        drop(feed);
        assert!(first.outcome().await.unwrap().is_success());
        assert_eq!(h.transport.calls(), 1);
    }

    #[tokio::test]
    async fn missing_install_permission_refuses_without_network() {
        let h = harness(ScriptedTransport::ok(vec![vec![0; 10]], Some(10)), false);

        let start = h.manager.start_download(&item());

        let StartOutcome::Refused(outcome) = start else {
            panic!("expected refusal");
        };
        assert_eq!(
            outcome.reason().as_deref(),
            Some("Install permission not granted")
        );
        assert_eq!(h.transport.calls(), 0);
        assert!(!h.manager.is_active(&DownloadKey::new("pkg.a")));
        assert!(!h.manager.destination_for(&item()).exists());
        assert_eq!(
            h.emitter.events(),
            vec![DownloadEvent::failed(
                DownloadKey::new("pkg.a"),
                "Install permission not granted"
            )]
        );
    }

    #[tokio::test]
    async fn restart_after_terminal_outcome_is_admitted() {
        let h = harness(ScriptedTransport::status(500, "Internal Server Error"), true);

        let first = h.manager.start_download(&item()).outcome().await.unwrap();
        assert!(!first.is_success());

        assert!(h.manager.start_download(&item()).is_admitted());
    }

    #[tokio::test]
    async fn shutdown_cancels_running_downloads() {
        let (transport, feed) = ScriptedTransport::live(None);
        let h = harness(transport, true);
        let handle = h.manager.start_download(&item()).into_handle().unwrap();

        assert_eq!(h.manager.active_downloads(), vec![DownloadKey::new("pkg.a")]);
        assert_eq!(h.manager.shutdown_cleanup(), 1);
        drop(feed);

        assert_eq!(handle.wait().await, DownloadOutcome::Cancelled);
    }

    #[test]
    fn config_from_settings_uses_effective_values() {
        let settings = Settings {
            chunk_size: Some(4096),
            auto_install: Some(false),
            ..Settings::default()
        };
        let config = DownloadManagerConfig::from_settings(&settings, PathBuf::from("/dl"));
        assert_eq!(config.chunk_size, 4096);
        assert!(!config.auto_install);
        assert_eq!(config.artifact_extension, "apk");
        assert_eq!(config.notify_interval, Duration::from_millis(500));
    }
}
