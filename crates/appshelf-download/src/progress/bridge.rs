//! Per-job bridge from engine progress to the UI emitter and the OS
//! notification surface.
//!
//! The bridge is the only caller of [`NotificationPort`]. The UI sees every
//! progress event; the notification surface sees at most one update per
//! throttle interval, plus forced updates at 100% and at the terminal state.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::debug;

use appshelf_core::{
    DownloadEvent, DownloadEventEmitterPort, DownloadKey, DownloadOutcome, Item, NotificationId,
    NotificationPort, NotificationProgress, Permission, PermissionPort, ProgressEvent,
    TransferPercent,
};

use super::throttle::ProgressThrottle;

/// Titles and bodies used for notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationTexts {
    pub title: String,
    pub text: String,
}

impl NotificationTexts {
    fn downloading(name: &str, text: impl Into<String>) -> Self {
        Self {
            title: format!("Downloading {name}"),
            text: text.into(),
        }
    }

    fn started(name: &str) -> Self {
        Self::downloading(name, "Starting download...")
    }

    fn progress(name: &str, percent: TransferPercent) -> Self {
        match percent {
            TransferPercent::Known(p) => Self::downloading(name, format!("{p}% complete")),
            TransferPercent::Indeterminate => Self::downloading(name, "Downloading..."),
        }
    }

    fn completed(name: &str) -> Self {
        Self {
            title: format!("{name} Download Complete"),
            text: "Ready to install.".to_string(),
        }
    }
}

const fn notification_progress(percent: TransferPercent) -> NotificationProgress {
    match percent {
        TransferPercent::Known(p) => NotificationProgress::Percent(p),
        TransferPercent::Indeterminate => NotificationProgress::Indeterminate,
    }
}

/// Spawns and drives per-job bridge tasks.
#[derive(Clone)]
pub struct NotificationBridge {
    emitter: Arc<dyn DownloadEventEmitterPort>,
    notifier: Arc<dyn NotificationPort>,
    permissions: Arc<dyn PermissionPort>,
    interval: Duration,
}

impl NotificationBridge {
    pub fn new(
        emitter: Arc<dyn DownloadEventEmitterPort>,
        notifier: Arc<dyn NotificationPort>,
        permissions: Arc<dyn PermissionPort>,
        interval: Duration,
    ) -> Self {
        Self {
            emitter,
            notifier,
            permissions,
            interval,
        }
    }

    /// Spawn the bridge for one admitted job.
    ///
    /// Drains `progress` until the engine drops its sender, then waits for
    /// the terminal outcome on `done`. A dropped `done` sender ends the task
    /// without a terminal notification.
    pub fn spawn(
        &self,
        item: &Item,
        mut progress: mpsc::UnboundedReceiver<ProgressEvent>,
        done: oneshot::Receiver<DownloadOutcome>,
    ) -> BridgeHandle {
        let mut job = BridgeJob::new(self.clone(), item);
        let (drained_tx, drained_rx) = oneshot::channel();
        let task = tokio::spawn(async move {
            job.on_started();
            while let Some(event) = progress.recv().await {
                job.on_progress(&event, Instant::now());
            }
            let _ = drained_tx.send(());
            if let Ok(outcome) = done.await {
                job.on_terminal(&outcome);
            }
        });
        BridgeHandle {
            drained: drained_rx,
            task,
        }
    }

    fn notifications_allowed(&self) -> bool {
        self.permissions.is_granted(Permission::NotificationPost)
    }
}

/// A running bridge task.
#[derive(Debug)]
pub struct BridgeHandle {
    drained: oneshot::Receiver<()>,
    task: JoinHandle<()>,
}

impl BridgeHandle {
    /// Resolves once every progress event has reached the emitter.
    pub async fn drained(&mut self) {
        let _ = (&mut self.drained).await;
    }

    /// Wait for the task to post its terminal notification and exit.
    pub async fn join(self) {
        let _ = self.task.await;
    }
}

/// State for one job's bridge.
pub(crate) struct BridgeJob {
    bridge: NotificationBridge,
    key: DownloadKey,
    display_name: String,
    id: NotificationId,
    throttle: ProgressThrottle,
}

impl BridgeJob {
    pub(crate) fn new(bridge: NotificationBridge, item: &Item) -> Self {
        let throttle = ProgressThrottle::new(bridge.interval);
        Self {
            bridge,
            key: DownloadKey::for_item(item),
            display_name: item.display_name.clone(),
            id: NotificationId::for_key(&item.key),
            throttle,
        }
    }

    fn show(&self, texts: &NotificationTexts, progress: NotificationProgress) {
        if self.bridge.notifications_allowed() {
            self.bridge
                .notifier
                .show(self.id, &texts.title, &texts.text, progress);
        }
    }

    pub(crate) fn on_started(&mut self) {
        self.bridge.emitter.emit(DownloadEvent::DownloadStarted {
            key: self.key.clone(),
            display_name: self.display_name.clone(),
        });
        self.show(
            &NotificationTexts::started(&self.display_name),
            NotificationProgress::Indeterminate,
        );
    }

    pub(crate) fn on_progress(&mut self, event: &ProgressEvent, now: Instant) {
        self.bridge
            .emitter
            .emit(DownloadEvent::progress(event.key.clone(), event.percent));

        let due = self.throttle.should_emit_at(now);
        if due || event.percent.is_complete() {
            debug!(key = %self.key, percent = %event.percent, "Notification update");
            self.show(
                &NotificationTexts::progress(&self.display_name, event.percent),
                notification_progress(event.percent),
            );
        }
    }

    pub(crate) fn on_terminal(&mut self, outcome: &DownloadOutcome) {
        match outcome {
            DownloadOutcome::Success { .. } => self.show(
                &NotificationTexts::completed(&self.display_name),
                NotificationProgress::None,
            ),
            DownloadOutcome::Failure(_) | DownloadOutcome::Cancelled => {
                self.bridge.notifier.cancel(self.id);
            }
        }
    }
}
