//! Test doubles shared by the unit tests in this crate.

use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, mpsc as std_mpsc};
use std::task::{Context, Poll};

use async_trait::async_trait;
use tokio::io::{AsyncRead, ReadBuf};
use tokio::sync::{mpsc, oneshot};
use url::Url;

use appshelf_core::ports::MockPermissionPort;
use appshelf_core::{
    DownloadError, DownloadEvent, DownloadEventEmitterPort, InstallError, InstallerPort,
    NotificationId, NotificationPort, NotificationProgress, Permission, ProgressEvent,
    TransferPercent,
};

use crate::transport::{HttpTransport, TransportResponse};

type Chunk = io::Result<Vec<u8>>;

/// Body that yields exactly one queued chunk per read.
pub struct ChunkedReader {
    rx: mpsc::UnboundedReceiver<Chunk>,
    pending: Vec<u8>,
}

impl AsyncRead for ChunkedReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        if self.pending.is_empty() {
            match self.rx.poll_recv(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(None) => return Poll::Ready(Ok(())),
                Poll::Ready(Some(Err(e))) => return Poll::Ready(Err(e)),
                Poll::Ready(Some(Ok(chunk))) => self.pending = chunk,
            }
        }
        let n = buf.remaining().min(self.pending.len());
        buf.put_slice(&self.pending[..n]);
        self.pending.drain(..n);
        Poll::Ready(Ok(()))
    }
}

/// Sender half of a live body. Dropping it ends the body.
pub struct BodyFeed(mpsc::UnboundedSender<Chunk>);

impl BodyFeed {
    pub fn send(&self, chunk: Vec<u8>) {
        let _ = self.0.send(Ok(chunk));
    }

    pub fn fail(&self) {
        let _ = self
            .0
            .send(Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer")));
    }
}

/// Transport returning a canned response.
pub struct ScriptedTransport {
    status: u16,
    reason: String,
    content_length: Option<u64>,
    chunks: Vec<Vec<u8>>,
    fail_at_end: bool,
    live: Mutex<VecDeque<mpsc::UnboundedReceiver<Chunk>>>,
    calls: AtomicUsize,
}

impl ScriptedTransport {
    fn build(status: u16, reason: &str, content_length: Option<u64>, chunks: Vec<Vec<u8>>) -> Self {
        Self {
            status,
            reason: reason.to_string(),
            content_length,
            chunks,
            fail_at_end: false,
            live: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn ok(chunks: Vec<Vec<u8>>, content_length: Option<u64>) -> Self {
        Self::build(200, "OK", content_length, chunks)
    }

    pub fn status(status: u16, reason: &str) -> Self {
        Self::build(status, reason, None, Vec::new())
    }

    pub fn failing_after(chunks: Vec<Vec<u8>>, content_length: Option<u64>) -> Self {
        Self {
            fail_at_end: true,
            ..Self::ok(chunks, content_length)
        }
    }

    /// A 200 response whose body is fed by the returned [`BodyFeed`].
    pub fn live(content_length: Option<u64>) -> (Self, BodyFeed) {
        let transport = Self::ok(Vec::new(), content_length);
        let feed = transport.next_body();
        (transport, feed)
    }

    /// Queue another live body for a later request.
    pub fn next_body(&self) -> BodyFeed {
        let (tx, rx) = mpsc::unbounded_channel();
        self.live.lock().unwrap().push_back(rx);
        BodyFeed(tx)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn get(&self, _url: &Url) -> Result<TransportResponse, DownloadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let rx = self.live.lock().unwrap().pop_front().unwrap_or_else(|| {
            let (tx, rx) = mpsc::unbounded_channel();
            for chunk in &self.chunks {
                tx.send(Ok(chunk.clone())).unwrap();
            }
            if self.fail_at_end {
                tx.send(Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer")))
                    .unwrap();
            }
            rx
        });
        Ok(TransportResponse {
            status: self.status,
            reason: self.reason.clone(),
            content_length: self.content_length,
            body: Box::new(ChunkedReader {
                rx,
                pending: Vec::new(),
            }),
        })
    }
}

/// Drain a closed progress channel into its percents.
pub async fn collect_percents(rx: &mut mpsc::UnboundedReceiver<ProgressEvent>) -> Vec<TransferPercent> {
    let mut out = Vec::new();
    while let Some(event) = rx.recv().await {
        out.push(event.percent);
    }
    out
}

struct TerminalHold {
    entered: Mutex<Option<oneshot::Sender<()>>>,
    release: Mutex<std_mpsc::Receiver<()>>,
}

/// Test side of a [`RecordingEmitter::gated`] emitter.
pub struct TerminalGate {
    entered: oneshot::Receiver<()>,
    release: std_mpsc::Sender<()>,
}

impl TerminalGate {
    /// Resolves once the first terminal event is being emitted.
    pub async fn entered(&mut self) {
        let _ = (&mut self.entered).await;
    }

    /// Let the held terminal event through.
    pub fn release(&self) {
        let _ = self.release.send(());
    }
}

/// Emitter that records events and mirrors them onto a channel.
#[derive(Clone)]
pub struct RecordingEmitter {
    events: Arc<Mutex<Vec<DownloadEvent>>>,
    tx: mpsc::UnboundedSender<DownloadEvent>,
    hold: Option<Arc<TerminalHold>>,
}

impl RecordingEmitter {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<DownloadEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                events: Arc::new(Mutex::new(Vec::new())),
                tx,
                hold: None,
            },
            rx,
        )
    }

    /// Like [`Self::new`], but the first terminal event blocks the emitting
    /// thread until [`TerminalGate::release`]. Multi-thread runtimes only.
    pub fn gated() -> (Self, mpsc::UnboundedReceiver<DownloadEvent>, TerminalGate) {
        let (mut emitter, rx) = Self::new();
        let (entered_tx, entered_rx) = oneshot::channel();
        let (release_tx, release_rx) = std_mpsc::channel();
        emitter.hold = Some(Arc::new(TerminalHold {
            entered: Mutex::new(Some(entered_tx)),
            release: Mutex::new(release_rx),
        }));
        let gate = TerminalGate {
            entered: entered_rx,
            release: release_tx,
        };
        (emitter, rx, gate)
    }

    pub fn events(&self) -> Vec<DownloadEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn progress_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, DownloadEvent::DownloadProgress { .. }))
            .count()
    }

    pub fn terminal_events(&self) -> Vec<DownloadEvent> {
        self.events().into_iter().filter(DownloadEvent::is_terminal).collect()
    }
}

impl DownloadEventEmitterPort for RecordingEmitter {
    fn emit(&self, event: DownloadEvent) {
        if let Some(hold) = self.hold.as_ref().filter(|_| event.is_terminal()) {
            let entered = hold.entered.lock().unwrap().take();
            if let Some(entered) = entered {
                let _ = entered.send(());
                let _ = hold.release.lock().unwrap().recv();
            }
        }
        self.events.lock().unwrap().push(event.clone());
        let _ = self.tx.send(event);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowCall {
    pub id: NotificationId,
    pub title: String,
    pub text: String,
    pub progress: NotificationProgress,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifierCall {
    Show(ShowCall),
    Cancel(NotificationId),
}

#[derive(Default)]
pub struct RecordingNotifier {
    calls: Mutex<Vec<NotifierCall>>,
}

impl RecordingNotifier {
    pub fn calls(&self) -> Vec<NotifierCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn shows(&self) -> Vec<ShowCall> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                NotifierCall::Show(s) => Some(s),
                NotifierCall::Cancel(_) => None,
            })
            .collect()
    }
}

impl NotificationPort for RecordingNotifier {
    fn show(&self, id: NotificationId, title: &str, text: &str, progress: NotificationProgress) {
        self.calls.lock().unwrap().push(NotifierCall::Show(ShowCall {
            id,
            title: title.to_string(),
            text: text.to_string(),
            progress,
        }));
    }

    fn cancel(&self, id: NotificationId) {
        self.calls.lock().unwrap().push(NotifierCall::Cancel(id));
    }
}

/// Installer that records artifact paths.
#[derive(Default)]
pub struct RecordingInstaller {
    installed: Mutex<Vec<PathBuf>>,
}

impl RecordingInstaller {
    pub fn installed(&self) -> Vec<PathBuf> {
        self.installed.lock().unwrap().clone()
    }
}

#[async_trait]
impl InstallerPort for RecordingInstaller {
    async fn install(&self, artifact: &Path) -> Result<(), InstallError> {
        self.installed.lock().unwrap().push(artifact.to_path_buf());
        Ok(())
    }
}

/// Permission mock with fixed install and notification grants.
pub fn permissions(install: bool, notifications: bool) -> MockPermissionPort {
    let mut mock = MockPermissionPort::new();
    mock.expect_is_granted().returning(move |p| match p {
        Permission::InstallFromSource => install,
        Permission::NotificationPost => notifications,
        Permission::BackgroundExecution => true,
    });
    mock
}
