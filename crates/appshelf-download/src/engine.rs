//! Streaming transfer engine.
//!
//! Copies one HTTP body into one destination file, reporting progress after
//! every chunk. Cancellation is polled at chunk boundaries only; an
//! in-flight read is never interrupted. Every non-success exit removes the
//! destination file.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tokio::fs::{self, File};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};
use url::Url;

use appshelf_core::{
    DEFAULT_CHUNK_SIZE, DownloadError, DownloadKey, DownloadOutcome, ProgressEvent, TransferPercent,
};

use crate::transport::HttpTransport;

/// One transfer: where to read from and where to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub key: DownloadKey,
    pub url: String,
    pub destination: PathBuf,
}

/// Removes the destination file on drop unless committed.
struct PartialFile {
    path: PathBuf,
    committed: bool,
}

impl PartialFile {
    const fn new(path: PathBuf) -> Self {
        Self {
            path,
            committed: false,
        }
    }

    const fn commit(&mut self) {
        self.committed = true;
    }
}

impl Drop for PartialFile {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Removed partial file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove partial file");
            }
        }
    }
}

/// Streams HTTP bodies to disk through an [`HttpTransport`].
#[derive(Clone)]
pub struct TransferEngine {
    transport: Arc<dyn HttpTransport>,
    chunk_size: usize,
}

impl TransferEngine {
    /// Create an engine with the default 8 KiB chunk size.
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Override the read buffer size.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Run a transfer to its terminal outcome.
    ///
    /// Never returns an error: failures become [`DownloadOutcome::Failure`].
    /// One [`ProgressEvent`] is sent per chunk written; a dropped receiver
    /// is ignored.
    pub async fn transfer(
        &self,
        request: &TransferRequest,
        cancel: &CancellationToken,
        progress: &mpsc::UnboundedSender<ProgressEvent>,
    ) -> DownloadOutcome {
        let started = Instant::now();
        let outcome = DownloadOutcome::from_result(self.run(request, cancel, progress).await);
        debug!(
            key = %request.key,
            state = ?outcome.state(),
            elapsed_ms = started.elapsed().as_millis(),
            "Transfer finished"
        );
        outcome
    }

    async fn run(
        &self,
        request: &TransferRequest,
        cancel: &CancellationToken,
        progress: &mpsc::UnboundedSender<ProgressEvent>,
    ) -> Result<(PathBuf, u64), DownloadError> {
        let url = parse_source_url(&request.url)?;
        ensure_parent_dir(&request.destination).await?;

        if cancel.is_cancelled() {
            return Err(DownloadError::Cancelled);
        }

        let mut response = self.transport.get(&url).await?;
        if !response.is_success() {
            return Err(DownloadError::network_with_status(
                response.status_line(),
                response.status,
            ));
        }
        let total = response.content_length;

        // Declared before the file so the handle closes first on drop.
        let mut guard = PartialFile::new(request.destination.clone());
        let mut file = File::create(&request.destination).await?;

        let mut buf = vec![0_u8; self.chunk_size];
        let mut written: u64 = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(DownloadError::Cancelled);
            }

            let n = response.body.read(&mut buf).await?;
            if n == 0 {
                break;
            }
            if cancel.is_cancelled() {
                return Err(DownloadError::Cancelled);
            }

            file.write_all(&buf[..n]).await?;
            written += n as u64;

            let percent = TransferPercent::from_bytes(written, total);
            trace!(key = %request.key, written, %percent, "Chunk written");
            let _ = progress.send(ProgressEvent::new(request.key.clone(), percent));
        }

        if cancel.is_cancelled() {
            return Err(DownloadError::Cancelled);
        }

        if let Some(expected) = total {
            if written != expected {
                return Err(DownloadError::network(format!(
                    "Connection closed after {written} of {expected} bytes"
                )));
            }
        }

        file.flush().await?;
        file.sync_all().await?;
        drop(file);
        guard.commit();

        Ok((request.destination.clone(), written))
    }
}

fn parse_source_url(raw: &str) -> Result<Url, DownloadError> {
    let url = Url::parse(raw).map_err(|e| DownloadError::invalid_url(raw, e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(DownloadError::invalid_url(
            raw,
            format!("unsupported scheme '{other}'"),
        )),
    }
}

async fn ensure_parent_dir(destination: &Path) -> Result<(), DownloadError> {
    match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).await.map_err(|e| {
                DownloadError::io(
                    format!("{:?}", e.kind()),
                    format!("Cannot create download directory {}: {e}", parent.display()),
                )
            })
        }
        _ => Ok(()),
    }
}
