//! Job registry: one running job per key.
//!
//! Admission checks and inserts under a single lock, so two concurrent
//! starts for the same key admit exactly one. Each admission yields a
//! [`Lease`]; the entry is removed when the lease is dropped and only if it
//! still matches, so eviction happens exactly once per admission. The
//! lease outlives the job's task: whoever holds it decides when the key may
//! be reused.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use appshelf_core::DownloadKey;

/// Identifies one admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct LeaseId(u64);

struct ActiveJob {
    lease: LeaseId,
    cancel: CancellationToken,
}

/// Table of running jobs keyed by [`DownloadKey`].
#[derive(Default)]
pub struct JobRegistry {
    // Never held across an await.
    jobs: Mutex<HashMap<DownloadKey, ActiveJob>>,
    lease_counter: AtomicU64,
}

impl JobRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<DownloadKey, ActiveJob>> {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Admit and spawn `work` for `key`, or return `None` if a job for
    /// `key` is already running.
    ///
    /// `work` receives the job's cancellation token. The key stays active
    /// until the returned [`Admission`]'s lease is dropped, even after the
    /// task has finished. Must be called from within a Tokio runtime.
    pub fn start_job<F, Fut, T>(self: &Arc<Self>, key: DownloadKey, work: F) -> Option<Admission<T>>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let (id, cancel) = self.admit(&key)?;
        let lease = Lease {
            registry: Arc::clone(self),
            key,
            id,
        };
        let task = tokio::spawn(work(cancel));
        Some(Admission { task, lease })
    }

    fn admit(&self, key: &DownloadKey) -> Option<(LeaseId, CancellationToken)> {
        let mut jobs = self.lock();
        if jobs.contains_key(key) {
            debug!(target: "appshelf.download", key = %key, "Rejected duplicate start");
            return None;
        }
        let lease = LeaseId(self.lease_counter.fetch_add(1, Ordering::Relaxed));
        let cancel = CancellationToken::new();
        jobs.insert(
            key.clone(),
            ActiveJob {
                lease,
                cancel: cancel.clone(),
            },
        );
        debug!(target: "appshelf.download", key = %key, lease = lease.0, "Admitted job");
        Some((lease, cancel))
    }

    /// Remove the entry for `key` if it still belongs to `lease`.
    fn release(&self, key: &DownloadKey, lease: LeaseId) -> bool {
        let mut jobs = self.lock();
        if jobs.get(key).is_some_and(|job| job.lease == lease) {
            jobs.remove(key);
            debug!(target: "appshelf.download", key = %key, lease = lease.0, "Evicted job");
            true
        } else {
            debug!(target: "appshelf.download", key = %key, "Ignoring stale eviction (lease mismatch)");
            false
        }
    }

    /// Request cancellation of the job for `key`.
    ///
    /// Returns whether a running job was found. Idempotent; unknown keys
    /// are a no-op.
    pub fn cancel_job(&self, key: &DownloadKey) -> bool {
        let jobs = self.lock();
        jobs.get(key).is_some_and(|job| {
            job.cancel.cancel();
            true
        })
    }

    /// Whether a job for `key` is running.
    pub fn is_active(&self, key: &DownloadKey) -> bool {
        self.lock().contains_key(key)
    }

    /// Keys of all running jobs, sorted.
    pub fn active_keys(&self) -> Vec<DownloadKey> {
        let mut keys: Vec<_> = self.lock().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Number of running jobs.
    pub fn active_count(&self) -> usize {
        self.lock().len()
    }

    /// Cancel every running job. Returns how many were signalled.
    pub fn cancel_all(&self) -> usize {
        let jobs = self.lock();
        for job in jobs.values() {
            job.cancel.cancel();
        }
        jobs.len()
    }
}

/// An admitted job: its spawned task and the lease keeping its key active.
pub struct Admission<T> {
    task: JoinHandle<T>,
    lease: Lease,
}

impl<T> Admission<T> {
    /// Split into the task and the lease.
    pub fn into_parts(self) -> (JoinHandle<T>, Lease) {
        (self.task, self.lease)
    }

    /// Await the task, then evict.
    pub async fn join(self) -> Result<T, JoinError> {
        let Self { task, lease } = self;
        let output = task.await;
        drop(lease);
        output
    }
}

/// Keeps a job's key active. Dropping it evicts the entry.
pub struct Lease {
    registry: Arc<JobRegistry>,
    key: DownloadKey,
    id: LeaseId,
}

impl Drop for Lease {
    fn drop(&mut self) {
        self.registry.release(&self.key, self.id);
    }
}
