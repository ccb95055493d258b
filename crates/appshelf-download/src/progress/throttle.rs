//! Progress throttling.
//!
//! Rate-limits notification updates so the OS surface is not flooded.

use std::time::{Duration, Instant};

/// Rate-limiter for one job's notification updates.
///
/// The first check always passes; later checks pass once `min_interval`
/// has elapsed since the last accepted one. Callers pass the clock in, so
/// the bridge and its tests share one code path.
#[derive(Debug, Clone)]
pub struct ProgressThrottle {
    last_emit: Option<Instant>,
    min_interval: Duration,
}

impl ProgressThrottle {
    pub const fn new(min_interval: Duration) -> Self {
        Self {
            last_emit: None,
            min_interval,
        }
    }

    /// Whether an update at `now` is due; records `now` when it is.
    pub fn should_emit_at(&mut self, now: Instant) -> bool {
        match self.last_emit {
            Some(last) if now.saturating_duration_since(last) < self.min_interval => false,
            _ => {
                self.last_emit = Some(now);
                true
            }
        }
    }
}
