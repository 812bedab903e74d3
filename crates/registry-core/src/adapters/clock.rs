//! # Clock Adapters
//!
//! [`TimeSource`] implementations: the system clock for production and a
//! manually advanced clock for tests and deterministic replay.

use crate::domain::value_objects::Timestamp;
use crate::ports::outbound::TimeSource;
use std::sync::atomic::{AtomicU64, Ordering};

/// Default time source using system time.
#[derive(Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> Timestamp {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

/// Deterministic time source driven by the caller.
///
/// Starts at a fixed instant and only moves when told to, so timestamps in
/// records and histories are exactly predictable.
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    /// Creates a clock frozen at the given instant.
    #[must_use]
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: AtomicU64::new(start),
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, seconds: u64) {
        self.now.fetch_add(seconds, Ordering::SeqCst);
    }

    /// Jumps the clock to an absolute instant.
    pub fn set(&self, timestamp: Timestamp) {
        self.now.store(timestamp, Ordering::SeqCst);
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.load(Ordering::SeqCst)
    }
}

impl Default for ManualClock {
    /// Frozen at 2023-11-14 22:13:20 UTC, a fixed instant tests can rely on.
    fn default() -> Self {
        Self::new(1_700_000_000)
    }
}

// =============================================================================
// TESTS
// =============================================================================
