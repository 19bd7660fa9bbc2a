//! Wall-clock sources.
//!
//! Session timestamps are epoch milliseconds, the same unit the persisted
//! `login_time` key and the token `exp` claim comparison use.

use chrono::Utc;
use tokio::time::Instant;

/// Source of the current time in epoch milliseconds.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

/// System wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Wall clock derived from tokio's monotonic clock.
///
/// Anchored at construction to an epoch timestamp and advanced by tokio's
/// `Instant`, so it moves with `tokio::time::pause`/`advance` and never jumps
/// backwards when the system clock is adjusted.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    anchor_ms: i64,
    anchor: Instant,
}

impl MonotonicClock {
    /// Anchor to the current system time.
    pub fn new() -> Self {
        Self::starting_at(Utc::now().timestamp_millis())
    }

    /// Anchor to an explicit epoch timestamp.
    pub fn starting_at(anchor_ms: i64) -> Self {
        Self {
            anchor_ms,
            anchor: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_millis(&self) -> i64 {
        self.anchor_ms + self.anchor.elapsed().as_millis() as i64
    }
}
