//! Countdown timer state and its mutation rules

use std::sync::Mutex;

use serde::Serialize;
use tracing::{debug, info};

use crate::hardware::Latch;

/// Default upper bound of the countdown: two hours
pub const DEFAULT_MAX_SECONDS: u64 = 2 * 60 * 60;

/// Consistent view of the timer taken under its lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimerSnapshot {
    pub remaining_seconds: u64,
    pub max_seconds: u64,
    pub latch_energized: bool,
}

/// Outcome of a single adjust call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjustment {
    pub delta: i64,
    pub before: u64,
    pub after: u64,
    /// Part of a positive delta discarded by the cap
    pub truncated: bool,
}

struct TimerInner {
    remaining_seconds: u64,
    latch: Box<dyn Latch>,
}

/// The single countdown shared by the decrement loop, the command
/// dispatcher and the status publisher.
///
/// Every read and write holds one lock, including the latch side effect
/// derived from the value, so no caller can act on a stale value.
/// `0 <= remaining_seconds <= max_seconds` holds after every call.
pub struct CountdownTimer {
    max_seconds: u64,
    inner: Mutex<TimerInner>,
}

impl std::fmt::Debug for CountdownTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountdownTimer")
            .field("max_seconds", &self.max_seconds)
            .finish_non_exhaustive()
    }
}

impl CountdownTimer {
    /// Create a stopped timer driving `latch`
    pub fn new(max_seconds: u64, latch: Box<dyn Latch>) -> Self {
        Self {
            max_seconds,
            inner: Mutex::new(TimerInner {
                remaining_seconds: 0,
                latch,
            }),
        }
    }

    pub fn max_seconds(&self) -> u64 {
        self.max_seconds
    }

    /// Count down one second, switching the latch off when zero is reached.
    ///
    /// A stopped timer is left untouched. Returns the remaining seconds.
    pub fn decrement_one(&self) -> Result<u64, String> {
        let mut inner = self.inner.lock()
            .map_err(|e| format!("Failed to lock countdown timer: {}", e))?;

        if inner.remaining_seconds == 0 {
            return Ok(0);
        }

        inner.remaining_seconds -= 1;
        if inner.remaining_seconds == 0 {
            info!("Timer now at 0, shutting off latch");
            inner.latch.deactivate();
        }

        Ok(inner.remaining_seconds)
    }

    /// Add (`delta >= 0`) or subtract (`delta < 0`) seconds.
    ///
    /// Additions are capped at `max_seconds` and always switch the latch on,
    /// even for a zero delta. Subtractions saturate at zero; reaching zero
    /// switches the latch off, staying positive leaves it alone.
    pub fn adjust_by_delta(&self, delta: i64) -> Result<Adjustment, String> {
        let mut inner = self.inner.lock()
            .map_err(|e| format!("Failed to lock countdown timer: {}", e))?;

        let before = inner.remaining_seconds;
        let mut truncated = false;

        if delta < 0 {
            let magnitude = delta.unsigned_abs();
            // Landing on zero counts as running out
            if magnitude >= before {
                inner.remaining_seconds = 0;
                inner.latch.deactivate();
            } else {
                inner.remaining_seconds = before - magnitude;
            }
            info!(
                "Subtracted {} seconds so timer is now at {}, was at {} seconds",
                magnitude, inner.remaining_seconds, before
            );
        } else {
            let sum = before.saturating_add(delta.unsigned_abs());
            if sum >= self.max_seconds {
                truncated = sum > self.max_seconds;
                if truncated {
                    info!("Timer truncated to {} seconds", self.max_seconds);
                }
                inner.remaining_seconds = self.max_seconds;
            } else {
                inner.remaining_seconds = sum;
            }
            info!(
                "Added {} seconds so timer is now at {}, was at {} seconds",
                delta, inner.remaining_seconds, before
            );
            inner.latch.activate();
        }

        Ok(Adjustment {
            delta,
            before,
            after: inner.remaining_seconds,
            truncated,
        })
    }

    /// Read the timer under the same lock the mutators use
    pub fn snapshot(&self) -> Result<TimerSnapshot, String> {
        let inner = self.inner.lock()
            .map_err(|e| format!("Failed to lock countdown timer: {}", e))?;

        Ok(TimerSnapshot {
            remaining_seconds: inner.remaining_seconds,
            max_seconds: self.max_seconds,
            latch_energized: inner.latch.is_energized(),
        })
    }

    /// Force the latch off without touching the remaining time.
    ///
    /// Used once when the decrement loop starts and on the way out of the
    /// process.
    pub fn force_latch_off(&self) -> Result<(), String> {
        let mut inner = self.inner.lock()
            .map_err(|e| format!("Failed to lock countdown timer: {}", e))?;

        debug!("Forcing latch off at {} remaining seconds", inner.remaining_seconds);
        inner.latch.deactivate();
        Ok(())
    }
}
