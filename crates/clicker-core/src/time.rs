//! Wall-clock time as seen by the engine
//!
//! The engine never reads the system clock itself; every operation that
//! cares about time receives `now` in milliseconds from the host.

use serde::{Deserialize, Serialize};

/// Milliseconds since the Unix epoch
pub type Millis = u64;

/// Convert whole seconds to milliseconds
pub fn secs(s: u64) -> Millis {
    s.saturating_mul(1_000)
}

/// A multiplier that lapses at a wall-clock deadline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedBuff {
    pub multiplier: f64,
    pub expires_at: Millis,
}

impl TimedBuff {
    /// Create a buff lasting `duration` from `now`
    pub fn new(multiplier: f64, now: Millis, duration: Millis) -> Self {
        Self {
            multiplier,
            expires_at: now.saturating_add(duration),
        }
    }

    /// Check whether the buff still applies at `now`
    pub fn is_active(&self, now: Millis) -> bool {
        now < self.expires_at
    }

    /// Multiplier at `now` (1.0 once lapsed)
    pub fn multiplier_at(&self, now: Millis) -> f64 {
        if self.is_active(now) {
            self.multiplier
        } else {
            1.0
        }
    }
}
