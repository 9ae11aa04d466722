//! Per-ability cooldown bookkeeping.

/// A cooldown duration paired with the time the ability last fired.
///
/// Timestamps are boss-clock milliseconds. An ability that never fired is ready.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cooldown {
    pub duration_ms: f64,
    last_triggered_ms: Option<f64>,
}

impl Cooldown {
    pub const fn new(duration_ms: f64) -> Self {
        Self {
            duration_ms,
            last_triggered_ms: None,
        }
    }

    /// Eligible when strictly more than `duration_ms` has passed since the last trigger.
    pub fn is_ready(&self, now_ms: f64) -> bool {
        match self.last_triggered_ms {
            None => true,
            Some(last) => now_ms - last > self.duration_ms,
        }
    }

    pub fn trigger(&mut self, now_ms: f64) {
        self.last_triggered_ms = Some(now_ms);
    }

    /// Make the ability immediately available again.
    pub fn reset(&mut self) {
        self.last_triggered_ms = None;
    }

    pub fn last_triggered_ms(&self) -> Option<f64> {
        self.last_triggered_ms
    }

    /// Milliseconds until ready (0 when ready).
    pub fn remaining_ms(&self, now_ms: f64) -> f64 {
        match self.last_triggered_ms {
            None => 0.0,
            Some(last) => (self.duration_ms - (now_ms - last)).max(0.0),
        }
    }
}
