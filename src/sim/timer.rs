//! Frame-count timers
//!
//! Durations are counted in simulation ticks (60 per second).

use serde::{Deserialize, Serialize};

/// Countdown timer that fires after `interval` ticks, optionally repeating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickTimer {
    interval: u32,
    remaining: u32,
    repeating: bool,
}

impl TickTimer {
    /// Fires once after `ticks`
    pub fn once(ticks: u32) -> Self {
        Self {
            interval: ticks.max(1),
            remaining: ticks.max(1),
            repeating: false,
        }
    }

    /// Fires every `ticks`
    pub fn every(ticks: u32) -> Self {
        Self {
            repeating: true,
            ..Self::once(ticks)
        }
    }

    /// Advance one tick. Returns true on the tick the timer fires.
    /// A one-shot timer that has fired stays at zero and never fires again.
    pub fn tick(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        if self.remaining == 0 {
            if self.repeating {
                self.remaining = self.interval;
            }
            return true;
        }
        false
    }
}
