//! Frame clock and loop ownership

use std::cell::Cell;
use std::rc::Rc;

use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Shared cancellation flag for one self-rescheduling frame loop.
///
/// The host checks `is_cancelled()` at the top of every frame and stops
/// rescheduling once it is set.
#[derive(Debug, Clone, Default)]
pub struct LoopHandle {
    cancelled: Rc<Cell<bool>>,
}

impl LoopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

/// The loop handle a game instance hands out on attach
#[derive(Debug, Default)]
pub struct LoopSlot {
    handle: Option<LoopHandle>,
}

impl LoopSlot {
    /// Start a fresh loop, cancelling any previous one
    pub fn attach(&mut self) -> LoopHandle {
        self.detach();
        let handle = LoopHandle::new();
        self.handle = Some(handle.clone());
        handle
    }

    /// Cancel and forget the current loop. Safe to call repeatedly.
    pub fn detach(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.cancel();
        }
    }

    pub fn is_attached(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_cancelled())
    }
}

/// Fixed-timestep accumulator
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
    last_time: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a frame timestamp (ms) and return how many fixed ticks to run
    pub fn advance(&mut self, time_ms: f64) -> u32 {
        let dt = if self.last_time > 0.0 {
            ((time_ms - self.last_time) / 1000.0) as f32
        } else {
            SIM_DT
        };
        self.last_time = time_ms;

        // Clamp long stalls (tab in background)
        self.accumulator += dt.clamp(0.0, 0.25);
        let mut ticks = 0;
        while self.accumulator >= SIM_DT && ticks < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            ticks += 1;
        }
        if ticks == MAX_SUBSTEPS {
            self.accumulator = 0.0;
        }
        ticks
    }

    /// Forget timing history (after a game swap)
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
