//! Tick-count timers
//!
//! Every countdown in the simulation (invulnerability, spawn cadence, boss
//! jumps) counts fixed ticks, never wall-clock time, so it scales with the
//! simulation rate rather than the render rate.

use serde::{Deserialize, Serialize};

/// A countdown measured in simulation ticks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    remaining: u32,
}

impl Timer {
    /// Timer that expires after `ticks` calls to [`Timer::tick`]
    pub fn new(ticks: u32) -> Self {
        Self { remaining: ticks }
    }

    /// Restart the countdown
    pub fn arm(&mut self, ticks: u32) {
        self.remaining = ticks;
    }

    /// Advance one tick (saturates at zero)
    pub fn tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    pub fn expired(&self) -> bool {
        self.remaining == 0
    }

    pub fn active(&self) -> bool {
        self.remaining > 0
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn clear(&mut self) {
        self.remaining = 0;
    }
}
