// src/save/src/autosave.rs
use serde::{Deserialize, Serialize};

/// Periodic save trigger polled from the game loop
///
/// It only measures time; the owner performs the actual save, so an
/// in-progress battle is never blocked by it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoSave {
    pub enabled: bool,
    interval_ms: u64,
    elapsed_ms: u64,
    saves: u32,
}

impl AutoSave {
    pub fn new(interval_ms: u64, enabled: bool) -> Self {
        Self {
            enabled,
            interval_ms: interval_ms.max(1),
            elapsed_ms: 0,
            saves: 0,
        }
    }

    /// Advance the clock; true when a save is due
    pub fn update(&mut self, delta_ms: u64) -> bool {
        if !self.enabled {
            return false;
        }
        self.elapsed_ms = self.elapsed_ms.saturating_add(delta_ms);
        if self.elapsed_ms < self.interval_ms {
            return false;
        }
        self.elapsed_ms %= self.interval_ms;
        self.saves += 1;
        true
    }

    /// Restart the interval after a manual save
    pub fn reset(&mut self) {
        self.elapsed_ms = 0;
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn set_interval_ms(&mut self, interval_ms: u64) {
        self.interval_ms = interval_ms.max(1);
    }

    pub fn time_until_next_ms(&self) -> u64 {
        self.interval_ms.saturating_sub(self.elapsed_ms)
    }

    /// Saves triggered so far
    pub fn save_count(&self) -> u32 {
        self.saves
    }
}
