use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Per-player mission progress plus the kill ledger shared with combat
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionLog {
    pub active: Vec<String>,
    pub completed: Vec<String>,
    /// Keyed by lowercase enemy name
    pub kill_counts: BTreeMap<String, u32>,
}

impl MissionLog {
    /// Count one kill, returning the new total for that enemy
    pub fn record_kill(&mut self, enemy_name: &str) -> u32 {
        let count = self
            .kill_counts
            .entry(enemy_name.to_lowercase())
            .or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    pub fn kills(&self, enemy_name: &str) -> u32 {
        self.kill_counts
            .get(&enemy_name.to_lowercase())
            .copied()
            .unwrap_or(0)
    }

    pub fn is_active(&self, mission_id: &str) -> bool {
        self.active.iter().any(|m| m == mission_id)
    }

    pub fn is_completed(&self, mission_id: &str) -> bool {
        self.completed.iter().any(|m| m == mission_id)
    }

    /// False if the mission is already active or done
    pub fn activate(&mut self, mission_id: &str) -> bool {
        if self.is_active(mission_id) || self.is_completed(mission_id) {
            return false;
        }
        self.active.push(mission_id.to_string());
        true
    }

    /// Move an active mission to the completed list
    pub fn complete(&mut self, mission_id: &str) -> bool {
        let Some(idx) = self.active.iter().position(|m| m == mission_id) else {
            return false;
        };
        let id = self.active.remove(idx);
        self.completed.push(id);
        true
    }
}
