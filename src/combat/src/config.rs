// src/combat/src/config.rs
use serde::{Deserialize, Serialize};

/// Tunables for one battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Pause before the enemy's move resolves
    pub enemy_turn_delay_ms: u64,
    /// Flee chance in percent at level 0
    pub flee_base_chance: u32,
    pub flee_chance_per_level: u32,
    pub loot_luck: f64,
    pub boss_loot_luck: f64,
    /// Defense multiplier while defending
    pub defend_multiplier: u32,
    pub enemy_special_multiplier: f64,
    /// d100 at or below this attacks
    pub enemy_attack_threshold: i32,
    /// d100 at or below this (and above the attack threshold) defends
    pub enemy_defend_threshold: i32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            enemy_turn_delay_ms: 1500,
            flee_base_chance: 50,
            flee_chance_per_level: 5,
            loot_luck: 1.0,
            boss_loot_luck: 1.5,
            defend_multiplier: 2,
            enemy_special_multiplier: 1.5,
            enemy_attack_threshold: 60,
            enemy_defend_threshold: 80,
        }
    }
}

impl BattleConfig {
    /// No dramatic pause; the enemy moves on the next update
    pub fn instant() -> Self {
        Self {
            enemy_turn_delay_ms: 0,
            ..Self::default()
        }
    }

    pub fn flee_chance(&self, level: u32) -> u32 {
        self.flee_base_chance
            .saturating_add(level.saturating_mul(self.flee_chance_per_level))
    }
}
