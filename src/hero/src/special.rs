use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Attack names in unlock order
pub const SPECIAL_ATTACK_ORDER: [&str; 4] = ["slash", "fireball", "heal", "ultimate"];

/// Seconds a special attack locks out the next one
pub const SPECIAL_COOLDOWN_SECS: f64 = 0.5;

/// Level- and MP-gated player skill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialAttack {
    pub unlock_level: u32,
    pub damage_multiplier: f64,
    pub mp_cost: u32,
    /// One-way: never reverts to false
    pub learned: bool,
}

impl SpecialAttack {
    fn new(unlock_level: u32, damage_multiplier: f64, mp_cost: u32) -> Self {
        Self {
            unlock_level,
            damage_multiplier,
            mp_cost,
            learned: unlock_level <= 1,
        }
    }

    pub fn deals_damage(&self) -> bool {
        self.damage_multiplier > 0.0
    }
}

pub fn default_special_attacks() -> BTreeMap<String, SpecialAttack> {
    BTreeMap::from([
        ("slash".to_string(), SpecialAttack::new(1, 1.5, 10)),
        ("fireball".to_string(), SpecialAttack::new(5, 2.0, 20)),
        ("heal".to_string(), SpecialAttack::new(8, 0.0, 15)),
        ("ultimate".to_string(), SpecialAttack::new(12, 3.0, 30)),
    ])
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SpecialAttackError {
    #[error("Attack not learned")]
    NotLearned(String),
    #[error("Not enough MP")]
    NotEnoughMp { needed: u32, available: u32 },
    #[error("Attack on cooldown")]
    OnCooldown,
}

impl From<SpecialAttackError> for error::GameError {
    fn from(err: SpecialAttackError) -> Self {
        error::GameError::Rejected(err.to_string())
    }
}

/// Successful special attack; damage is applied by the caller
#[derive(Debug, Clone, PartialEq)]
pub struct SpecialAttackUse {
    pub name: String,
    pub damage: u32,
    pub mp_cost: u32,
}
