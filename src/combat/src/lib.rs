// src/combat/src/lib.rs
//! Turn-based combat: enemy catalog and factory, the shared damage rule and
//! the battle state machine.

pub mod battle;
pub mod catalog;
pub mod config;
pub mod enemy;

#[cfg(test)]
mod tests;

pub use crate::battle::{
    ACTION_MENU, BattleAction, BattleOutcome, BattlePhase, BattleResolver, EnemyMove,
    VictoryReport,
};
pub use crate::catalog::{
    BOSS_TYPES, BossTemplate, LootCategory, LootEntry, MONSTER_TYPES, MonsterTemplate,
    boss_template, loot_table, monster_template,
};
pub use crate::config::BattleConfig;
pub use crate::enemy::{BossRewardPreview, Enemy, EnemyFactory, Loot, LootDrop};

use hero::Player;
use math::Dice;

/// Minimum damage any hit deals
pub const MIN_DAMAGE: u32 = 1;

/// Anything that can stand on either side of a battle
pub trait Combatant {
    fn name(&self) -> &str;

    fn hp(&self) -> u32;

    fn max_hp(&self) -> u32;

    fn attack_power(&self) -> u32;

    fn defense(&self) -> u32;

    fn is_alive(&self) -> bool {
        self.hp() > 0
    }

    /// Defense against the next hit, doubled (by default) while defending
    fn effective_defense(&self, defending: bool, multiplier: u32) -> u32 {
        if defending {
            self.defense().saturating_mul(multiplier)
        } else {
            self.defense()
        }
    }
}

impl Combatant for Enemy {
    fn name(&self) -> &str {
        self.name
    }

    fn hp(&self) -> u32 {
        self.hp
    }

    fn max_hp(&self) -> u32 {
        self.max_hp
    }

    fn attack_power(&self) -> u32 {
        self.attack
    }

    fn defense(&self) -> u32 {
        self.defense
    }
}

impl Combatant for Player {
    fn name(&self) -> &str {
        "Player"
    }

    fn hp(&self) -> u32 {
        self.hp
    }

    fn max_hp(&self) -> u32 {
        self.max_hp
    }

    fn attack_power(&self) -> u32 {
        self.attack()
    }

    fn defense(&self) -> u32 {
        Player::defense(self)
    }
}

/// `max(1, floor(attack + d(-2..=2) - defense / 2))`, used by both sides
pub fn calculate_damage(attack: u32, defense: u32, dice: &mut impl Dice) -> u32 {
    let swing = f64::from(dice.int_range(-2, 2));
    let raw = f64::from(attack) + swing - f64::from(defense) * 0.5;
    if raw < f64::from(MIN_DAMAGE) {
        MIN_DAMAGE
    } else {
        raw.floor() as u32
    }
}
