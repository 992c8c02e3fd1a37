// src/combat/src/battle.rs
//! Turn state machine for a single encounter
//!
//! The resolver owns the enemy for the length of the battle and mutates the
//! shared [`Player`] in place. Player actions resolve immediately; the enemy's
//! reply is queued and resolves from [`BattleResolver::update`] once the
//! configured delay has elapsed.

use hero::Player;
use items::EffectKind;
use math::Dice;
use progression::{BossRewardGrant, ProgressionManager};
use serde::Serialize;
use strum_macros::Display;

use crate::config::BattleConfig;
use crate::enemy::{Enemy, EnemyFactory, LootDrop};
use crate::{Combatant, calculate_damage};

/// Menu labels in selection order
pub const ACTION_MENU: [&str; 5] = ["Attack", "Defend", "Special", "Item", "Run"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BattleAction {
    Attack,
    Defend,
    /// `None` picks the strongest learned damaging attack
    Special(Option<String>),
    /// `None` picks the first healing consumable
    Item(Option<usize>),
    Run,
}

impl BattleAction {
    /// Map a menu index to its default action
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Attack),
            1 => Some(Self::Defend),
            2 => Some(Self::Special(None)),
            3 => Some(Self::Item(None)),
            4 => Some(Self::Run),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
pub enum BattleOutcome {
    Victory,
    Defeat,
    Fled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattlePhase {
    PlayerTurn,
    /// Enemy reply queued; resolves once `elapsed_ms` reaches the delay
    EnemyTurn { elapsed_ms: u64 },
    Over(BattleOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum EnemyMove {
    Attack,
    Defend,
    Special,
}

/// Everything a victory handed out
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VictoryReport {
    pub experience: u32,
    pub gold: u32,
    pub levels_gained: u32,
    pub new_level: u32,
    pub boss_reward: Option<BossRewardGrant>,
    pub loot: Vec<LootDrop>,
    /// Drops that did not fit in the inventory
    pub lost_loot: Vec<LootDrop>,
    pub new_unlocks: Vec<&'static str>,
}

#[derive(Debug, Clone)]
pub struct BattleResolver {
    enemy: Enemy,
    phase: BattlePhase,
    log: Vec<String>,
    player_defending: bool,
    enemy_defending: bool,
    turn: u32,
    config: BattleConfig,
    progression: ProgressionManager,
    report: Option<VictoryReport>,
}

impl BattleResolver {
    pub fn new(enemy: Enemy) -> Self {
        Self::with_config(enemy, BattleConfig::default())
    }

    pub fn with_config(enemy: Enemy, config: BattleConfig) -> Self {
        log::info!(
            "battle started against {} ({}, boss: {})",
            enemy.name,
            enemy.id,
            enemy.is_boss
        );
        Self {
            enemy,
            phase: BattlePhase::PlayerTurn,
            log: vec!["Battle Started!".to_string(), "Choose your action.".to_string()],
            player_defending: false,
            enemy_defending: false,
            turn: 1,
            config,
            progression: ProgressionManager::new(),
            report: None,
        }
    }

    /* ==== read-only state ==== */

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn is_player_turn(&self) -> bool {
        self.phase == BattlePhase::PlayerTurn
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, BattlePhase::Over(_))
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        match self.phase {
            BattlePhase::Over(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn is_victory(&self) -> bool {
        self.outcome() == Some(BattleOutcome::Victory)
    }

    pub fn enemy(&self) -> &Enemy {
        &self.enemy
    }

    pub fn log(&self) -> &[String] {
        &self.log
    }

    pub fn player_defending(&self) -> bool {
        self.player_defending
    }

    pub fn enemy_defending(&self) -> bool {
        self.enemy_defending
    }

    /// Current round, starting at 1
    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn report(&self) -> Option<&VictoryReport> {
        self.report.as_ref()
    }

    /// Progress of the enemy's pending move in `[0, 1]`
    pub fn enemy_turn_progress(&self) -> f64 {
        match self.phase {
            BattlePhase::EnemyTurn { elapsed_ms } if self.config.enemy_turn_delay_ms > 0 => {
                (elapsed_ms as f64 / self.config.enemy_turn_delay_ms as f64).min(1.0)
            }
            BattlePhase::EnemyTurn { .. } => 1.0,
            _ => 0.0,
        }
    }

    /* ==== player turn ==== */

    /// Run the menu entry at `index`; unknown indices are a logged no-op
    pub fn select_action(&mut self, index: usize, player: &mut Player, dice: &mut impl Dice) -> bool {
        match BattleAction::from_index(index) {
            Some(action) => self.perform(action, player, dice),
            None => {
                log::warn!("invalid battle action index {index}");
                false
            }
        }
    }

    /// Resolve one player action
    ///
    /// Returns `false` when the action was refused (wrong phase, nothing to
    /// use, special attack unavailable). A refused action never hands the
    /// turn to the enemy.
    pub fn perform(&mut self, action: BattleAction, player: &mut Player, dice: &mut impl Dice) -> bool {
        if self.phase != BattlePhase::PlayerTurn {
            log::debug!("ignoring {action:?} outside the player turn");
            return false;
        }
        self.player_defending = false;

        let acted = match action {
            BattleAction::Attack => {
                let damage = calculate_damage(player.attack_power(), self.enemy_guard(), dice);
                self.enemy.apply_damage(damage);
                self.push(format!("Player attacks for {damage} damage!"));
                true
            }
            BattleAction::Defend => {
                self.player_defending = true;
                self.push("Player defends!");
                true
            }
            BattleAction::Special(name) => self.player_special(name, player, dice),
            BattleAction::Item(slot) => self.player_item(slot, player),
            BattleAction::Run => {
                let chance = self.config.flee_chance(player.level);
                if dice.percent() <= chance as i32 {
                    self.push("Player fled from battle!");
                    log::info!("player fled from {}", self.enemy.name);
                    self.phase = BattlePhase::Over(BattleOutcome::Fled);
                    return true;
                }
                self.push("Could not escape!");
                true
            }
        };
        if !acted {
            return false;
        }

        if !self.enemy.is_alive() {
            self.resolve_victory(player, dice);
        } else {
            self.turn += 1;
            self.phase = BattlePhase::EnemyTurn { elapsed_ms: 0 };
        }
        true
    }

    fn enemy_guard(&self) -> u32 {
        self.enemy
            .effective_defense(self.enemy_defending, self.config.defend_multiplier)
    }

    fn player_special(&mut self, name: Option<String>, player: &mut Player, dice: &mut impl Dice) -> bool {
        let Some(name) = name.or_else(|| player.default_special_attack().map(str::to_string)) else {
            self.push("No special attacks available!");
            return false;
        };
        if player
            .special_attacks
            .get(&name)
            .is_some_and(|a| a.learned && !a.deals_damage())
        {
            self.push(format!("{name} cannot be used in battle!"));
            return false;
        }

        match player.use_special_attack(&name) {
            Ok(used) => {
                let damage = calculate_damage(used.damage, self.enemy_guard(), dice);
                self.enemy.apply_damage(damage);
                self.push(format!("Player uses {name} for {damage} damage!"));
                true
            }
            Err(err) => {
                log::debug!("special attack {name} refused: {err}");
                self.push(err.to_string());
                false
            }
        }
    }

    fn player_item(&mut self, slot: Option<usize>, player: &mut Player) -> bool {
        if player.inventory.is_empty() {
            self.push("No items available!");
            return false;
        }
        let slot = slot.or_else(|| {
            player.inventory.items().iter().position(|item| {
                item.template()
                    .is_some_and(|t| t.effect() == Some(EffectKind::Heal))
            })
        });
        let Some(slot) = slot else {
            self.push("No usable items available!");
            return false;
        };

        match player.use_item(slot, 1) {
            Ok(message) => {
                self.push(message);
                true
            }
            Err(err) => {
                self.push(err.to_string());
                false
            }
        }
    }

    /* ==== enemy turn ==== */

    /// Advance the pending enemy move; returns the move once it resolves
    pub fn update(&mut self, delta_ms: u64, player: &mut Player, dice: &mut impl Dice) -> Option<EnemyMove> {
        let BattlePhase::EnemyTurn { elapsed_ms } = &mut self.phase else {
            return None;
        };
        *elapsed_ms = elapsed_ms.saturating_add(delta_ms);
        if *elapsed_ms < self.config.enemy_turn_delay_ms {
            return None;
        }
        Some(self.resolve_enemy_turn(player, dice))
    }

    fn resolve_enemy_turn(&mut self, player: &mut Player, dice: &mut impl Dice) -> EnemyMove {
        self.enemy_defending = false;

        let roll = dice.percent();
        let chosen = if roll <= self.config.enemy_attack_threshold {
            EnemyMove::Attack
        } else if roll <= self.config.enemy_defend_threshold {
            EnemyMove::Defend
        } else {
            EnemyMove::Special
        };

        let guard = player.effective_defense(self.player_defending, self.config.defend_multiplier);
        match chosen {
            EnemyMove::Attack => {
                let damage = calculate_damage(self.enemy.attack, guard, dice);
                let taken = player.take_damage(damage);
                self.push(format!("{} attacks for {taken} damage!", self.enemy.name));
            }
            EnemyMove::Defend => {
                self.enemy_defending = true;
                self.push(format!("{} defends!", self.enemy.name));
            }
            EnemyMove::Special => {
                let raw = (f64::from(self.enemy.attack) * self.config.enemy_special_multiplier).floor() as u32;
                let damage = calculate_damage(raw, guard, dice);
                let taken = player.take_damage(damage);
                self.push(format!(
                    "{} uses special attack for {taken} damage!",
                    self.enemy.name
                ));
            }
        }

        if player.is_alive() {
            self.phase = BattlePhase::PlayerTurn;
        } else {
            self.push("Player defeated! Game Over!");
            log::info!("player defeated by {}", self.enemy.name);
            self.phase = BattlePhase::Over(BattleOutcome::Defeat);
        }
        chosen
    }

    /* ==== victory ==== */

    fn resolve_victory(&mut self, player: &mut Player, dice: &mut impl Dice) {
        let enemy = self.enemy.clone();
        self.push(format!("{} defeated! Victory!", enemy.name));
        let unlocks_before = self.progression.check_level_unlocks(player);

        let mut levels_gained = player.gain_experience(enemy.exp_reward);
        if levels_gained > 0 {
            self.push(format!("LEVEL UP! You are now level {}!", player.level));
        }
        player.add_gold(enemy.gold_reward);
        player.missions.record_kill(enemy.name);
        player.enemies_defeated = player.enemies_defeated.saturating_add(1);

        let mut boss_reward = None;
        if enemy.is_boss {
            boss_reward = self.progression.apply_boss_rewards(player, enemy.template_id);
            if let Some(grant) = &boss_reward {
                self.push(grant.description);
                if grant.levels_gained > 0 {
                    levels_gained += grant.levels_gained;
                    self.push(format!("LEVEL UP! You are now level {}!", player.level));
                }
            }
            // bosses without a reward entry still count as beaten
            player.defeat_boss(enemy.template_id);
        }

        let luck = if enemy.is_boss {
            self.config.boss_loot_luck
        } else {
            self.config.loot_luck
        };
        let loot = EnemyFactory::generate_loot(&enemy, luck, dice);
        let mut granted = Vec::new();
        let mut lost = Vec::new();
        if !loot.items.is_empty() {
            self.push("Found items:");
            for found in loot.items {
                let name = items::template(found.template_id).map_or(found.template_id, |t| t.name);
                match player.add_item(found.template_id, found.quantity) {
                    Ok(_) => {
                        self.push(format!("  {name} x{}", found.quantity));
                        granted.push(found);
                    }
                    Err(err) => {
                        log::warn!("loot {} dropped: {err}", found.template_id);
                        self.push(format!("  {name} x{} (inventory full)", found.quantity));
                        lost.push(found);
                    }
                }
            }
        }

        let new_unlocks: Vec<&'static str> = self
            .progression
            .check_level_unlocks(player)
            .into_iter()
            .filter(|u| !unlocks_before.contains(u))
            .collect();
        if !new_unlocks.is_empty() {
            self.push("New content unlocked!");
        }
        self.push(format!(
            "Gained {} EXP and {} gold!",
            enemy.exp_reward, enemy.gold_reward
        ));

        log::info!(
            "victory over {}: {} exp, {} gold, {} drops",
            enemy.name,
            enemy.exp_reward,
            enemy.gold_reward,
            granted.len()
        );
        self.report = Some(VictoryReport {
            experience: enemy.exp_reward,
            gold: enemy.gold_reward,
            levels_gained,
            new_level: player.level,
            boss_reward,
            loot: granted,
            lost_loot: lost,
            new_unlocks,
        });
        self.phase = BattlePhase::Over(BattleOutcome::Victory);
    }

    fn push(&mut self, line: impl Into<String>) {
        self.log.push(line.into());
    }
}
