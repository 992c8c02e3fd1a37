// src/hero/src/player.rs
use std::collections::{BTreeMap, BTreeSet};

use items::{EffectOutcome, EffectTarget, EquipSlot, StatBuff, apply_effect, template};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::bag::{AddReport, EquipReport, Inventory, InventoryError, UseRequest};
use crate::bag::equipment::Equipment;
use crate::missions::MissionLog;
use crate::special::{
    SPECIAL_COOLDOWN_SECS, SpecialAttack, SpecialAttackError, SpecialAttackUse,
    default_special_attacks,
};
use crate::timers::{Scheduler, TimerHandle};

pub const STARTING_GOLD: u32 = 100;
pub const STARTING_POSITION: (f64, f64) = (100.0, 100.0);
pub const STARTING_REGION: &str = "plains";
/// MP regained per second outside of item effects
pub const MP_REGEN_PER_SEC: u32 = 1;

const HP_PER_LEVEL: u32 = 10;
const ATTACK_PER_LEVEL: u32 = 3;
const DEFENSE_PER_LEVEL: u32 = 2;
const MP_PER_LEVEL: u32 = 5;

/// Experience needed to advance from `level` to `level + 1`
pub fn experience_for_level(level: u32) -> u32 {
    let exponent = f64::from(level.max(1) - 1);
    (100.0 * 1.2_f64.powf(exponent)).floor() as u32
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Facing {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

/// Something the frame update resolved that the scene may want to show
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    ItemUsed {
        template_id: String,
        outcome: EffectOutcome,
    },
    /// The item left the inventory before its use delay elapsed
    ItemUseAborted { template_id: String },
    BuffExpired(StatBuff),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimedEvent {
    ItemUse { item_id: u64 },
    BuffExpired { buff_id: u64 },
}

#[derive(Debug, Clone)]
struct ActiveBuff {
    id: u64,
    buff: StatBuff,
    handle: TimerHandle,
}

/// Compact stat summary for HUDs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerStatus {
    pub level: u32,
    pub experience: u32,
    pub experience_to_next: u32,
    pub hp: u32,
    pub max_hp: u32,
    pub mp: u32,
    pub max_mp: u32,
    pub attack: u32,
    pub defense: u32,
    pub gold: u32,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub level: u32,
    pub experience: u32,
    pub experience_to_next: u32,
    pub hp: u32,
    /// Includes max-HP bonuses from active buffs
    pub max_hp: u32,
    pub mp: u32,
    pub max_mp: u32,
    pub base_attack: u32,
    pub base_defense: u32,
    attack: u32,
    defense: u32,
    pub special_attacks: BTreeMap<String, SpecialAttack>,
    pub equipment: Equipment,
    pub inventory: Inventory,

    /* ==== progression ==== */
    pub defeated_bosses: Vec<String>,
    pub visited_areas: BTreeSet<String>,
    pub missions: MissionLog,
    pub total_gold_earned: u64,
    pub enemies_defeated: u32,

    /* ==== world ==== */
    pub x: f64,
    pub y: f64,
    pub facing: Facing,
    /// Seconds until the next special attack is allowed
    pub combat_cooldown: f64,
    pub current_region: String,
    pub last_town: Option<String>,
    pub world_flags: BTreeMap<String, bool>,

    buffs: Vec<ActiveBuff>,
    timers: Scheduler<TimedEvent>,
    mp_regen_ms: u64,
    next_buff_id: u64,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    pub fn new() -> Self {
        let mut inventory = Inventory::new();
        inventory.gold = STARTING_GOLD;

        let mut player = Self {
            level: 1,
            experience: 0,
            experience_to_next: experience_for_level(1),
            hp: 50,
            max_hp: 50,
            mp: 50,
            max_mp: 50,
            base_attack: 10,
            base_defense: 5,
            attack: 0,
            defense: 0,
            special_attacks: default_special_attacks(),
            equipment: Equipment::default(),
            inventory,
            defeated_bosses: Vec::new(),
            visited_areas: BTreeSet::new(),
            missions: MissionLog::default(),
            total_gold_earned: 0,
            enemies_defeated: 0,
            x: STARTING_POSITION.0,
            y: STARTING_POSITION.1,
            facing: Facing::default(),
            combat_cooldown: 0.0,
            current_region: STARTING_REGION.to_string(),
            last_town: None,
            world_flags: BTreeMap::new(),
            buffs: Vec::new(),
            timers: Scheduler::new(),
            mp_regen_ms: 0,
            next_buff_id: 0,
        };
        player.update_derived_stats();
        player
    }

    pub fn attack(&self) -> u32 {
        self.attack
    }

    pub fn defense(&self) -> u32 {
        self.defense
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn gold(&self) -> u32 {
        self.inventory.gold
    }

    /// Sum of every active potion buff
    pub fn buff_total(&self) -> StatBuff {
        self.buffs
            .iter()
            .fold(StatBuff::default(), |acc, b| acc.merged(b.buff))
    }

    /// Max HP with buff bonuses removed; this is what gets persisted
    pub fn unbuffed_max_hp(&self) -> u32 {
        self.max_hp.saturating_sub(self.buff_total().max_hp)
    }

    pub fn unbuffed_max_mp(&self) -> u32 {
        self.max_mp.saturating_sub(self.buff_total().max_mp)
    }

    pub fn status(&self) -> PlayerStatus {
        PlayerStatus {
            level: self.level,
            experience: self.experience,
            experience_to_next: self.experience_to_next,
            hp: self.hp,
            max_hp: self.max_hp,
            mp: self.mp,
            max_mp: self.max_mp,
            attack: self.attack,
            defense: self.defense,
            gold: self.inventory.gold,
        }
    }

    /* ==== leveling ==== */

    /// Add experience, levelling up as many times as it covers
    ///
    /// Returns the number of levels gained.
    pub fn gain_experience(&mut self, amount: u32) -> u32 {
        self.experience = self.experience.saturating_add(amount);
        let mut gained = 0;
        while self.experience >= self.experience_to_next {
            self.level_up();
            gained += 1;
        }
        gained
    }

    pub fn level_up(&mut self) {
        self.experience = self.experience.saturating_sub(self.experience_to_next);
        self.level += 1;
        self.experience_to_next = experience_for_level(self.level);

        self.max_hp += HP_PER_LEVEL;
        self.base_attack += ATTACK_PER_LEVEL;
        self.base_defense += DEFENSE_PER_LEVEL;
        self.max_mp += MP_PER_LEVEL;

        self.update_derived_stats();
        self.hp = self.max_hp;
        self.mp = self.max_mp;

        let learned = self.check_special_attack_unlocks();
        log::info!("player reached level {}", self.level);
        for name in learned {
            log::info!("learned special attack {name}");
        }
    }

    /// Mark every attack whose unlock level has been reached as learned
    ///
    /// Returns the names newly learned by this call.
    pub fn check_special_attack_unlocks(&mut self) -> Vec<String> {
        let level = self.level;
        self.special_attacks
            .iter_mut()
            .filter(|(_, a)| !a.learned && level >= a.unlock_level)
            .map(|(name, a)| {
                a.learned = true;
                name.clone()
            })
            .collect()
    }

    /// Recompute attack and defense from base stats, equipment and buffs
    pub fn update_derived_stats(&mut self) {
        let buffs = self.buff_total();
        self.attack = self.base_attack + self.equipment.attack_bonus() + buffs.attack;
        self.defense = self.base_defense + self.equipment.defense_bonus() + buffs.defense;
    }

    /* ==== combat ==== */

    pub fn use_special_attack(&mut self, name: &str) -> Result<SpecialAttackUse, SpecialAttackError> {
        let attack = self
            .special_attacks
            .get(name)
            .filter(|a| a.learned)
            .ok_or_else(|| SpecialAttackError::NotLearned(name.to_string()))?;
        if self.mp < attack.mp_cost {
            return Err(SpecialAttackError::NotEnoughMp {
                needed: attack.mp_cost,
                available: self.mp,
            });
        }
        if self.combat_cooldown > 0.0 {
            return Err(SpecialAttackError::OnCooldown);
        }

        let mp_cost = attack.mp_cost;
        let damage = (f64::from(self.attack) * attack.damage_multiplier).floor() as u32;
        self.mp -= mp_cost;
        self.combat_cooldown = SPECIAL_COOLDOWN_SECS;

        Ok(SpecialAttackUse {
            name: name.to_string(),
            damage,
            mp_cost,
        })
    }

    /// Strongest learned damaging attack
    pub fn default_special_attack(&self) -> Option<&str> {
        self.special_attacks
            .iter()
            .filter(|(_, a)| a.learned && a.deals_damage())
            .max_by_key(|(_, a)| a.unlock_level)
            .map(|(name, _)| name.as_str())
    }

    /// Apply an incoming hit, returning the damage actually taken
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let actual = amount.saturating_sub(self.defense).max(1);
        self.hp = self.hp.saturating_sub(actual);
        actual
    }

    /* ==== gold ==== */

    pub fn add_gold(&mut self, amount: u32) {
        self.inventory.add_gold(amount);
        self.total_gold_earned = self.total_gold_earned.saturating_add(u64::from(amount));
    }

    pub fn spend_gold(&mut self, amount: u32) -> Result<(), InventoryError> {
        self.inventory.spend_gold(amount)
    }

    /* ==== inventory ==== */

    pub fn add_item(&mut self, template_id: &str, quantity: u32) -> Result<AddReport, InventoryError> {
        self.inventory.add_item(template_id, quantity)
    }

    pub fn remove_item(&mut self, slot: usize, quantity: u32) -> Result<u32, InventoryError> {
        self.inventory.remove_item(slot, quantity)
    }

    /// Start using a slot; the effect lands after the item's use delay
    ///
    /// Equipment is equipped immediately instead.
    pub fn use_item(&mut self, slot: usize, quantity: u32) -> Result<String, InventoryError> {
        match self.inventory.use_item(slot, quantity)? {
            UseRequest::Equip => self.equip_item(slot).map(|report| report.message),
            UseRequest::Consume(pending) => {
                self.timers.schedule(
                    pending.duration_ms,
                    TimedEvent::ItemUse {
                        item_id: pending.item_id,
                    },
                );
                let name = template(&pending.template_id).map_or("item", |t| t.name);
                Ok(format!("Using {name}..."))
            }
        }
    }

    pub fn use_quick_slot(&mut self, slot_num: usize) -> Result<String, InventoryError> {
        let slot = self.inventory.quick_slot_target(slot_num)?;
        self.use_item(slot, 1)
    }

    pub fn equip_item(&mut self, slot: usize) -> Result<EquipReport, InventoryError> {
        let report = self.inventory.equip_item(slot, &mut self.equipment)?;
        self.update_derived_stats();
        Ok(report)
    }

    pub fn unequip_item(&mut self, slot: EquipSlot) -> Result<String, InventoryError> {
        let item = self.inventory.unequip_item(slot, &mut self.equipment)?;
        self.update_derived_stats();
        Ok(item)
    }

    pub fn sort_inventory(&mut self, mode: crate::bag::SortMode) {
        self.inventory.sort_inventory(mode);
    }

    /* ==== per-frame ==== */

    /// Advance cooldowns, MP regeneration and scheduled effects
    pub fn update(&mut self, delta_ms: u64) -> Vec<PlayerEvent> {
        if self.combat_cooldown > 0.0 {
            self.combat_cooldown = (self.combat_cooldown - delta_ms as f64 / 1000.0).max(0.0);
        }

        self.mp_regen_ms += delta_ms;
        let seconds = self.mp_regen_ms / 1000;
        self.mp_regen_ms %= 1000;
        if seconds > 0 {
            let amount = u32::try_from(seconds).unwrap_or(u32::MAX);
            self.restore_mp(amount.saturating_mul(MP_REGEN_PER_SEC));
        }

        self.inventory.update(delta_ms);

        let mut events = Vec::new();
        for task in self.timers.advance(delta_ms) {
            match task {
                TimedEvent::ItemUse { item_id } => {
                    if let Some(event) = self.finish_item_use(item_id) {
                        events.push(event);
                    }
                }
                TimedEvent::BuffExpired { buff_id } => {
                    if let Some(buff) = self.expire_buff(buff_id) {
                        events.push(PlayerEvent::BuffExpired(buff));
                    }
                }
            }
        }
        events
    }

    fn finish_item_use(&mut self, item_id: u64) -> Option<PlayerEvent> {
        let pending = self.inventory.finish_use(item_id)?;
        let still_held = self
            .inventory
            .find_by_id(item_id)
            .is_some_and(|i| i.quantity >= pending.quantity);
        let found = template(&pending.template_id);

        let Some(item) = found.filter(|_| still_held) else {
            log::debug!("item use of {} aborted", pending.template_id);
            return Some(PlayerEvent::ItemUseAborted {
                template_id: pending.template_id,
            });
        };

        let outcome = apply_effect(self, item, pending.quantity);
        if outcome.success {
            self.inventory.remove_by_id(item_id, pending.quantity);
        }
        Some(PlayerEvent::ItemUsed {
            template_id: pending.template_id,
            outcome,
        })
    }

    fn expire_buff(&mut self, buff_id: u64) -> Option<StatBuff> {
        let idx = self.buffs.iter().position(|b| b.id == buff_id)?;
        let buff = self.buffs.remove(idx).buff;
        self.revert_buff(buff);
        Some(buff)
    }

    fn revert_buff(&mut self, buff: StatBuff) {
        self.max_hp = self.max_hp.saturating_sub(buff.max_hp);
        self.max_mp = self.max_mp.saturating_sub(buff.max_mp);
        self.hp = self.hp.min(self.max_hp);
        self.mp = self.mp.min(self.max_mp);
        self.update_derived_stats();
    }

    /// Drop every scheduled effect and revert active buffs
    pub fn cancel_timers(&mut self) {
        for buff in std::mem::take(&mut self.buffs) {
            self.timers.cancel(buff.handle);
            self.revert_buff(buff.buff);
        }
        self.timers.clear();
        self.inventory.cancel_use();
    }

    pub fn has_pending_timers(&self) -> bool {
        !self.timers.is_empty()
    }

    /* ==== world ==== */

    pub fn grid_position(&self) -> (i32, i32) {
        math::pixel_to_grid(self.x, self.y, math::TILE_SIZE)
    }

    /// Record a boss kill; false if it was already recorded
    pub fn defeat_boss(&mut self, boss_id: &str) -> bool {
        if self.has_defeated(boss_id) {
            return false;
        }
        self.defeated_bosses.push(boss_id.to_string());
        true
    }

    pub fn has_defeated(&self, boss_id: &str) -> bool {
        self.defeated_bosses.iter().any(|b| b == boss_id)
    }

    pub fn visit_area(&mut self, area: &str) -> bool {
        self.visited_areas.insert(area.to_string())
    }
}

impl EffectTarget for Player {
    fn hp(&self) -> u32 {
        self.hp
    }

    fn max_hp(&self) -> u32 {
        self.max_hp
    }

    fn max_mp(&self) -> u32 {
        self.max_mp
    }

    fn heal(&mut self, amount: u32) -> u32 {
        let actual = amount.min(self.max_hp.saturating_sub(self.hp));
        self.hp += actual;
        actual
    }

    fn restore_mp(&mut self, amount: u32) -> u32 {
        let actual = amount.min(self.max_mp.saturating_sub(self.mp));
        self.mp += actual;
        actual
    }

    fn apply_buff(&mut self, buff: StatBuff, duration_ms: u64) {
        self.next_buff_id += 1;
        let id = self.next_buff_id;
        let handle = self
            .timers
            .schedule(duration_ms, TimedEvent::BuffExpired { buff_id: id });
        self.buffs.push(ActiveBuff { id, buff, handle });

        self.max_hp += buff.max_hp;
        self.hp += buff.max_hp;
        self.max_mp += buff.max_mp;
        self.mp += buff.max_mp;
        self.update_derived_stats();
    }

    fn set_vitals(&mut self, hp: u32, mp: u32) {
        self.hp = hp.min(self.max_hp);
        self.mp = mp.min(self.max_mp);
    }
}

impl Player {
    /// Restore HP without exceeding the maximum; returns the amount applied
    pub fn heal(&mut self, amount: u32) -> u32 {
        EffectTarget::heal(self, amount)
    }

    pub fn restore_mp(&mut self, amount: u32) -> u32 {
        EffectTarget::restore_mp(self, amount)
    }
}
