//! Static item definitions and their effects
//!
//! Templates are immutable and shared; inventories only ever hold a template
//! id plus a quantity. Effects are applied to anything implementing
//! [`EffectTarget`], which keeps this crate free of player state.

mod catalog;
pub mod effects;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

pub use crate::catalog::{ItemCatalog, template};
pub use crate::effects::{EffectOutcome, EffectTarget, StatBuff, apply_effect};

/// Use delay applied when a consumable does not declare one
pub const DEFAULT_USE_TIME_MS: u64 = 500;

/// Broad item family; declaration order is the inventory "type" sort order
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ItemType {
    Consumable,
    Equipment,
    Material,
    Special,
}

/// Ordered from least to most valuable
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Unique,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EquipSlot {
    Weapon,
    Armor,
    Accessory,
}

/// Named consumable effect
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EffectKind {
    Heal,
    Mana,
    StrengthBoost,
    DefenseBoost,
    AllStats,
    Revive,
}

/// Equipment-only fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EquipStats {
    pub slot: EquipSlot,
    pub attack_bonus: u32,
    pub defense_bonus: u32,
    pub equip_text: &'static str,
}

/// Consumable-only fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConsumableStats {
    pub effect: EffectKind,
    /// Magnitude per unit consumed
    pub value: u32,
    pub use_time_ms: u64,
    /// Buff lifetime for timed effects
    pub duration_ms: Option<u64>,
}

/// Immutable catalog entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub item_type: ItemType,
    pub rarity: Rarity,
    pub stack_size: u32,
    pub description: &'static str,
    pub consumable: Option<ConsumableStats>,
    pub equip: Option<EquipStats>,
}

impl ItemTemplate {
    pub fn is_stackable(&self) -> bool {
        self.stack_size > 1
    }

    pub fn equip_slot(&self) -> Option<EquipSlot> {
        self.equip.map(|e| e.slot)
    }

    pub fn effect(&self) -> Option<EffectKind> {
        self.consumable.map(|c| c.effect)
    }

    pub fn attack_bonus(&self) -> u32 {
        self.equip.map_or(0, |e| e.attack_bonus)
    }

    pub fn defense_bonus(&self) -> u32 {
        self.equip.map_or(0, |e| e.defense_bonus)
    }

    pub fn use_time_ms(&self) -> u64 {
        self.consumable
            .map_or(DEFAULT_USE_TIME_MS, |c| c.use_time_ms)
    }

    /// Text shown after equipping; falls back to the item name
    pub fn equip_text(&self) -> String {
        match self.equip {
            Some(e) if !e.equip_text.is_empty() => e.equip_text.to_string(),
            _ => format!("Equipped {}", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn type_order_matches_sort_order() {
        assert!(ItemType::Consumable < ItemType::Equipment);
        assert!(ItemType::Equipment < ItemType::Material);
        assert!(ItemType::Material < ItemType::Special);
        assert!(Rarity::Unique > Rarity::Rare);
    }

    #[test]
    fn enums_use_snake_case_names() {
        assert_eq!(EffectKind::StrengthBoost.to_string(), "strength_boost");
        assert_eq!(EquipSlot::from_str("accessory").unwrap(), EquipSlot::Accessory);
        assert_eq!(Rarity::Uncommon.as_ref(), "uncommon");
    }

    #[test]
    fn equip_text_fallback() {
        let dagger = template("dagger").unwrap();
        assert_eq!(dagger.equip_text(), "Equipped: Quick and reliable dagger");
        let herb = template("herb").unwrap();
        assert_eq!(herb.equip_text(), "Equipped Herb");
    }
}
