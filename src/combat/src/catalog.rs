// src/combat/src/catalog.rs
//! Monster, boss and loot definitions

use items::Rarity;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonsterTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub level: u32,
    pub base_hp: u32,
    pub base_attack: u32,
    pub base_defense: u32,
    pub exp_reward: u32,
    pub gold_reward: u32,
    pub rarity: Rarity,
    pub attack_patterns: &'static [&'static str],
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BossTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub title: &'static str,
    pub level: u32,
    pub base_hp: u32,
    pub base_attack: u32,
    pub base_defense: u32,
    pub exp_reward: u32,
    pub gold_reward: u32,
    pub region: &'static str,
    pub required_level: u32,
    pub attack_patterns: &'static [&'static str],
    pub description: &'static str,
    /// Area opened up by the first defeat
    pub defeat_unlock: &'static str,
}

/// One independent drop roll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LootEntry {
    pub template_id: &'static str,
    /// Percent, before luck is applied
    pub chance: u32,
    pub min: u32,
    pub max: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LootCategory {
    pub name: &'static str,
    pub entries: &'static [LootEntry],
}

const fn ranged(template_id: &'static str, chance: u32, min: u32, max: u32) -> LootEntry {
    LootEntry {
        template_id,
        chance,
        min,
        max,
    }
}

const fn single(template_id: &'static str, chance: u32) -> LootEntry {
    ranged(template_id, chance, 1, 1)
}

pub static MONSTER_TYPES: [MonsterTemplate; 9] = [
    MonsterTemplate {
        id: "goblin",
        name: "Goblin",
        level: 1,
        base_hp: 25,
        base_attack: 6,
        base_defense: 2,
        exp_reward: 15,
        gold_reward: 8,
        rarity: Rarity::Common,
        attack_patterns: &["basic_attack", "quick_strike"],
        description: "Weak but numerous forest creatures",
    },
    MonsterTemplate {
        id: "slime",
        name: "Slime",
        level: 2,
        base_hp: 30,
        base_attack: 4,
        base_defense: 4,
        exp_reward: 20,
        gold_reward: 12,
        rarity: Rarity::Common,
        attack_patterns: &["basic_attack", "acid_spit"],
        description: "Gelatinous creatures resistant to physical damage",
    },
    MonsterTemplate {
        id: "wolf",
        name: "Wolf",
        level: 3,
        base_hp: 35,
        base_attack: 10,
        base_defense: 1,
        exp_reward: 30,
        gold_reward: 18,
        rarity: Rarity::Common,
        attack_patterns: &["basic_attack", "pack_hunt"],
        description: "Fast predators that hunt in groups",
    },
    MonsterTemplate {
        id: "orc",
        name: "Orc",
        level: 5,
        base_hp: 50,
        base_attack: 14,
        base_defense: 5,
        exp_reward: 45,
        gold_reward: 25,
        rarity: Rarity::Uncommon,
        attack_patterns: &["basic_attack", "heavy_strike", "battle_cry"],
        description: "Tough warriors with high HP",
    },
    MonsterTemplate {
        id: "skeleton",
        name: "Skeleton",
        level: 6,
        base_hp: 40,
        base_attack: 12,
        base_defense: 3,
        exp_reward: 50,
        gold_reward: 30,
        rarity: Rarity::Uncommon,
        attack_patterns: &["basic_attack", "bone_throw"],
        description: "Undead warriors immune to poison",
    },
    MonsterTemplate {
        id: "dark_mage",
        name: "Dark Mage",
        level: 7,
        base_hp: 35,
        base_attack: 16,
        base_defense: 2,
        exp_reward: 60,
        gold_reward: 35,
        rarity: Rarity::Uncommon,
        attack_patterns: &["basic_attack", "shadow_bolt", "curse"],
        description: "Magic users with powerful spells",
    },
    MonsterTemplate {
        id: "golem",
        name: "Golem",
        level: 10,
        base_hp: 80,
        base_attack: 18,
        base_defense: 8,
        exp_reward: 100,
        gold_reward: 60,
        rarity: Rarity::Rare,
        attack_patterns: &["basic_attack", "earthquake", "stone_throw"],
        description: "Ancient stone guardians with immense defense",
    },
    MonsterTemplate {
        id: "dragon",
        name: "Dragon",
        level: 12,
        base_hp: 70,
        base_attack: 22,
        base_defense: 6,
        exp_reward: 120,
        gold_reward: 80,
        rarity: Rarity::Rare,
        attack_patterns: &["basic_attack", "fire_breath", "tail_swipe"],
        description: "Legendary beasts with devastating attacks",
    },
    MonsterTemplate {
        id: "demon",
        name: "Demon",
        level: 15,
        base_hp: 60,
        base_attack: 25,
        base_defense: 4,
        exp_reward: 150,
        gold_reward: 100,
        rarity: Rarity::Rare,
        attack_patterns: &["basic_attack", "hell_fire", "soul_drain"],
        description: "Powerful demonic entities from the underworld",
    },
];

pub static BOSS_TYPES: [BossTemplate; 5] = [
    BossTemplate {
        id: "forest_guardian",
        name: "Forest Guardian",
        title: "Ancient Protector",
        level: 8,
        base_hp: 200,
        base_attack: 20,
        base_defense: 12,
        exp_reward: 300,
        gold_reward: 200,
        region: "forest",
        required_level: 5,
        attack_patterns: &["basic_attack", "vine_whip", "nature_heal", "entangle"],
        description: "Ancient tree spirit protecting the forest",
        defeat_unlock: "mountain_pass",
    },
    BossTemplate {
        id: "mountain_titan",
        name: "Mountain Titan",
        title: "Stone Colossus",
        level: 12,
        base_hp: 350,
        base_attack: 30,
        base_defense: 15,
        exp_reward: 500,
        gold_reward: 400,
        region: "mountain",
        required_level: 10,
        attack_patterns: &["basic_attack", "boulder_throw", "stomp", "avalanche"],
        description: "Massive stone giant blocking the mountain path",
        defeat_unlock: "volcano_region",
    },
    BossTemplate {
        id: "shadow_lord",
        name: "Shadow Lord",
        title: "Master of Darkness",
        level: 18,
        base_hp: 280,
        base_attack: 35,
        base_defense: 8,
        exp_reward: 800,
        gold_reward: 600,
        region: "shadow_realm",
        required_level: 15,
        attack_patterns: &["basic_attack", "shadow_blast", "teleport", "darkness_wave"],
        description: "Mysterious ruler of the shadow realm",
        defeat_unlock: "final_dungeon",
    },
    BossTemplate {
        id: "ice_queen",
        name: "Ice Queen",
        title: "Frozen Sovereign",
        level: 20,
        base_hp: 300,
        base_attack: 32,
        base_defense: 10,
        exp_reward: 1000,
        gold_reward: 800,
        region: "frozen_palace",
        required_level: 18,
        attack_patterns: &["basic_attack", "ice_shard", "blizzard", "freeze_time"],
        description: "Beautiful but deadly ruler of the frozen lands",
        defeat_unlock: "sky_castle",
    },
    BossTemplate {
        id: "chaos_dragon",
        name: "Chaos Dragon",
        title: "World Ender",
        level: 25,
        base_hp: 500,
        base_attack: 45,
        base_defense: 12,
        exp_reward: 2000,
        gold_reward: 1500,
        region: "chaos_realm",
        required_level: 22,
        attack_patterns: &["basic_attack", "chaos_breath", "dimension_tear", "reality_warp"],
        description: "Ancient dragon capable of destroying reality",
        defeat_unlock: "new_game_plus",
    },
];

static COMMON_LOOT: [LootCategory; 3] = [
    LootCategory {
        name: "potions",
        entries: &[ranged("health_small", 30, 1, 2), single("mana_small", 20)],
    },
    LootCategory {
        name: "materials",
        entries: &[
            ranged("herb", 40, 1, 3),
            single("crystal_shard", 15),
            ranged("monster_part", 25, 1, 2),
        ],
    },
    LootCategory {
        name: "equipment",
        entries: &[
            single("dagger", 5),
            single("leather_armor", 3),
            single("ring", 2),
        ],
    },
];

static UNCOMMON_LOOT: [LootCategory; 3] = [
    LootCategory {
        name: "potions",
        entries: &[
            single("health_medium", 25),
            single("mana_medium", 20),
            single("strength_potion", 10),
            single("defense_potion", 10),
        ],
    },
    LootCategory {
        name: "materials",
        entries: &[
            ranged("magic_herb", 30, 1, 2),
            single("fire_crystal", 20),
            single("rare_essence", 15),
        ],
    },
    LootCategory {
        name: "equipment",
        entries: &[
            single("sword", 10),
            single("chain_mail", 8),
            single("amulet", 5),
            single("boots", 6),
        ],
    },
];

static RARE_LOOT: [LootCategory; 3] = [
    LootCategory {
        name: "potions",
        entries: &[
            single("health_large", 20),
            single("elixir_power", 15),
            single("phoenix_down", 5),
        ],
    },
    LootCategory {
        name: "materials",
        entries: &[
            single("dragon_scale", 25),
            single("soul_crystal", 20),
            single("ancient_rune", 15),
        ],
    },
    LootCategory {
        name: "equipment",
        entries: &[
            single("greatsword", 15),
            single("plate_armor", 12),
            single("magic_ring", 10),
            single("dragon_helm", 8),
        ],
    },
];

static UNIQUE_LOOT: [LootCategory; 3] = [
    LootCategory {
        name: "materials",
        entries: &[single("boss_essence", 100)],
    },
    LootCategory {
        name: "equipment",
        entries: &[
            single("legendary_weapon", 40),
            single("legendary_armor", 30),
            single("artifact", 20),
        ],
    },
    LootCategory {
        name: "special",
        entries: &[single("skill_book", 15), single("stat_orb", 10)],
    },
];

pub fn monster_template(id: &str) -> Option<&'static MonsterTemplate> {
    MONSTER_TYPES.iter().find(|m| m.id == id)
}

pub fn boss_template(id: &str) -> Option<&'static BossTemplate> {
    BOSS_TYPES.iter().find(|b| b.id == id)
}

/// Drop table for an enemy tier
pub fn loot_table(tier: Rarity) -> &'static [LootCategory] {
    match tier {
        Rarity::Common => &COMMON_LOOT,
        Rarity::Uncommon => &UNCOMMON_LOOT,
        Rarity::Rare => &RARE_LOOT,
        Rarity::Unique => &UNIQUE_LOOT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_loot_entry_names_a_real_item() {
        for tier in Rarity::iter() {
            for category in loot_table(tier) {
                for entry in category.entries {
                    assert!(
                        items::template(entry.template_id).is_some(),
                        "{} in {tier} loot has no template",
                        entry.template_id
                    );
                    assert!(entry.min >= 1 && entry.min <= entry.max);
                }
            }
        }
    }

    #[test]
    fn lookups() {
        assert_eq!(monster_template("dark_mage").map(|m| m.level), Some(7));
        assert_eq!(boss_template("ice_queen").map(|b| b.required_level), Some(18));
        assert!(monster_template("castle_lord").is_none());
        assert!(boss_template("goblin").is_none());
    }
}
