// src/save/src/snapshot.rs
//! Plain-data sections of the save blob
//!
//! Nothing in here holds a live reference: inventory entries become
//! `{templateId, quantity, equipped}` records and derived values (attack,
//! defense, unlocked regions) are written for readers but recomputed on load.

use std::collections::{BTreeMap, BTreeSet};

use hero::{Equipment, Facing, Inventory, MissionLog, Player, SpecialAttack, experience_for_level};
use items::EquipSlot;
use progression::{calculate_total_experience, unlocked_regions, unlocked_towns};
use serde::{Deserialize, Serialize};

/// Region assumed for saves written before regions were tracked
pub const DEFAULT_REGION: &str = hero::player::STARTING_REGION;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    pub template_id: String,
    pub quantity: u32,
    /// Mirror of the equipment section; ignored on load
    #[serde(default)]
    pub equipped: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySnapshot {
    pub gold: u32,
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    pub items: Vec<ItemRecord>,
}

fn default_capacity() -> usize {
    hero::bag::DEFAULT_CAPACITY
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    pub level: u32,
    pub experience: u32,
    pub experience_to_next: u32,
    pub hp: u32,
    #[serde(rename = "maxHP")]
    pub max_hp: u32,
    pub mp: u32,
    #[serde(rename = "maxMP")]
    pub max_mp: u32,
    pub base_attack: u32,
    pub base_defense: u32,
    pub attack: u32,
    pub defense: u32,
    pub special_attacks: BTreeMap<String, SpecialAttack>,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub facing: Facing,
    pub inventory: InventorySnapshot,
    #[serde(default)]
    pub equipment: Equipment,
    #[serde(default)]
    pub combat_cooldown: f64,
}

impl PlayerSnapshot {
    /// Flat copy of the player; timed buffs are not persisted
    pub fn capture(player: &Player) -> Self {
        let mut items: Vec<ItemRecord> = player
            .inventory
            .items()
            .iter()
            .map(|item| ItemRecord {
                template_id: item.template_id.clone(),
                quantity: item.quantity,
                equipped: false,
            })
            .collect();
        items.extend(
            [EquipSlot::Weapon, EquipSlot::Armor, EquipSlot::Accessory]
                .into_iter()
                .filter_map(|slot| player.equipment.get(slot))
                .map(|id| ItemRecord {
                    template_id: id.to_string(),
                    quantity: 1,
                    equipped: true,
                }),
        );

        let max_hp = player.unbuffed_max_hp();
        let max_mp = player.unbuffed_max_mp();
        Self {
            level: player.level,
            experience: player.experience,
            experience_to_next: player.experience_to_next,
            hp: player.hp.min(max_hp),
            max_hp,
            mp: player.mp.min(max_mp),
            max_mp,
            base_attack: player.base_attack,
            base_defense: player.base_defense,
            attack: player.attack(),
            defense: player.defense(),
            special_attacks: player.special_attacks.clone(),
            x: player.x,
            y: player.y,
            facing: player.facing,
            inventory: InventorySnapshot {
                gold: player.gold(),
                capacity: player.inventory.capacity(),
                items,
            },
            equipment: player.equipment.clone(),
            combat_cooldown: player.combat_cooldown,
        }
    }

    /// Rebuild a player; derived stats are recomputed, never trusted
    pub fn restore(&self) -> Player {
        let mut player = Player::new();
        player.level = self.level.max(1);
        player.experience = self.experience;
        player.experience_to_next = experience_for_level(player.level);
        if self.experience_to_next != player.experience_to_next {
            log::debug!(
                "saved experience_to_next {} replaced by {}",
                self.experience_to_next,
                player.experience_to_next
            );
        }
        player.max_hp = self.max_hp.max(1);
        player.max_mp = self.max_mp;
        player.hp = self.hp.min(player.max_hp);
        player.mp = self.mp.min(player.max_mp);
        player.base_attack = self.base_attack;
        player.base_defense = self.base_defense;
        // keep defaults for attacks missing from older saves
        for (name, attack) in &self.special_attacks {
            player.special_attacks.insert(name.clone(), attack.clone());
        }
        player.x = self.x;
        player.y = self.y;
        player.facing = self.facing;
        player.combat_cooldown = self.combat_cooldown.max(0.0);

        let records = self
            .inventory
            .items
            .iter()
            .filter(|r| !r.equipped)
            .map(|r| (r.template_id.clone(), r.quantity));
        player.inventory = Inventory::restore(self.inventory.capacity, self.inventory.gold, records);
        player.equipment = self.equipment.clone();
        player.update_derived_stats();
        player.check_special_attack_unlocks();
        player
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProgressionSnapshot {
    pub defeated_bosses: Vec<String>,
    pub visited_areas: BTreeSet<String>,
    /// Derived from `defeated_bosses` on every save
    pub unlocked_regions: Vec<String>,
    pub highest_level: u32,
    pub total_experience: u64,
    pub total_gold_earned: u64,
    pub enemies_defeated: u32,
}

impl ProgressionSnapshot {
    pub fn capture(player: &Player) -> Self {
        Self {
            defeated_bosses: player.defeated_bosses.clone(),
            visited_areas: player.visited_areas.clone(),
            unlocked_regions: unlocked_regions(&player.defeated_bosses),
            highest_level: player.level,
            total_experience: calculate_total_experience(player.level, player.experience),
            total_gold_earned: player.total_gold_earned,
            enemies_defeated: player.enemies_defeated,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorldSnapshot {
    pub current_region: String,
    pub last_town: Option<String>,
    /// Derived from defeated bosses on every save
    pub unlocked_towns: Vec<String>,
    pub world_flags: BTreeMap<String, bool>,
    pub missions: MissionLog,
}

impl Default for WorldSnapshot {
    fn default() -> Self {
        Self {
            current_region: DEFAULT_REGION.to_string(),
            last_town: None,
            unlocked_towns: unlocked_towns(&[]),
            world_flags: BTreeMap::new(),
            missions: MissionLog::default(),
        }
    }
}

impl WorldSnapshot {
    pub fn capture(player: &Player) -> Self {
        Self {
            current_region: player.current_region.clone(),
            last_town: player.last_town.clone(),
            unlocked_towns: unlocked_towns(&player.defeated_bosses),
            world_flags: player.world_flags.clone(),
            missions: player.missions.clone(),
        }
    }
}

/// Caller-supplied metadata; unknown keys are kept
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SaveMetadata {
    /// Milliseconds played
    pub play_time: f64,
    pub auto_save: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SaveMetadata {
    pub fn manual(play_time: f64) -> Self {
        Self {
            play_time,
            ..Self::default()
        }
    }

    pub fn auto(play_time: f64) -> Self {
        Self {
            play_time,
            auto_save: true,
            ..Self::default()
        }
    }
}

/// The single persisted document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveBlob {
    pub version: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
    pub player: PlayerSnapshot,
    #[serde(default)]
    pub progression: ProgressionSnapshot,
    #[serde(default)]
    pub world: WorldSnapshot,
    #[serde(default)]
    pub additional: SaveMetadata,
}

impl SaveBlob {
    pub fn capture(player: &Player, version: &str, timestamp: u64, additional: SaveMetadata) -> Self {
        Self {
            version: version.to_string(),
            timestamp,
            player: PlayerSnapshot::capture(player),
            progression: ProgressionSnapshot::capture(player),
            world: WorldSnapshot::capture(player),
            additional,
        }
    }

    /// Full player state as it was saved
    pub fn restore_player(&self) -> Player {
        let mut player = self.player.restore();
        player.defeated_bosses = Vec::new();
        for boss in &self.progression.defeated_bosses {
            player.defeat_boss(boss);
        }
        player.visited_areas = self.progression.visited_areas.clone();
        player.total_gold_earned = self.progression.total_gold_earned;
        player.enemies_defeated = self.progression.enemies_defeated;
        player.current_region = self.world.current_region.clone();
        player.last_town = self.world.last_town.clone();
        player.world_flags = self.world.world_flags.clone();
        player.missions = self.world.missions.clone();
        player
    }
}
