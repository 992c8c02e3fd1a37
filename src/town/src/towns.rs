//! Static town and mission board data

use serde::Serialize;
use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Legendary,
}

/// What must be true before a mission can be turned in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Requirement {
    /// Held in the inventory; nothing is consumed on turn-in
    Item { id: &'static str, quantity: u32 },
    /// Kill count for a lowercase enemy name
    Kill { id: &'static str, quantity: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MissionReward {
    pub gold: u32,
    pub exp: u32,
    pub item: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MissionTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub requirement: Requirement,
    pub reward: MissionReward,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TownInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Key progression uses for this town
    pub unlock_key: &'static str,
    pub price_multiplier: f64,
    pub market_inventory: &'static [&'static str],
    pub missions: &'static [MissionTemplate],
}

pub const STARTER_TOWN: &str = "starter_town";

pub static TOWNS: [TownInfo; 3] = [
    TownInfo {
        id: "starter_town",
        name: "Riverside Village",
        description: "A peaceful village by the river",
        unlock_key: "riverside_village",
        price_multiplier: 1.0,
        market_inventory: &["health_small", "mana_small", "herb", "dagger", "leather_armor"],
        missions: &[
            MissionTemplate {
                id: "gather_herbs",
                name: "Gather Herbs",
                description: "Collect 5 herbs for the healer",
                requirement: Requirement::Item {
                    id: "herb",
                    quantity: 5,
                },
                reward: MissionReward {
                    gold: 50,
                    exp: 25,
                    item: Some("health_medium"),
                },
                difficulty: Difficulty::Easy,
            },
            MissionTemplate {
                id: "slay_goblins",
                name: "Goblin Trouble",
                description: "Defeat 3 goblins threatening the village",
                requirement: Requirement::Kill {
                    id: "goblin",
                    quantity: 3,
                },
                reward: MissionReward {
                    gold: 100,
                    exp: 50,
                    item: None,
                },
                difficulty: Difficulty::Medium,
            },
        ],
    },
    TownInfo {
        id: "port_town",
        name: "Harbor City",
        description: "A bustling port with exotic goods",
        unlock_key: "harbor_city",
        price_multiplier: 1.2,
        market_inventory: &[
            "health_medium",
            "mana_medium",
            "crystal_shard",
            "sword",
            "chain_mail",
            "ring",
        ],
        missions: &[
            MissionTemplate {
                id: "patrol_docks",
                name: "Dock Patrol",
                description: "Patrol the docks and deal with troublemakers",
                requirement: Requirement::Kill {
                    id: "thief",
                    quantity: 5,
                },
                reward: MissionReward {
                    gold: 150,
                    exp: 75,
                    item: None,
                },
                difficulty: Difficulty::Medium,
            },
            MissionTemplate {
                id: "rare_delivery",
                name: "Rare Delivery",
                description: "Deliver a rare package to the merchant guild",
                requirement: Requirement::Item {
                    id: "rare_essence",
                    quantity: 1,
                },
                reward: MissionReward {
                    gold: 300,
                    exp: 100,
                    item: Some("amulet"),
                },
                difficulty: Difficulty::Hard,
            },
        ],
    },
    TownInfo {
        id: "mountain_town",
        name: "Stone Peak",
        description: "A fortified town in the mountains",
        unlock_key: "stone_peak",
        price_multiplier: 1.5,
        market_inventory: &[
            "health_large",
            "strength_potion",
            "defense_potion",
            "greatsword",
            "plate_armor",
            "magic_ring",
        ],
        missions: &[
            MissionTemplate {
                id: "dragon_slayer",
                name: "Dragon Slayer",
                description: "Defeat the mountain dragon terrorizing the region",
                requirement: Requirement::Kill {
                    id: "dragon",
                    quantity: 1,
                },
                reward: MissionReward {
                    gold: 1000,
                    exp: 500,
                    item: Some("dragon_helm"),
                },
                difficulty: Difficulty::Legendary,
            },
            MissionTemplate {
                id: "mining_expedition",
                name: "Mining Expedition",
                description: "Gather rare minerals from the deep mines",
                requirement: Requirement::Item {
                    id: "dragon_scale",
                    quantity: 2,
                },
                reward: MissionReward {
                    gold: 500,
                    exp: 200,
                    item: Some("fire_crystal"),
                },
                difficulty: Difficulty::Hard,
            },
        ],
    },
];

pub fn town_info(id: &str) -> Option<&'static TownInfo> {
    TOWNS.iter().find(|t| t.id == id)
}

/// Look a mission up across every board
pub fn mission_template(id: &str) -> Option<&'static MissionTemplate> {
    TOWNS
        .iter()
        .flat_map(|t| t.missions.iter())
        .find(|m| m.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_referenced_item_exists() {
        for town in &TOWNS {
            for id in town.market_inventory {
                assert!(items::template(id).is_some(), "{id} in {} market", town.id);
            }
            for mission in town.missions {
                if let Requirement::Item { id, .. } = mission.requirement {
                    assert!(items::template(id).is_some(), "{id} required by {}", mission.id);
                }
                if let Some(item) = mission.reward.item {
                    assert!(items::template(item).is_some(), "{item} rewarded by {}", mission.id);
                }
            }
        }
    }

    #[test]
    fn lookups() {
        assert_eq!(town_info("port_town").map(|t| t.name), Some("Harbor City"));
        assert_eq!(mission_template("dragon_slayer").map(|m| m.reward.gold), Some(1000));
        assert!(town_info("castle").is_none());
        assert_eq!(TOWNS.iter().map(|t| t.missions.len()).sum::<usize>(), 6);
    }
}
