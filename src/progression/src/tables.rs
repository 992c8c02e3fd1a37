//! Level-unlock and boss-reward definitions

use serde::Serialize;

/// Content that becomes available once the player reaches `level`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelThreshold {
    pub level: u32,
    pub unlock: &'static [&'static str],
    pub description: &'static str,
}

/// Fixed reward for the first defeat of a boss
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BossReward {
    pub boss_id: &'static str,
    pub region: &'static str,
    pub experience: u32,
    pub gold: u32,
    pub items: &'static [&'static str],
    pub description: &'static str,
}

/// Ascending by level
pub fn all_level_thresholds() -> Vec<LevelThreshold> {
    vec![
        LevelThreshold {
            level: 1,
            unlock: &["slash"],
            description: "Basic slash attack",
        },
        LevelThreshold {
            level: 5,
            unlock: &["fireball"],
            description: "Fireball magic",
        },
        LevelThreshold {
            level: 8,
            unlock: &["heal"],
            description: "Healing spell",
        },
        LevelThreshold {
            level: 10,
            unlock: &["harbor_city"],
            description: "Access to Harbor City",
        },
        LevelThreshold {
            level: 12,
            unlock: &["ultimate"],
            description: "Ultimate attack",
        },
        LevelThreshold {
            level: 15,
            unlock: &["stone_peak"],
            description: "Access to Stone Peak",
        },
        LevelThreshold {
            level: 20,
            unlock: &["boss_essence_drops"],
            description: "Boss essence drops",
        },
    ]
}

/// In story order; each entry opens the region of the same index
pub fn all_boss_rewards() -> Vec<BossReward> {
    vec![
        BossReward {
            boss_id: "forest_guardian",
            region: "forest",
            experience: 200,
            gold: 500,
            items: &["health_large", "sword"],
            description: "Forest region unlocked",
        },
        BossReward {
            boss_id: "mountain_titan",
            region: "mountains",
            experience: 400,
            gold: 1000,
            items: &["chain_mail", "mana_large"],
            description: "Mountain region unlocked",
        },
        BossReward {
            boss_id: "castle_lord",
            region: "castle",
            experience: 800,
            gold: 2000,
            items: &["plate_armor", "greatsword"],
            description: "Castle region unlocked",
        },
    ]
}
