//! Titles earned for level, boss and wealth landmarks

use hero::Player;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MilestoneCriteria {
    Level(u32),
    BossDefeated(&'static str),
    Gold(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Milestone {
    pub name: &'static str,
    pub criteria: MilestoneCriteria,
}

impl Milestone {
    const fn new(name: &'static str, criteria: MilestoneCriteria) -> Self {
        Self { name, criteria }
    }

    pub fn is_reached(&self, player: &Player) -> bool {
        match self.criteria {
            MilestoneCriteria::Level(level) => player.level >= level,
            MilestoneCriteria::BossDefeated(boss) => player.has_defeated(boss),
            MilestoneCriteria::Gold(gold) => player.gold() >= gold,
        }
    }
}

/// Level titles first, then boss titles, then wealth titles
pub fn all_milestones() -> Vec<Milestone> {
    use MilestoneCriteria::*;
    vec![
        Milestone::new("Apprentice Adventurer", Level(5)),
        Milestone::new("Seasoned Warrior", Level(10)),
        Milestone::new("Elite Hero", Level(15)),
        Milestone::new("Legendary Champion", Level(20)),
        Milestone::new("Forest Guardian Slayer", BossDefeated("forest_guardian")),
        Milestone::new("Mountain Titan Conqueror", BossDefeated("mountain_titan")),
        Milestone::new("Castle Lord Vanquisher", BossDefeated("castle_lord")),
        Milestone::new("Wealthy Explorer", Gold(1000)),
        Milestone::new("Rich Merchant", Gold(5000)),
        Milestone::new("Gold Tycoon", Gold(10000)),
    ]
}
