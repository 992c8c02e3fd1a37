//! Progression tracking
//!
//! Level thresholds, first-kill boss rewards and the read-only reports built
//! on top of them (completion, milestones, what to do next). Unlocks are
//! always derived from the player's level and defeated bosses, never stored.

pub mod milestone;
pub mod regions;
pub mod tables;


pub use milestone::{Milestone, MilestoneCriteria, all_milestones};
pub use regions::{REGION_COUNT, unlocked_regions, unlocked_towns};
pub use tables::{BossReward, LevelThreshold, all_boss_rewards, all_level_thresholds};

use hero::{Player, experience_for_level};
use serde::Serialize;
use strum_macros::{Display, EnumString};

/// What a caller can ask `can_access_content` about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ContentKind {
    Region,
    Town,
    Boss,
    SpecialAttack,
}

/// Outcome of a first boss defeat
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BossRewardGrant {
    pub boss_id: String,
    pub region: &'static str,
    pub experience: u32,
    pub gold: u32,
    pub levels_gained: u32,
    pub items_granted: Vec<String>,
    /// Unknown templates or items that did not fit
    pub items_skipped: Vec<String>,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextUnlock {
    pub level: u32,
    pub description: &'static str,
    pub unlocks: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextRegion {
    pub region: &'static str,
    pub requires: &'static str,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BossProgress {
    pub total: usize,
    pub defeated: usize,
    pub next_boss: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionProgress {
    pub total: usize,
    pub unlocked: usize,
    pub next_region: Option<NextRegion>,
}

/// Everything the UI shows on the progression panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionStatus {
    pub current_level: u32,
    pub next_unlock: Option<NextUnlock>,
    pub total_unlocks: usize,
    pub available_unlocks: Vec<&'static str>,
    pub boss_progress: BossProgress,
    pub region_progress: RegionProgress,
}

/// Total experience earned to reach `level` with `current_exp` into it
pub fn calculate_total_experience(level: u32, current_exp: u32) -> u64 {
    (1..level.max(1))
        .map(|l| u64::from(experience_for_level(l)))
        .sum::<u64>()
        + u64::from(current_exp)
}

#[derive(Debug, Clone)]
pub struct ProgressionManager {
    thresholds: Vec<LevelThreshold>,
    boss_rewards: Vec<BossReward>,
    milestones: Vec<Milestone>,
}

impl Default for ProgressionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressionManager {
    pub fn new() -> Self {
        let mut thresholds = all_level_thresholds();
        thresholds.sort_by_key(|t| t.level);
        Self {
            thresholds,
            boss_rewards: all_boss_rewards(),
            milestones: all_milestones(),
        }
    }

    pub fn thresholds(&self) -> &[LevelThreshold] {
        &self.thresholds
    }

    pub fn boss_reward(&self, boss_id: &str) -> Option<&BossReward> {
        self.boss_rewards.iter().find(|r| r.boss_id == boss_id)
    }

    /// Grant the fixed reward for a boss's first defeat
    ///
    /// Returns `None` for bosses without a reward entry and for bosses the
    /// player has already defeated, so repeated calls never double-grant.
    pub fn apply_boss_rewards(&self, player: &mut Player, boss_id: &str) -> Option<BossRewardGrant> {
        let Some(reward) = self.boss_reward(boss_id) else {
            log::warn!("no rewards defined for boss {boss_id}");
            return None;
        };
        if !player.defeat_boss(boss_id) {
            log::info!("boss {boss_id} already defeated, rewards not granted again");
            return None;
        }

        let levels_gained = player.gain_experience(reward.experience);
        player.add_gold(reward.gold);

        let mut items_granted = Vec::new();
        let mut items_skipped = Vec::new();
        for &item in reward.items {
            match player.add_item(item, 1) {
                Ok(_) => items_granted.push(item.to_string()),
                Err(err) => {
                    log::warn!("boss reward {item} not granted: {err}");
                    items_skipped.push(item.to_string());
                }
            }
        }

        log::info!("boss defeated: {boss_id} ({})", reward.description);
        Some(BossRewardGrant {
            boss_id: boss_id.to_string(),
            region: reward.region,
            experience: reward.experience,
            gold: reward.gold,
            levels_gained,
            items_granted,
            items_skipped,
            description: reward.description,
        })
    }

    /// Every unlock at or below the player's level
    pub fn check_level_unlocks(&self, player: &Player) -> Vec<&'static str> {
        self.thresholds
            .iter()
            .filter(|t| player.level >= t.level)
            .flat_map(|t| t.unlock.iter().copied())
            .collect()
    }

    pub fn get_progression_status(&self, player: &Player) -> ProgressionStatus {
        let next_unlock = self
            .thresholds
            .iter()
            .find(|t| player.level < t.level)
            .map(|t| NextUnlock {
                level: t.level,
                description: t.description,
                unlocks: t.unlock.to_vec(),
            });
        let available_unlocks = self.check_level_unlocks(player);

        ProgressionStatus {
            current_level: player.level,
            next_unlock,
            total_unlocks: available_unlocks.len(),
            available_unlocks,
            boss_progress: BossProgress {
                total: self.boss_rewards.len(),
                defeated: self.story_bosses_defeated(player),
                next_boss: self.get_next_boss(&player.defeated_bosses),
            },
            region_progress: RegionProgress {
                total: REGION_COUNT,
                unlocked: unlocked_regions(&player.defeated_bosses).len(),
                next_region: self.get_next_region(&player.defeated_bosses),
            },
        }
    }

    fn story_bosses_defeated(&self, player: &Player) -> usize {
        self.boss_rewards
            .iter()
            .filter(|r| player.has_defeated(r.boss_id))
            .count()
    }

    pub fn get_next_boss(&self, defeated: &[String]) -> Option<&'static str> {
        self.boss_rewards
            .iter()
            .map(|r| r.boss_id)
            .find(|boss| !defeated.iter().any(|d| d == boss))
    }

    pub fn get_next_region(&self, defeated: &[String]) -> Option<NextRegion> {
        self.get_next_boss(defeated).and_then(|boss| {
            let reward = self.boss_reward(boss)?;
            Some(NextRegion {
                region: reward.region,
                requires: boss,
                description: format!("Defeat {} to unlock", boss.replacen('_', " ", 1)),
            })
        })
    }

    pub fn get_unlocked_regions(&self, defeated: &[String]) -> Vec<String> {
        unlocked_regions(defeated)
    }

    pub fn get_unlocked_towns(&self, defeated: &[String]) -> Vec<String> {
        unlocked_towns(defeated)
    }

    pub fn can_access_content(&self, player: &Player, kind: ContentKind, id: &str) -> bool {
        match kind {
            ContentKind::Region => unlocked_regions(&player.defeated_bosses).iter().any(|r| r == id),
            ContentKind::Town => unlocked_towns(&player.defeated_bosses).iter().any(|t| t == id),
            ContentKind::Boss => !player.has_defeated(id),
            ContentKind::SpecialAttack => player
                .special_attacks
                .get(id)
                .is_some_and(|a| a.learned),
        }
    }

    pub fn get_milestones(&self, player: &Player) -> Vec<&'static str> {
        self.milestones
            .iter()
            .filter(|m| m.is_reached(player))
            .map(|m| m.name)
            .collect()
    }

    /// Whole-number percentage over pooled level, boss, region and attack counts
    pub fn calculate_completion(&self, player: &Player) -> u32 {
        const MAX_LEVEL: usize = 20;
        let attacks_learned = player.special_attacks.values().filter(|a| a.learned).count();

        let completed = (player.level as usize).min(MAX_LEVEL)
            + self.story_bosses_defeated(player)
            + unlocked_regions(&player.defeated_bosses).len()
            + attacks_learned;
        let total = MAX_LEVEL + self.boss_rewards.len() + REGION_COUNT + player.special_attacks.len();

        (completed * 100 / total) as u32
    }
}
