// src/combat/src/enemy.rs
use std::sync::atomic::{AtomicU64, Ordering};

use items::Rarity;
use math::Dice;
use serde::Serialize;

use crate::catalog::{
    BOSS_TYPES, BossTemplate, LootCategory, MONSTER_TYPES, boss_template, loot_table,
    monster_template,
};

/// Monster used when nothing else is eligible
pub const FALLBACK_MONSTER: &str = "goblin";

static NEXT_ENEMY_ID: AtomicU64 = AtomicU64::new(1);

fn next_enemy_id() -> String {
    format!("enemy_{}", NEXT_ENEMY_ID.fetch_add(1, Ordering::Relaxed))
}

/// Live opponent scaled for one encounter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Enemy {
    pub id: String,
    pub template_id: &'static str,
    pub name: &'static str,
    pub level: u32,
    pub hp: u32,
    pub max_hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub exp_reward: u32,
    pub gold_reward: u32,
    pub is_boss: bool,
    /// `None` for bosses
    pub rarity: Option<Rarity>,
    /// Area a boss opens on defeat
    pub defeat_unlock: Option<&'static str>,
}

impl Enemy {
    /// Loot tier: the monster's rarity, or unique for bosses
    pub fn loot_tier(&self) -> Rarity {
        match self.rarity {
            Some(tier @ (Rarity::Uncommon | Rarity::Rare)) => tier,
            _ if self.is_boss => Rarity::Unique,
            _ => Rarity::Common,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Apply already-mitigated damage, returning what was removed
    pub fn apply_damage(&mut self, amount: u32) -> u32 {
        let actual = amount.min(self.hp);
        self.hp -= actual;
        actual
    }
}

/// One rolled drop
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LootDrop {
    pub template_id: &'static str,
    pub quantity: u32,
    pub category: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Loot {
    pub gold: u32,
    pub items: Vec<LootDrop>,
}

/// What beating a boss is worth, before progression rewards
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BossRewardPreview {
    pub exp: u32,
    pub gold: u32,
    pub unlock_region: Option<&'static str>,
    pub loot: Loot,
}

fn scaled(base: u32, scale: f64) -> u32 {
    (f64::from(base) * scale).floor() as u32
}

/// Enemy instantiation and loot rolls
pub struct EnemyFactory;

impl EnemyFactory {
    /// Scale a monster to the player's level with a ±10% variance roll
    pub fn create_monster(id: &str, player_level: u32, dice: &mut impl Dice) -> Option<Enemy> {
        let Some(template) = monster_template(id) else {
            log::error!("monster type '{id}' not found");
            return None;
        };

        let level_scale = 1.0 + f64::from(player_level) * 0.1;
        let variance = dice.float_range(0.9, 1.1);
        let scale = level_scale * variance;
        let hp = scaled(template.base_hp, scale).max(1);

        Some(Enemy {
            id: next_enemy_id(),
            template_id: template.id,
            name: template.name,
            level: template.level,
            hp,
            max_hp: hp,
            attack: scaled(template.base_attack, scale),
            defense: scaled(template.base_defense, scale),
            exp_reward: scaled(template.exp_reward, scale),
            gold_reward: scaled(template.gold_reward, scale),
            is_boss: false,
            rarity: Some(template.rarity),
            defeat_unlock: None,
        })
    }

    /// Bosses keep fixed HP and rewards; only attack and defense scale
    pub fn create_boss(id: &str, player_level: u32) -> Option<Enemy> {
        let Some(template) = boss_template(id) else {
            log::error!("boss type '{id}' not found");
            return None;
        };

        let level_scale = 1.0 + f64::from(player_level) * 0.05;
        Some(Enemy {
            id: next_enemy_id(),
            template_id: template.id,
            name: template.name,
            level: template.level,
            hp: template.base_hp,
            max_hp: template.base_hp,
            attack: scaled(template.base_attack, level_scale),
            defense: scaled(template.base_defense, level_scale),
            exp_reward: template.exp_reward,
            gold_reward: template.gold_reward,
            is_boss: true,
            rarity: None,
            defeat_unlock: Some(template.defeat_unlock),
        })
    }

    /// Weighted pick among monsters at most two levels above the area
    pub fn generate_random_monster(
        area_level: u32,
        player_level: u32,
        dice: &mut impl Dice,
    ) -> Option<Enemy> {
        let weighted: Vec<(&str, i32)> = MONSTER_TYPES
            .iter()
            .filter(|m| m.level <= area_level + 2)
            .map(|m| {
                let weight = 5_u32.saturating_sub(m.level.abs_diff(area_level)).max(1);
                (m.id, weight as i32)
            })
            .collect();

        if weighted.is_empty() {
            return Self::create_monster(FALLBACK_MONSTER, player_level, dice);
        }

        let total: i32 = weighted.iter().map(|(_, w)| w).sum();
        let mut roll = dice.int_range(1, total);
        let mut picked = weighted[0].0;
        for &(id, weight) in &weighted {
            roll -= weight;
            if roll <= 0 {
                picked = id;
                break;
            }
        }
        Self::create_monster(picked, player_level, dice)
    }

    /// Roll every entry of the enemy's loot table independently
    ///
    /// Gold is always the enemy's gold reward. Entries whose item template
    /// is missing are skipped.
    pub fn generate_loot(enemy: &Enemy, luck: f64, dice: &mut impl Dice) -> Loot {
        let table: &[LootCategory] = loot_table(enemy.loot_tier());
        let mut drops = Vec::new();

        for category in table {
            for entry in category.entries {
                let chance = f64::from(entry.chance) * luck;
                if f64::from(dice.percent()) > chance {
                    continue;
                }
                let min = i32::try_from(entry.min).unwrap_or(1);
                let max = i32::try_from(entry.max).unwrap_or(min);
                let quantity = dice.int_range(min, max).max(1) as u32;

                if items::template(entry.template_id).is_none() {
                    log::debug!("loot entry {} has no item template", entry.template_id);
                    continue;
                }
                drops.push(LootDrop {
                    template_id: entry.template_id,
                    quantity,
                    category: category.name,
                });
            }
        }

        Loot {
            gold: enemy.gold_reward,
            items: drops,
        }
    }

    /// Monster ids within three levels of the area, lowest level first
    pub fn get_monsters_for_area(area_level: u32, max_monsters: usize) -> Vec<&'static str> {
        let mut nearby: Vec<_> = MONSTER_TYPES
            .iter()
            .filter(|m| m.level.abs_diff(area_level) <= 3)
            .collect();
        nearby.sort_by_key(|m| m.level);
        nearby
            .into_iter()
            .take(max_monsters)
            .map(|m| m.id)
            .collect()
    }

    pub fn get_available_bosses(player_level: u32, defeated: &[String]) -> Vec<&'static BossTemplate> {
        BOSS_TYPES
            .iter()
            .filter(|b| player_level >= b.required_level && !defeated.iter().any(|d| d == b.id))
            .collect()
    }

    pub fn can_fight_boss(id: &str, player_level: u32, defeated: &[String]) -> bool {
        boss_template(id).is_some_and(|b| {
            player_level >= b.required_level && !defeated.iter().any(|d| d == id)
        })
    }

    pub fn boss_rewards(boss: &Enemy, luck: f64, dice: &mut impl Dice) -> BossRewardPreview {
        BossRewardPreview {
            exp: boss.exp_reward,
            gold: boss.gold_reward,
            unlock_region: boss.defeat_unlock,
            loot: Self::generate_loot(boss, luck, dice),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use math::{Midpoint, Scripted};
    use pretty_assertions::assert_eq;

    #[test]
    fn goblin_at_level_one() {
        let goblin = EnemyFactory::create_monster("goblin", 1, &mut Midpoint).unwrap();
        assert_eq!(
            (goblin.hp, goblin.attack, goblin.defense),
            (27, 6, 2)
        );
        assert_eq!((goblin.exp_reward, goblin.gold_reward), (16, 8));
        assert!(!goblin.is_boss);
        assert_eq!(goblin.loot_tier(), Rarity::Common);
    }

    #[test]
    fn variance_bounds() {
        let low = EnemyFactory::create_monster("orc", 0, &mut Scripted::new([]).with_floats([0.9]))
            .unwrap();
        let high =
            EnemyFactory::create_monster("orc", 0, &mut Scripted::new([]).with_floats([1.1])).unwrap();
        assert_eq!(low.max_hp, 45);
        assert_eq!(high.max_hp, 55);
    }

    #[test]
    fn unknown_types_return_none() {
        assert!(EnemyFactory::create_monster("castle_lord", 3, &mut Midpoint).is_none());
        assert!(EnemyFactory::create_boss("goblin", 3).is_none());
    }

    #[test]
    fn boss_scaling_leaves_hp_alone() {
        let boss = EnemyFactory::create_boss("forest_guardian", 10).unwrap();
        assert_eq!((boss.hp, boss.max_hp), (200, 200));
        assert_eq!((boss.attack, boss.defense), (30, 18));
        assert_eq!(boss.exp_reward, 300);
        assert_eq!(boss.loot_tier(), Rarity::Unique);
        assert!(boss.is_boss);
    }

    #[test]
    fn enemy_ids_are_unique() {
        let a = EnemyFactory::create_boss("ice_queen", 1).unwrap();
        let b = EnemyFactory::create_boss("ice_queen", 1).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn random_monster_weighting() {
        // area 1: goblin(5) slime(4) wolf(3), total 12
        let pick = |roll| {
            EnemyFactory::generate_random_monster(1, 1, &mut Scripted::new([roll]))
                .unwrap()
                .template_id
        };
        assert_eq!(pick(1), "goblin");
        assert_eq!(pick(5), "goblin");
        assert_eq!(pick(6), "slime");
        assert_eq!(pick(9), "slime");
        assert_eq!(pick(10), "wolf");
        assert_eq!(pick(12), "wolf");
    }

    #[test]
    fn monsters_for_area() {
        assert_eq!(
            EnemyFactory::get_monsters_for_area(5, 3),
            vec!["slime", "wolf", "orc"]
        );
        assert_eq!(
            EnemyFactory::get_monsters_for_area(12, 10),
            vec!["golem", "dragon", "demon"]
        );
    }

    #[test]
    fn boss_availability() {
        let defeated = vec!["forest_guardian".to_string()];
        let ids: Vec<_> = EnemyFactory::get_available_bosses(12, &defeated)
            .iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(ids, vec!["mountain_titan"]);
        assert!(!EnemyFactory::can_fight_boss("forest_guardian", 12, &defeated));
        assert!(!EnemyFactory::can_fight_boss("shadow_lord", 12, &defeated));
        assert!(EnemyFactory::can_fight_boss("shadow_lord", 15, &defeated));
    }

    #[test]
    fn loot_always_pays_gold() {
        let goblin = EnemyFactory::create_monster("goblin", 1, &mut Midpoint).unwrap();
        // every d100 roll misses
        let mut never = Scripted::new(std::iter::repeat_n(100, 8));
        let loot = EnemyFactory::generate_loot(&goblin, 1.0, &mut never);
        assert_eq!(loot, Loot { gold: 8, items: vec![] });
    }

    #[test]
    fn certain_and_impossible_drops() {
        let boss = EnemyFactory::create_boss("chaos_dragon", 1).unwrap();
        let mut rng = math::GameRng::new(7);
        for _ in 0..2_000 {
            let loot = EnemyFactory::generate_loot(&boss, 1.0, &mut rng);
            assert!(loot.items.iter().any(|d| d.template_id == "boss_essence"));
        }

        let slime = EnemyFactory::create_monster("slime", 1, &mut Midpoint).unwrap();
        for _ in 0..2_000 {
            let loot = EnemyFactory::generate_loot(&slime, 0.0, &mut rng);
            assert!(loot.items.is_empty());
        }
    }

    #[test]
    fn boss_reward_preview() {
        let boss = EnemyFactory::create_boss("mountain_titan", 10).unwrap();
        let preview = EnemyFactory::boss_rewards(&boss, 1.5, &mut Midpoint);
        assert_eq!(preview.exp, 500);
        assert_eq!(preview.unlock_region, Some("volcano_region"));
        // midpoint d100 is 50: only entries at 34% or more survive x1.5
        let ids: Vec<_> = preview.loot.items.iter().map(|d| d.template_id).collect();
        assert_eq!(ids, vec!["boss_essence", "legendary_weapon"]);
    }
}
