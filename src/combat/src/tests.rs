use hero::Player;
use math::{GameRng, Midpoint, Scripted};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;

fn goblin() -> Enemy {
    EnemyFactory::create_monster("goblin", 1, &mut Midpoint).unwrap()
}

fn instant(enemy: Enemy) -> BattleResolver {
    BattleResolver::with_config(enemy, BattleConfig::instant())
}

#[test]
fn goblin_fight_with_no_variance() {
    let mut player = Player::new();
    let mut battle = BattleResolver::new(goblin());
    let mut dice = Midpoint;

    for _ in 0..2 {
        assert!(battle.perform(BattleAction::Attack, &mut player, &mut dice));
        assert_eq!(battle.update(1000, &mut player, &mut dice), None);
        assert_eq!(
            battle.update(500, &mut player, &mut dice),
            Some(EnemyMove::Attack)
        );
        assert!(battle.is_player_turn());
    }
    assert!(battle.perform(BattleAction::Attack, &mut player, &mut dice));

    assert!(battle.is_victory());
    assert_eq!(
        battle.log(),
        [
            "Battle Started!",
            "Choose your action.",
            "Player attacks for 9 damage!",
            "Goblin attacks for 1 damage!",
            "Player attacks for 9 damage!",
            "Goblin attacks for 1 damage!",
            "Player attacks for 9 damage!",
            "Goblin defeated! Victory!",
            "Gained 16 EXP and 8 gold!",
        ]
    );
    assert_eq!(battle.enemy().hp, 0);
    assert_eq!(player.hp, 48);
    assert_eq!(player.experience, 16);
    assert_eq!(player.gold(), 108);
    assert_eq!(player.missions.kills("goblin"), 1);
    assert_eq!(player.enemies_defeated, 1);

    let report = battle.report().unwrap();
    assert_eq!((report.experience, report.gold, report.levels_gained), (16, 8, 0));
    assert!(report.loot.is_empty());
    assert!(report.new_unlocks.is_empty());
}

#[test]
fn menu_indices() {
    assert_eq!(ACTION_MENU.len(), 5);
    assert_eq!(BattleAction::from_index(2), Some(BattleAction::Special(None)));
    assert_eq!(BattleAction::from_index(4), Some(BattleAction::Run));
    assert_eq!(BattleAction::from_index(5), None);
}

#[test]
fn invalid_index_is_a_no_op() {
    let mut player = Player::new();
    let mut battle = instant(goblin());
    assert!(!battle.select_action(9, &mut player, &mut Midpoint));
    assert_eq!(battle.log().len(), 2);
    assert!(battle.is_player_turn());
    assert_eq!(battle.turn(), 1);
}

#[test]
fn actions_are_refused_outside_the_player_turn() {
    let mut player = Player::new();
    let mut battle = instant(goblin());
    assert!(battle.select_action(0, &mut player, &mut Midpoint));
    assert_eq!(battle.phase(), BattlePhase::EnemyTurn { elapsed_ms: 0 });
    assert!(!battle.perform(BattleAction::Attack, &mut player, &mut Midpoint));
    assert_eq!(battle.enemy().hp, 18);
}

#[test]
fn default_special_uses_the_strongest_learned_attack() {
    let mut player = Player::new();
    let mut battle = instant(goblin());
    assert!(battle.perform(BattleAction::Special(None), &mut player, &mut Midpoint));
    assert_eq!(battle.log().last().unwrap(), "Player uses slash for 14 damage!");
    assert_eq!(battle.enemy().hp, 13);
    assert_eq!(player.mp, 40);
    assert!(!battle.is_player_turn());
}

#[test]
fn special_failures_keep_the_turn() {
    let mut player = Player::new();
    let mut battle = instant(goblin());

    assert!(!battle.perform(
        BattleAction::Special(Some("fireball".into())),
        &mut player,
        &mut Midpoint
    ));
    assert_eq!(battle.log().last().unwrap(), "Attack not learned");

    player.mp = 5;
    assert!(!battle.perform(BattleAction::Special(None), &mut player, &mut Midpoint));
    assert_eq!(battle.log().last().unwrap(), "Not enough MP");

    player.mp = 50;
    player.special_attacks.get_mut("heal").unwrap().learned = true;
    assert!(!battle.perform(
        BattleAction::Special(Some("heal".into())),
        &mut player,
        &mut Midpoint
    ));
    assert_eq!(battle.log().last().unwrap(), "heal cannot be used in battle!");

    assert!(battle.is_player_turn());
    assert_eq!(battle.enemy().hp, 27);
    assert_eq!(player.mp, 50);
}

#[test]
fn special_cooldown_blocks_back_to_back_use() {
    let mut player = Player::new();
    let mut battle = instant(goblin());
    assert!(battle.perform(BattleAction::Special(None), &mut player, &mut Midpoint));
    battle.update(0, &mut player, &mut Midpoint);

    assert!(!battle.perform(BattleAction::Special(None), &mut player, &mut Midpoint));
    assert_eq!(battle.log().last().unwrap(), "Attack on cooldown");

    player.update(500);
    assert!(battle.perform(BattleAction::Special(None), &mut player, &mut Midpoint));
}

#[test]
fn defend_doubles_defense_for_the_next_hit() {
    let orc = || EnemyFactory::create_monster("orc", 5, &mut Midpoint).unwrap();

    let mut braced = Player::new();
    let mut battle = instant(orc());
    assert!(battle.perform(BattleAction::Defend, &mut braced, &mut Midpoint));
    assert!(battle.player_defending());
    battle.update(0, &mut braced, &mut Midpoint);
    assert_eq!(battle.log().last().unwrap(), "Orc attacks for 11 damage!");
    assert_eq!(braced.hp, 39);

    battle.perform(BattleAction::Attack, &mut braced, &mut Midpoint);
    assert!(!battle.player_defending());

    let mut open = Player::new();
    let mut battle = instant(orc());
    battle.perform(BattleAction::Attack, &mut open, &mut Midpoint);
    battle.update(0, &mut open, &mut Midpoint);
    assert_eq!(open.hp, 37);
}

#[test]
fn enemy_defend_halves_the_next_player_hit() {
    let mut player = Player::new();
    let mut battle = instant(goblin());
    let mut dice = Scripted::new([0, 70, 0]);

    battle.perform(BattleAction::Attack, &mut player, &mut dice);
    assert_eq!(battle.update(0, &mut player, &mut dice), Some(EnemyMove::Defend));
    assert!(battle.enemy_defending());
    assert_eq!(battle.log().last().unwrap(), "Goblin defends!");

    battle.perform(BattleAction::Attack, &mut player, &mut dice);
    assert_eq!(battle.log().last().unwrap(), "Player attacks for 8 damage!");
    assert_eq!(battle.enemy().hp, 10);

    assert_eq!(battle.update(0, &mut player, &mut dice), Some(EnemyMove::Attack));
    assert!(!battle.enemy_defending());
}

#[test]
fn enemy_special_hits_harder() {
    let mut player = Player::new();
    let mut battle = instant(EnemyFactory::create_monster("orc", 5, &mut Midpoint).unwrap());
    let mut dice = Scripted::new([0, 95, 0]);
    battle.perform(BattleAction::Attack, &mut player, &mut dice);
    assert_eq!(battle.update(0, &mut player, &mut dice), Some(EnemyMove::Special));
    // floor(21 * 1.5) = 31, minus 2.5, then the player's own defense
    assert_eq!(battle.log().last().unwrap(), "Orc uses special attack for 23 damage!");
    assert_eq!(player.hp, 27);
}

#[test]
fn run_succeeds_within_the_flee_chance() {
    let mut player = Player::new();
    let mut battle = instant(goblin());
    assert!(battle.perform(BattleAction::Run, &mut player, &mut Scripted::new([55])));
    assert_eq!(battle.outcome(), Some(BattleOutcome::Fled));
    assert_eq!(battle.log().last().unwrap(), "Player fled from battle!");
    assert!(battle.report().is_none());
    assert_eq!(player.gold(), 100);
    assert_eq!(player.experience, 0);
}

#[test]
fn failed_run_hands_the_turn_over() {
    let mut player = Player::new();
    let mut battle = instant(goblin());
    assert!(battle.perform(BattleAction::Run, &mut player, &mut Scripted::new([56])));
    assert_eq!(battle.log().last().unwrap(), "Could not escape!");
    assert_eq!(battle.phase(), BattlePhase::EnemyTurn { elapsed_ms: 0 });
    assert_eq!(battle.enemy().hp, 27);
}

#[test]
fn defeat_ends_the_battle_at_zero_hp() {
    let mut player = Player::new();
    player.hp = 1;
    let mut battle = instant(goblin());
    battle.perform(BattleAction::Attack, &mut player, &mut Midpoint);
    battle.update(0, &mut player, &mut Midpoint);

    assert_eq!(battle.outcome(), Some(BattleOutcome::Defeat));
    assert_eq!(battle.log().last().unwrap(), "Player defeated! Game Over!");
    assert_eq!(player.hp, 0);
    assert!(!battle.perform(BattleAction::Attack, &mut player, &mut Midpoint));
    assert_eq!(battle.update(1000, &mut player, &mut Midpoint), None);
    assert_eq!(player.missions.kills("goblin"), 0);
}

#[test]
fn item_action_starts_a_healing_potion() {
    let mut player = Player::new();
    player.add_item("herb", 1).unwrap();
    player.add_item("health_small", 2).unwrap();
    player.hp = 20;

    let mut battle = instant(goblin());
    assert!(battle.perform(BattleAction::Item(None), &mut player, &mut Midpoint));
    assert_eq!(battle.log().last().unwrap(), "Using Small Health Potion...");
    assert!(player.inventory.is_using());
    assert!(!battle.is_player_turn());
}

#[test]
fn item_action_without_candidates() {
    let mut player = Player::new();
    let mut battle = instant(goblin());
    assert!(!battle.perform(BattleAction::Item(None), &mut player, &mut Midpoint));
    assert_eq!(battle.log().last().unwrap(), "No items available!");

    player.add_item("herb", 3).unwrap();
    assert!(!battle.perform(BattleAction::Item(None), &mut player, &mut Midpoint));
    assert_eq!(battle.log().last().unwrap(), "No usable items available!");

    assert!(!battle.perform(BattleAction::Item(Some(0)), &mut player, &mut Midpoint));
    assert!(battle.is_player_turn());
}

#[test]
fn victory_level_up_and_unlocks() {
    let mut player = Player::new();
    player.level = 4;
    player.experience_to_next = 172;
    player.experience = 170;

    let mut enemy = goblin();
    enemy.hp = 1;
    let mut battle = instant(enemy);
    battle.perform(BattleAction::Attack, &mut player, &mut Midpoint);

    assert_eq!(player.level, 5);
    let log = battle.log();
    assert!(log.contains(&"LEVEL UP! You are now level 5!".to_string()));
    assert!(log.contains(&"New content unlocked!".to_string()));
    let report = battle.report().unwrap();
    assert_eq!(report.levels_gained, 1);
    assert_eq!(report.new_unlocks, vec!["fireball"]);
}

#[test]
fn boss_victory_grants_rewards_once() {
    let mut player = Player::new();
    let mut boss = EnemyFactory::create_boss("forest_guardian", 5).unwrap();
    boss.hp = 1;

    let mut battle = instant(boss.clone());
    battle.perform(BattleAction::Attack, &mut player, &mut Midpoint);
    assert!(battle.is_victory());
    assert!(player.has_defeated("forest_guardian"));
    assert_eq!(player.gold(), 100 + 200 + 500);
    assert!(battle.log().contains(&"Forest region unlocked".to_string()));
    assert!(battle.log().contains(&"  Boss Essence x1".to_string()));

    let report = battle.report().unwrap();
    assert!(report.boss_reward.is_some());
    let drops: Vec<_> = report.loot.iter().map(|d| d.template_id).collect();
    assert_eq!(drops, vec!["boss_essence", "legendary_weapon"]);

    let mut rematch = instant(boss);
    rematch.perform(BattleAction::Attack, &mut player, &mut Midpoint);
    assert!(rematch.report().unwrap().boss_reward.is_none());
    assert_eq!(player.defeated_bosses, vec!["forest_guardian"]);
}

#[test]
fn boss_reward_experience_counts_toward_level_ups() {
    let mut player = Player::new();
    let mut boss = EnemyFactory::create_boss("forest_guardian", 5).unwrap();
    boss.hp = 1;
    boss.exp_reward = 0;

    let mut battle = instant(boss);
    battle.perform(BattleAction::Attack, &mut player, &mut Midpoint);
    assert!(battle.is_victory());
    assert_eq!(player.level, 2);
    assert!(battle.log().contains(&"LEVEL UP! You are now level 2!".to_string()));

    let report = battle.report().unwrap();
    assert_eq!(report.levels_gained, 1);
    assert_eq!(report.new_level, 2);
    assert_eq!(report.boss_reward.as_ref().map(|grant| grant.levels_gained), Some(1));
}

#[test]
fn loot_that_does_not_fit_is_reported() {
    let mut player = Player::new();
    for _ in 0..player.inventory.capacity() {
        player.add_item("sword", 1).unwrap();
    }
    let mut boss = EnemyFactory::create_boss("forest_guardian", 5).unwrap();
    boss.hp = 1;

    let mut battle = instant(boss);
    battle.perform(BattleAction::Attack, &mut player, &mut Midpoint);
    let report = battle.report().unwrap();
    assert!(report.loot.is_empty());
    assert_eq!(report.lost_loot.len(), 2);
    assert!(
        battle
            .log()
            .contains(&"  Boss Essence x1 (inventory full)".to_string())
    );
}

#[test]
fn combatant_view() {
    let player = Player::new();
    let enemy = goblin();
    assert_eq!(Combatant::name(&player), "Player");
    assert_eq!(Combatant::name(&enemy), "Goblin");
    assert_eq!(enemy.effective_defense(true, 2), 4);
    assert_eq!(player.effective_defense(false, 2), 5);
    assert_eq!(player.attack_power(), 10);
}

#[test]
fn damage_with_midpoint() {
    assert_eq!(calculate_damage(10, 2, &mut Midpoint), 9);
    assert_eq!(calculate_damage(6, 5, &mut Midpoint), 3);
    assert_eq!(calculate_damage(1, 500, &mut Midpoint), 1);
}

proptest! {
    #[test]
    fn damage_never_drops_below_one(attack in 0u32..500, defense in 0u32..1000, seed: u64) {
        let mut rng = GameRng::new(seed);
        let damage = calculate_damage(attack, defense, &mut rng);
        prop_assert!(damage >= 1);
        prop_assert!(damage <= (attack + 2).max(1));
    }

    #[test]
    fn battles_always_terminate(seed: u64) {
        let mut rng = GameRng::new(seed);
        let mut player = Player::new();
        let enemy = EnemyFactory::generate_random_monster(3, 1, &mut rng).unwrap();
        let mut battle = instant(enemy);

        for _ in 0..200 {
            if battle.is_over() {
                break;
            }
            if battle.is_player_turn() {
                battle.perform(BattleAction::Attack, &mut player, &mut rng);
            } else {
                battle.update(16, &mut player, &mut rng);
            }
        }
        prop_assert!(battle.is_over());
        prop_assert!(battle.is_victory() || player.hp == 0);
    }
}
