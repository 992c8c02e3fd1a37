mod helpers;

use pocket_quest::combat::{BattleOutcome, EnemyFactory};
use pocket_quest::hero::Player;
use pocket_quest::math::{GameRng, Midpoint};
use pocket_quest::progression::ProgressionManager;
use pocket_quest::town::{Town, TownError};
use pretty_assertions::assert_eq;

use helpers::{champion, fight, outcome};

#[test]
fn goblin_hunt_completes_the_village_mission() {
    let mut player = Player::new();
    let mut town = Town::enter("starter_town", &mut player, &mut Midpoint).unwrap();
    town.accept_mission(1, &mut player).unwrap();
    assert_eq!(
        town.complete_mission(1, &mut player),
        Err(TownError::RequirementsNotMet)
    );

    for _ in 0..3 {
        let goblin = EnemyFactory::create_monster("goblin", player.level, &mut Midpoint).unwrap();
        let battle = fight(goblin, &mut player, &mut Midpoint);
        assert_eq!(outcome(&battle), BattleOutcome::Victory);
    }
    assert_eq!(player.missions.kills("goblin"), 3);
    assert_eq!(player.enemies_defeated, 3);

    let gold = player.gold();
    town.complete_mission(1, &mut player).unwrap();
    assert_eq!(player.gold(), gold + 100);
    assert!(player.missions.is_completed("slay_goblins"));
    assert_eq!(
        town.complete_mission(1, &mut player),
        Err(TownError::NotActive)
    );
    assert_eq!(
        town.accept_mission(1, &mut player),
        Err(TownError::AlreadyCompleted)
    );
}

#[test]
fn first_boss_opens_the_forest_and_the_harbor() {
    let manager = ProgressionManager::new();
    let mut player = champion();
    assert!(Town::enter("port_town", &mut player, &mut Midpoint).is_err());
    let before = manager.calculate_completion(&player);

    let boss = EnemyFactory::create_boss("forest_guardian", player.level).unwrap();
    let battle = fight(boss, &mut player, &mut Midpoint);
    assert_eq!(outcome(&battle), BattleOutcome::Victory);
    let report = battle.report().unwrap();
    assert!(report.boss_reward.is_some());

    assert!(player.has_defeated("forest_guardian"));
    assert_eq!(manager.get_unlocked_regions(&player.defeated_bosses), vec!["plains", "forest"]);
    assert!(Town::enter("port_town", &mut player, &mut Midpoint).is_ok());
    assert!(manager.calculate_completion(&player) > before);
    assert_eq!(manager.get_next_boss(&player.defeated_bosses), Some("mountain_titan"));
}

#[test]
fn boss_reward_is_only_paid_once() {
    let mut player = champion();
    let first = fight(
        EnemyFactory::create_boss("forest_guardian", player.level).unwrap(),
        &mut player,
        &mut Midpoint,
    );
    assert!(first.report().unwrap().boss_reward.is_some());

    let again = fight(
        EnemyFactory::create_boss("forest_guardian", player.level).unwrap(),
        &mut player,
        &mut Midpoint,
    );
    assert_eq!(again.report().unwrap().boss_reward, None);
    assert_eq!(player.defeated_bosses, vec!["forest_guardian"]);
}

#[test]
fn seeded_runs_are_reproducible() {
    let run = |seed: u64| {
        let mut rng = GameRng::new(seed);
        let mut player = Player::new();
        let mut log = Vec::new();
        for _ in 0..5 {
            let Some(enemy) = EnemyFactory::generate_random_monster(3, player.level, &mut rng) else {
                break;
            };
            let battle = fight(enemy, &mut player, &mut rng);
            log.extend(battle.log().iter().cloned());
            if !player.is_alive() {
                break;
            }
        }
        (log, player.level, player.gold())
    };
    assert_eq!(run(2024), run(2024));
}
