use std::fs;

use pocket_quest::Game;
use pocket_quest::combat::BattleConfig;
use pocket_quest::hero::Player;
use pocket_quest::save::{PlayerSnapshot, SaveConfig, SaveManager};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tempfile::tempdir;

fn manager(dir: &std::path::Path) -> SaveManager {
    SaveManager::with_save_dir(SaveConfig::default(), dir).unwrap()
}

#[test]
fn progress_survives_a_restart() {
    let dir = tempdir().unwrap();
    let mut game = Game::new(manager(dir.path()), BattleConfig::instant(), 3);
    game.player.defeat_boss("forest_guardian");
    game.travel("forest").unwrap();
    game.enter_town("port_town").unwrap();
    game.leave_town();
    game.player.missions.activate("patrol_docks");
    game.player.add_item("herb", 4).unwrap();
    game.update(1_234);
    assert!(game.save());

    let raw = fs::read_to_string(dir.path().join("rpg_adventure_save.json")).unwrap();
    let blob: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(blob["version"], "1.0");
    assert_eq!(blob["world"]["unlockedTowns"], json!(["riverside_village", "harbor_city"]));
    assert_eq!(blob["world"]["currentRegion"], "forest");

    let reloaded = Game::load_or_new(manager(dir.path()), BattleConfig::instant(), 99);
    assert_eq!(reloaded.play_time_ms(), 1_234);
    assert_eq!(reloaded.player.current_region, "forest");
    assert_eq!(reloaded.player.last_town.as_deref(), Some("port_town"));
    assert_eq!(reloaded.player.defeated_bosses, vec!["forest_guardian"]);
    assert!(reloaded.player.missions.is_active("patrol_docks"));
    assert_eq!(reloaded.player.inventory.count_of("herb"), 4);
    assert!(reloaded.player.visited_areas.contains("forest"));
}

#[test]
fn older_save_is_migrated_on_load() {
    let dir = tempdir().unwrap();
    let mut veteran = Player::new();
    veteran.gain_experience(300);
    let old = json!({
        "version": "0.9",
        "timestamp": 1,
        "player": serde_json::to_value(PlayerSnapshot::capture(&veteran)).unwrap(),
    });
    fs::write(dir.path().join("rpg_adventure_save.json"), old.to_string()).unwrap();

    let game = Game::load_or_new(manager(dir.path()), BattleConfig::instant(), 1);
    assert_eq!(game.player.level, veteran.level);
    assert_eq!(game.player.current_region, "plains");
    assert!(game.player.defeated_bosses.is_empty());
}

#[test]
fn corrupt_save_starts_a_new_game() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("rpg_adventure_save.json"), "{\"version\": \"1.0\"").unwrap();

    let mut game = Game::load_or_new(manager(dir.path()), BattleConfig::instant(), 1);
    assert_eq!(game.player.level, 1);
    assert_eq!(game.player.gold(), 100);
    assert!(game.save());
    assert!(game.saves().load_game().is_some());
}

#[test]
fn deleting_the_save_leaves_nothing_to_continue() {
    let dir = tempdir().unwrap();
    let mut game = Game::new(manager(dir.path()), BattleConfig::instant(), 5);
    assert!(game.save());
    assert!(game.saves_mut().delete_save());
    assert!(!game.continue_game());
    assert!(!dir.path().join("rpg_adventure_save.json").exists());
}
