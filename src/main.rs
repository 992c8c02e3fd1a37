//! Headless demo: shops in the starter town, grinds the plains and takes a
//! shot at the first boss, printing the battle log as it goes.
//!
//! Usage: `pocket_quest [seed] [save-dir]`. Without a save directory the
//! game lives in memory and is gone on exit.

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use pocket_quest::combat::{BattleAction, BattleConfig, BattleOutcome};
use pocket_quest::save::{SaveConfig, SaveManager};
use pocket_quest::{Game, Scene};

const FRAME_MS: u64 = 100;
const MAX_ENCOUNTERS: usize = 12;
const FIRST_BOSS: &str = "forest_guardian";

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(raw) => raw
            .parse::<u64>()
            .with_context(|| format!("Invalid seed: {raw}"))?,
        None => SystemTime::now()
            .duration_since(UNIX_EPOCH)?
            .as_secs(),
    };
    let saves = match args.next() {
        Some(dir) => SaveManager::with_save_dir(SaveConfig::default(), &dir)
            .with_context(|| format!("Failed to open save directory {dir}"))?,
        None => SaveManager::in_memory(),
    };

    let mut game = Game::load_or_new(saves, BattleConfig::default(), seed);
    println!("Seed {seed}, level {} hero with {} gold", game.player.level, game.player.gold());

    visit_town(&mut game);

    for round in 1..=MAX_ENCOUNTERS {
        if game.start_encounter().is_err() {
            break;
        }
        println!("\n-- Encounter {round} --");
        if fight(&mut game) == Some(BattleOutcome::Defeat) {
            println!("The hero falls. Back to the last save.");
            break;
        }
        if game.player.level >= 5 {
            break;
        }
    }

    match game.start_boss_battle(FIRST_BOSS) {
        Ok(()) => {
            println!("\n-- Boss: {FIRST_BOSS} --");
            fight(&mut game);
        }
        Err(err) => println!("\n{}", pocket_quest::error::handle_error(&err)),
    }

    if game.save() {
        if let Some(info) = game.saves().get_save_info() {
            println!(
                "\nSaved: level {}, {} gold, {} boss(es), {} region(s)",
                info.player_level, info.gold, info.defeated_bosses, info.unlocked_regions
            );
        }
    }
    println!("Completion: {}%", game.completion());
    Ok(())
}

fn visit_town(game: &mut Game) {
    if let Err(err) = game.enter_town("starter_town") {
        println!("{err}");
        return;
    }
    if let Scene::Town(town) = &mut game.scene {
        let potion = town
            .market()
            .iter()
            .position(|item| item.template_id == "health_small");
        if let Some(index) = potion {
            for _ in 0..2 {
                match town.buy_item(index, &mut game.player) {
                    Ok(message) => println!("{message}"),
                    Err(err) => println!("{err}"),
                }
            }
        }
        if let Ok(message) = town.accept_mission(0, &mut game.player) {
            println!("{message}");
        }
    }
    game.leave_town();
}

/// Drive one battle to the end, printing new log lines as they appear
fn fight(game: &mut Game) -> Option<BattleOutcome> {
    let mut printed = 0;
    loop {
        let Some(battle) = game.battle() else {
            return None;
        };
        for line in &battle.log()[printed..] {
            println!("{line}");
        }
        printed = battle.log().len();

        if battle.is_over() {
            return game.finish_battle();
        }
        if battle.is_player_turn() {
            let action = if game.player.hp * 3 < game.player.max_hp {
                BattleAction::Item(None)
            } else if game.player.default_special_attack().is_some() && game.player.mp >= 20 {
                BattleAction::Special(None)
            } else {
                BattleAction::Attack
            };
            if !game.battle_action(action) {
                game.battle_action(BattleAction::Attack);
            }
        }
        game.update(FRAME_MS);
    }
}
