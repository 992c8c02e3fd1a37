//! Shared builders for the integration tests

#![allow(dead_code)]

use pocket_quest::combat::{BattleAction, BattleConfig, BattleOutcome, BattleResolver, Enemy};
use pocket_quest::hero::Player;
use pocket_quest::math::Dice;

/// A player who wins any fight in one blow
pub fn champion() -> Player {
    let mut player = Player::new();
    player.base_attack = 500;
    player.update_derived_stats();
    player
}

/// Attack every turn until the battle ends; enemy replies resolve at once
pub fn fight(enemy: Enemy, player: &mut Player, dice: &mut impl Dice) -> BattleResolver {
    let mut battle = BattleResolver::with_config(enemy, BattleConfig::instant());
    for _ in 0..500 {
        if battle.is_over() {
            return battle;
        }
        if battle.is_player_turn() {
            battle.perform(BattleAction::Attack, player, dice);
        }
        battle.update(0, player, dice);
    }
    panic!("battle against {} never ended", battle.enemy().name);
}

pub fn outcome(battle: &BattleResolver) -> BattleOutcome {
    battle.outcome().unwrap_or_else(|| panic!("battle still running"))
}
