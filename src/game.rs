//! Application context
//!
//! Owns the player and whichever scene is active and drives both from one
//! `update(delta_ms)` call per frame. Scenes borrow the player only for the
//! length of a call, so the player record is never duplicated.

use combat::{
    BattleAction, BattleConfig, BattleOutcome, BattleResolver, Enemy, EnemyFactory, EnemyMove,
    boss_template,
};
use error::GameError;
use hero::{Player, PlayerEvent};
use math::GameRng;
use progression::{ContentKind, ProgressionManager, ProgressionStatus};
use save::{AutoSave, SaveManager, SaveMetadata};
use town::Town;

/// Monster level used for random encounters in a region
pub fn area_level(region: &str) -> u32 {
    match region {
        "forest" => 6,
        "mountains" => 10,
        "castle" => 15,
        _ => 3,
    }
}

#[derive(Debug)]
pub enum Scene {
    Overworld,
    Battle(Box<BattleResolver>),
    Town(Box<Town>),
}

impl Scene {
    pub fn name(&self) -> &'static str {
        match self {
            Scene::Overworld => "overworld",
            Scene::Battle(_) => "battle",
            Scene::Town(_) => "town",
        }
    }
}

/// What a frame update resolved
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Player(PlayerEvent),
    EnemyActed(EnemyMove),
    AutoSaved,
}

#[derive(Debug)]
pub struct Game {
    pub player: Player,
    pub scene: Scene,
    play_time_ms: u64,
    saves: SaveManager,
    auto_save: AutoSave,
    rng: GameRng,
    battle_config: BattleConfig,
    progression: ProgressionManager,
}

impl Game {
    pub fn new(saves: SaveManager, battle_config: BattleConfig, seed: u64) -> Self {
        let auto_save = saves.auto_save();
        Self {
            player: Player::new(),
            scene: Scene::Overworld,
            play_time_ms: 0,
            saves,
            auto_save,
            rng: GameRng::new(seed),
            battle_config,
            progression: ProgressionManager::new(),
        }
    }

    /// Resume the stored game if there is one, otherwise start fresh
    pub fn load_or_new(saves: SaveManager, battle_config: BattleConfig, seed: u64) -> Self {
        let mut game = Self::new(saves, battle_config, seed);
        if !game.continue_game() {
            log::info!("starting new game (seed {seed})");
        }
        game
    }

    /// Replace the current state with the stored game
    pub fn continue_game(&mut self) -> bool {
        let Some(blob) = self.saves.load_game() else {
            return false;
        };
        self.player = blob.restore_player();
        if !self.player.is_alive() {
            log::warn!("stored hero had no hp left, restoring to full");
            self.player.hp = self.player.max_hp;
            self.player.mp = self.player.max_mp;
        }
        self.play_time_ms = blob.additional.play_time.max(0.0) as u64;
        self.scene = Scene::Overworld;
        self.auto_save.reset();
        true
    }

    /* ==== accessors ==== */

    pub fn play_time_ms(&self) -> u64 {
        self.play_time_ms
    }

    pub fn saves(&self) -> &SaveManager {
        &self.saves
    }

    pub fn saves_mut(&mut self) -> &mut SaveManager {
        &mut self.saves
    }

    pub fn auto_save_mut(&mut self) -> &mut AutoSave {
        &mut self.auto_save
    }

    pub fn rng_mut(&mut self) -> &mut GameRng {
        &mut self.rng
    }

    pub fn battle(&self) -> Option<&BattleResolver> {
        match &self.scene {
            Scene::Battle(battle) => Some(&**battle),
            _ => None,
        }
    }

    pub fn town(&self) -> Option<&Town> {
        match &self.scene {
            Scene::Town(town) => Some(&**town),
            _ => None,
        }
    }

    pub fn progression_status(&self) -> ProgressionStatus {
        self.progression.get_progression_status(&self.player)
    }

    pub fn completion(&self) -> u32 {
        self.progression.calculate_completion(&self.player)
    }

    /* ==== frame ==== */

    pub fn update(&mut self, delta_ms: u64) -> Vec<GameEvent> {
        self.play_time_ms = self.play_time_ms.saturating_add(delta_ms);

        let mut events: Vec<GameEvent> = self
            .player
            .update(delta_ms)
            .into_iter()
            .map(GameEvent::Player)
            .collect();

        match &mut self.scene {
            Scene::Overworld => {}
            Scene::Battle(battle) => {
                if let Some(enemy_move) = battle.update(delta_ms, &mut self.player, &mut self.rng) {
                    events.push(GameEvent::EnemyActed(enemy_move));
                }
            }
            Scene::Town(town) => town.update(delta_ms),
        }

        // a finished battle or a fallen hero waits for finish_battle
        let settled = self.player.is_alive() && !self.battle().is_some_and(BattleResolver::is_over);
        let play_time = self.play_time_ms as f64;
        if settled
            && self
                .saves
                .poll_auto_save(&mut self.auto_save, delta_ms, &self.player, play_time)
        {
            events.push(GameEvent::AutoSaved);
        }
        events
    }

    /* ==== overworld ==== */

    fn ensure_overworld(&self) -> Result<(), GameError> {
        match self.scene {
            Scene::Overworld => Ok(()),
            ref other => Err(GameError::Rejected(format!(
                "Not available in the {}",
                other.name()
            ))),
        }
    }

    /// Move to another unlocked region
    pub fn travel(&mut self, region: &str) -> Result<(), GameError> {
        self.ensure_overworld()?;
        if !self
            .progression
            .can_access_content(&self.player, ContentKind::Region, region)
        {
            log::info!("region {region} is still locked");
            return Err(GameError::Rejected(format!("Cannot access {region} yet")));
        }
        self.player.current_region = region.to_string();
        self.player.visit_area(region);
        Ok(())
    }

    /// Random encounter scaled to the current region
    pub fn start_encounter(&mut self) -> Result<(), GameError> {
        self.ensure_overworld()?;
        let level = area_level(&self.player.current_region);
        let enemy = EnemyFactory::generate_random_monster(level, self.player.level, &mut self.rng)
            .ok_or_else(|| GameError::unknown("monster", format!("area level {level}")))?;
        self.begin_battle(enemy);
        Ok(())
    }

    pub fn start_boss_battle(&mut self, boss_id: &str) -> Result<(), GameError> {
        self.ensure_overworld()?;
        let template = boss_template(boss_id).ok_or_else(|| GameError::unknown("boss", boss_id))?;
        if self.player.has_defeated(boss_id) {
            return Err(GameError::Rejected(format!("{} already defeated", template.name)));
        }
        if self.player.level < template.required_level {
            return Err(GameError::Rejected(format!(
                "Reach level {} to challenge {}",
                template.required_level, template.name
            )));
        }
        let enemy = EnemyFactory::create_boss(boss_id, self.player.level)
            .ok_or_else(|| GameError::unknown("boss", boss_id))?;
        self.begin_battle(enemy);
        Ok(())
    }

    fn begin_battle(&mut self, enemy: Enemy) {
        let battle = BattleResolver::with_config(enemy, self.battle_config.clone());
        self.scene = Scene::Battle(Box::new(battle));
    }

    /* ==== battle ==== */

    /// Menu selection in the active battle
    pub fn battle_select(&mut self, index: usize) -> bool {
        match &mut self.scene {
            Scene::Battle(battle) => battle.select_action(index, &mut self.player, &mut self.rng),
            _ => false,
        }
    }

    pub fn battle_action(&mut self, action: BattleAction) -> bool {
        match &mut self.scene {
            Scene::Battle(battle) => battle.perform(action, &mut self.player, &mut self.rng),
            _ => false,
        }
    }

    /// Leave a finished battle
    ///
    /// A defeat drops back to the last save, or a fresh hero without one.
    pub fn finish_battle(&mut self) -> Option<BattleOutcome> {
        let outcome = self.battle()?.outcome()?;
        self.scene = Scene::Overworld;
        if outcome == BattleOutcome::Defeat && !self.continue_game() {
            log::info!("no save to fall back to, starting over");
            self.player = Player::new();
        }
        Some(outcome)
    }

    /* ==== town ==== */

    pub fn enter_town(&mut self, town_id: &str) -> Result<(), GameError> {
        self.ensure_overworld()?;
        let town = Town::enter(town_id, &mut self.player, &mut self.rng)?;
        self.scene = Scene::Town(Box::new(town));
        Ok(())
    }

    pub fn leave_town(&mut self) -> bool {
        if !matches!(self.scene, Scene::Town(_)) {
            return false;
        }
        self.scene = Scene::Overworld;
        true
    }

    /* ==== persistence ==== */

    pub fn save(&mut self) -> bool {
        if !self.player.is_alive() {
            log::info!("refusing to save a fallen hero");
            return false;
        }
        let saved = self
            .saves
            .save_game(&self.player, SaveMetadata::manual(self.play_time_ms as f64));
        if saved {
            self.auto_save.reset();
        }
        saved
    }
}
