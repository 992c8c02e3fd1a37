// src/save/src/lib.rs
//! Save persistence
//!
//! One versioned JSON document under one fixed key. The public API never
//! returns an error: failures are logged and surface as `false` / `None`, and
//! the caller decides whether to fall back to a new game.

pub mod autosave;
pub mod migrate;
pub mod snapshot;
pub mod storage;

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use error::{GameError, handle_error};
use hero::Player;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use crate::autosave::AutoSave;
pub use crate::migrate::{MIGRATIONS, Migration, SAVE_VERSION, migrate};
pub use crate::snapshot::{
    InventorySnapshot, ItemRecord, PlayerSnapshot, ProgressionSnapshot, SaveBlob, SaveMetadata,
    WorldSnapshot,
};
pub use crate::storage::{FileStorage, MemoryStorage, SaveStorage};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SaveConfig {
    pub save_key: String,
    pub version: String,
    pub auto_save_interval_ms: u64,
    pub auto_save_enabled: bool,
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            save_key: "rpg_adventure_save".to_string(),
            version: SAVE_VERSION.to_string(),
            auto_save_interval_ms: 60_000,
            auto_save_enabled: true,
        }
    }
}

/// Summary shown on a load screen
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveInfo {
    pub version: String,
    pub timestamp: u64,
    pub player_level: u32,
    pub play_time: f64,
    pub defeated_bosses: usize,
    pub unlocked_regions: usize,
    pub gold: u32,
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

pub fn calculate_unlocked_regions(defeated_bosses: &[String]) -> Vec<String> {
    progression::unlocked_regions(defeated_bosses)
}

pub fn calculate_unlocked_towns(defeated_bosses: &[String]) -> Vec<String> {
    progression::unlocked_towns(defeated_bosses)
}

pub fn calculate_total_experience(level: u32, current_exp: u32) -> u64 {
    progression::calculate_total_experience(level, current_exp)
}

pub struct SaveManager {
    config: SaveConfig,
    storage: Box<dyn SaveStorage>,
    last_save: Option<u64>,
}

impl std::fmt::Debug for SaveManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaveManager")
            .field("config", &self.config)
            .field("last_save", &self.last_save)
            .finish_non_exhaustive()
    }
}

impl SaveManager {
    pub fn new(config: SaveConfig, storage: impl SaveStorage + 'static) -> Self {
        Self {
            config,
            storage: Box::new(storage),
            last_save: None,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(SaveConfig::default(), MemoryStorage::new())
    }

    pub fn with_save_dir(config: SaveConfig, dir: impl AsRef<Path>) -> Result<Self> {
        let storage = FileStorage::new(dir)?;
        Ok(Self::new(config, storage))
    }

    pub fn config(&self) -> &SaveConfig {
        &self.config
    }

    /// Timestamp of the last successful save from this manager
    pub fn last_save(&self) -> Option<u64> {
        self.last_save
    }

    /// Snapshot the player and replace the stored blob
    pub fn save_game(&mut self, player: &Player, additional: SaveMetadata) -> bool {
        match self.try_save(player, additional) {
            Ok(()) => {
                log::info!("game saved");
                true
            }
            Err(err) => {
                log::error!("save failed: {err:#}");
                false
            }
        }
    }

    fn try_save(&mut self, player: &Player, additional: SaveMetadata) -> Result<()> {
        let timestamp = now_millis();
        let blob = SaveBlob::capture(player, &self.config.version, timestamp, additional);
        let json = serde_json::to_string(&blob).context("Failed to serialize save data")?;
        self.storage.write(&self.config.save_key, &json)?;
        self.last_save = Some(timestamp);
        Ok(())
    }

    /// Stored blob, migrated to the current version; `None` if absent or unreadable
    pub fn load_game(&self) -> Option<SaveBlob> {
        match self.try_load() {
            Ok(Some(blob)) => {
                log::info!("game loaded");
                Some(blob)
            }
            Ok(None) => {
                log::info!("no save data found");
                None
            }
            Err(err) => {
                log::error!("load failed: {}", handle_error(&err));
                None
            }
        }
    }

    /// Like [`load_game`](Self::load_game) but keeps the reason for a failure
    pub fn try_load(&self) -> Result<Option<SaveBlob>, GameError> {
        match self.storage.read(&self.config.save_key)? {
            Some(raw) if !raw.is_empty() => self.decode(&raw).map(Some),
            _ => Ok(None),
        }
    }

    fn decode(&self, raw: &str) -> Result<SaveBlob, GameError> {
        let mut value: Value = serde_json::from_str(raw)?;
        let found = value
            .get("version")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        if found != self.config.version {
            log::warn!(
                "save version mismatch: found '{found}', expected {}",
                self.config.version
            );
            migrate(&mut value, &self.config.version);
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Load and rebuild the player in one step
    pub fn load_player(&self) -> Option<Player> {
        self.load_game().map(|blob| blob.restore_player())
    }

    pub fn has_save_data(&self) -> bool {
        self.storage.exists(&self.config.save_key)
    }

    pub fn delete_save(&mut self) -> bool {
        match self.storage.remove(&self.config.save_key) {
            Ok(removed) => {
                log::info!("save data deleted");
                removed
            }
            Err(err) => {
                log::error!("delete save failed: {err:#}");
                false
            }
        }
    }

    pub fn get_save_info(&self) -> Option<SaveInfo> {
        let blob = self.load_game()?;
        Some(SaveInfo {
            version: blob.version,
            timestamp: blob.timestamp,
            player_level: blob.player.level,
            play_time: blob.additional.play_time,
            defeated_bosses: blob.progression.defeated_bosses.len(),
            unlocked_regions: calculate_unlocked_regions(&blob.progression.defeated_bosses).len(),
            gold: blob.player.inventory.gold,
        })
    }

    /// Raw stored document for sharing
    pub fn export_save(&self) -> Option<String> {
        match self.storage.read(&self.config.save_key) {
            Ok(found) => found.filter(|raw| !raw.is_empty()),
            Err(err) => {
                log::error!("export failed: {err:#}");
                None
            }
        }
    }

    /// Replace the stored blob with `data` after checking that it decodes
    pub fn import_save(&mut self, data: &str) -> bool {
        let blob = match self.decode(data) {
            Ok(blob) => blob,
            Err(err) => {
                log::error!("import rejected: {}", handle_error(&err));
                return false;
            }
        };
        let written = serde_json::to_string(&blob)
            .context("Failed to serialize imported save")
            .and_then(|json| self.storage.write(&self.config.save_key, &json));
        match written {
            Ok(()) => {
                log::info!("save data imported");
                true
            }
            Err(err) => {
                log::error!("import failed: {err:#}");
                false
            }
        }
    }

    /// Save if the auto-save timer says so
    pub fn poll_auto_save(&mut self, auto: &mut AutoSave, delta_ms: u64, player: &Player, play_time: f64) -> bool {
        if !auto.update(delta_ms) {
            return false;
        }
        self.save_game(player, SaveMetadata::auto(play_time))
    }

    pub fn auto_save(&self) -> AutoSave {
        AutoSave::new(self.config.auto_save_interval_ms, self.config.auto_save_enabled)
    }
}
