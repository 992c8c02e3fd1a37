// src/hero/src/lib.rs
//! Player state: stats and levelling, inventory and equipment, special
//! attacks, mission progress and the timer scheduler that drives deferred
//! item effects and buff expiry.

pub mod bag;
pub mod missions;
pub mod player;
pub mod special;
pub mod timers;

pub use self::{
    bag::{
        AddReport, Equipment, EquipReport, Inventory, InventoryError, InventoryItem, SortMode,
        UseRequest,
    },
    missions::MissionLog,
    player::{Facing, Player, PlayerEvent, PlayerStatus, experience_for_level},
    special::{
        SPECIAL_ATTACK_ORDER, SpecialAttack, SpecialAttackError, SpecialAttackUse,
        default_special_attacks,
    },
    timers::{Scheduler, TimerHandle},
};
