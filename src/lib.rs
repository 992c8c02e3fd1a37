//! Battle and progression core for a small overworld RPG
//!
//! The member crates hold the rules; this crate ties them into one
//! [`Game`] that a front end drives frame by frame.

pub mod game;

pub use combat;
pub use error;
pub use hero;
pub use items;
pub use math;
pub use progression;
pub use save;
pub use town;

pub use crate::game::{Game, GameEvent, Scene, area_level};
