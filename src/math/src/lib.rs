//! Numeric helpers shared by every gameplay crate
//!
//! Geometry and interpolation are plain functions. Randomness is injected
//! through the [`Dice`] trait so battles and loot rolls can be replayed.

mod dice;

pub use dice::{Dice, GameRng, Midpoint, Scripted};

/// World pixels per tile
pub const TILE_SIZE: i32 = 32;

/// Clamp `value` into `[min, max]`
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}

/// Linear interpolation between `start` and `end`
pub fn lerp(start: f64, end: f64, t: f64) -> f64 {
    start + (end - start) * t
}

pub fn distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let dx = x2 - x1;
    let dy = y2 - y1;
    (dx * dx + dy * dy).sqrt()
}

/// Inclusive on every edge
pub fn point_in_rect(px: f64, py: f64, rx: f64, ry: f64, rw: f64, rh: f64) -> bool {
    px >= rx && px <= rx + rw && py >= ry && py <= ry + rh
}

pub fn grid_to_pixel(grid_x: i32, grid_y: i32, tile_size: i32) -> (i32, i32) {
    (grid_x * tile_size, grid_y * tile_size)
}

/// Floors toward negative infinity so positions left of the origin land on -1
pub fn pixel_to_grid(pixel_x: f64, pixel_y: f64, tile_size: i32) -> (i32, i32) {
    let size = f64::from(tile_size);
    (
        (pixel_x / size).floor() as i32,
        (pixel_y / size).floor() as i32,
    )
}

/// Inclusive integer roll
pub fn random_int(dice: &mut impl Dice, min: i32, max: i32) -> i32 {
    dice.int_range(min, max)
}

pub fn random_float(dice: &mut impl Dice, min: f64, max: f64) -> f64 {
    dice.float_range(min, max)
}
