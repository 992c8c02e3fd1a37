use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Source of randomness for gameplay rolls
pub trait Dice {
    /// Uniform integer in `[min, max]`
    fn int_range(&mut self, min: i32, max: i32) -> i32;

    /// Uniform float in `[min, max)`
    fn float_range(&mut self, min: f64, max: f64) -> f64;

    /// Roll a d100
    fn percent(&mut self) -> i32 {
        self.int_range(1, 100)
    }
}

impl<D: Dice + ?Sized> Dice for &mut D {
    fn int_range(&mut self, min: i32, max: i32) -> i32 {
        (**self).int_range(min, max)
    }

    fn float_range(&mut self, min: f64, max: f64) -> f64 {
        (**self).float_range(min, max)
    }
}

/// Seeded deterministic RNG
#[derive(Debug, Clone)]
pub struct GameRng {
    rng: Pcg32,
    seed: u64,
}

impl GameRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed from the thread-local generator
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Restart the sequence from the current seed
    pub fn reset(&mut self) {
        self.rng = Pcg32::seed_from_u64(self.seed);
    }

    pub fn reseed(&mut self, new_seed: u64) {
        self.seed = new_seed;
        self.reset();
    }

    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            let idx = self.rng.random_range(0..items.len());
            items.get(idx)
        }
    }
}

impl Dice for GameRng {
    fn int_range(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        self.rng.random_range(min..=max)
    }

    fn float_range(&mut self, min: f64, max: f64) -> f64 {
        if min >= max {
            return min;
        }
        self.rng.random_range(min..max)
    }
}

// Only the seed is persisted
impl Serialize for GameRng {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u64(self.seed)
    }
}

impl<'de> Deserialize<'de> for GameRng {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let seed = u64::deserialize(deserializer)?;
        Ok(Self::new(seed))
    }
}

/// Always answers the middle of the requested range (zero variance)
#[derive(Debug, Clone, Copy, Default)]
pub struct Midpoint;

impl Dice for Midpoint {
    fn int_range(&mut self, min: i32, max: i32) -> i32 {
        min + (max - min).div_euclid(2)
    }

    fn float_range(&mut self, min: f64, max: f64) -> f64 {
        (min + max) / 2.0
    }
}

/// Replays queued values, then falls back to [`Midpoint`]
///
/// Queued integers are clamped into the requested range so a script written
/// for one roll can never produce an out-of-range value for another.
#[derive(Debug, Clone, Default)]
pub struct Scripted {
    ints: VecDeque<i32>,
    floats: VecDeque<f64>,
}

impl Scripted {
    pub fn new(ints: impl IntoIterator<Item = i32>) -> Self {
        Self {
            ints: ints.into_iter().collect(),
            floats: VecDeque::new(),
        }
    }

    pub fn with_floats(mut self, floats: impl IntoIterator<Item = f64>) -> Self {
        self.floats = floats.into_iter().collect();
        self
    }

    pub fn push_int(&mut self, value: i32) {
        self.ints.push_back(value);
    }

    pub fn remaining(&self) -> usize {
        self.ints.len() + self.floats.len()
    }
}

impl Dice for Scripted {
    fn int_range(&mut self, min: i32, max: i32) -> i32 {
        match self.ints.pop_front() {
            Some(v) => v.clamp(min, max.max(min)),
            None => Midpoint.int_range(min, max),
        }
    }

    fn float_range(&mut self, min: f64, max: f64) -> f64 {
        match self.floats.pop_front() {
            Some(v) => v,
            None => Midpoint.float_range(min, max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = GameRng::new(123);
        let mut b = GameRng::new(123);
        for _ in 0..20 {
            assert_eq!(a.int_range(1, 100), b.int_range(1, 100));
        }

        a.reseed(456);
        b.reseed(456);
        assert_eq!(a.float_range(0.9, 1.1), b.float_range(0.9, 1.1));
    }

    #[test]
    fn rolls_stay_in_range() {
        let mut rng = GameRng::new(7);
        for _ in 0..1000 {
            let v = rng.int_range(-2, 2);
            assert!((-2..=2).contains(&v));
            let f = rng.float_range(0.9, 1.1);
            assert!((0.9..1.1).contains(&f));
        }
        assert_eq!(rng.int_range(5, 5), 5);
    }

    #[test]
    fn rng_serializes_as_seed() {
        let rng = GameRng::new(99);
        let json = serde_json::to_string(&rng).unwrap();
        assert_eq!(json, "99");
        let back: GameRng = serde_json::from_str(&json).unwrap();
        assert_eq!(back.seed(), 99);
    }

    #[test]
    fn midpoint_has_no_variance() {
        let mut d = Midpoint;
        assert_eq!(d.int_range(-2, 2), 0);
        assert_eq!(d.int_range(1, 100), 50);
        assert_eq!(d.float_range(0.9, 1.1), 1.0);
    }

    #[test]
    fn scripted_replays_then_falls_back() {
        let mut d = Scripted::new([99, 3]);
        assert_eq!(d.int_range(1, 100), 99);
        assert_eq!(d.int_range(1, 2), 2);
        assert_eq!(d.int_range(-2, 2), 0);
        assert_eq!(d.remaining(), 0);
    }
}
