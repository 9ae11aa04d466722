//! Seedable randomness shared by the boss engine and the headless runner.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// RNG wrapper so encounters can be replayed from a seed.
#[derive(Resource)]
pub struct GameRng {
    rng: StdRng,
    /// The seed used to initialize this RNG (if deterministic)
    pub seed: Option<u64>,
}

impl GameRng {
    /// Create a new GameRng with a specific seed for deterministic behavior
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Create a new GameRng with random entropy (non-deterministic)
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            seed: None,
        }
    }

    /// Seeded when a seed is given, entropy otherwise.
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::from_entropy(),
        }
    }

    /// Generate a random f32 in the range [0.0, 1.0)
    pub fn random_f32(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Generate a random f32 in the given range
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.random_f32() * (max - min)
    }

    /// Uniform angle in radians.
    pub fn random_angle(&mut self) -> f32 {
        self.random_f32() * TAU
    }

    /// Random point on a ring between `min_radius` and `max_radius` around the origin.
    pub fn random_offset(&mut self, min_radius: f32, max_radius: f32) -> Vec2 {
        let angle = self.random_angle();
        let radius = self.random_range(min_radius, max_radius);
        Vec2::from_angle(angle) * radius
    }

    /// Derive a child seed, used to give each spawned boss its own stream.
    pub fn next_seed(&mut self) -> u64 {
        self.rng.gen()
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = GameRng::from_seed(7);
        let mut b = GameRng::from_seed(7);
        for _ in 0..16 {
            assert_eq!(a.random_f32(), b.random_f32());
        }
    }

    #[test]
    fn test_random_offset_respects_ring() {
        let mut rng = GameRng::from_seed(99);
        for _ in 0..64 {
            let offset = rng.random_offset(40.0, 80.0);
            let len = offset.length();
            assert!(len >= 39.99 && len <= 80.01, "offset length {} outside ring", len);
        }
    }
}
