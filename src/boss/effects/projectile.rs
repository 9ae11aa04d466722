//! Boss projectiles: straight-line shots removed on hit or when they leave the arena.

use bevy::prelude::*;

use crate::boss::visuals::VisualHandle;
use crate::world::{circle_overlaps_rect, in_bounds};

#[derive(Debug, Clone)]
pub struct Projectile {
    pub handle: VisualHandle,
    /// Ability that fired it
    pub source: &'static str,
    pub position: Vec2,
    /// Pixels per second
    pub velocity: Vec2,
    pub damage: f32,
    pub radius: f32,
    pub active: bool,
}

/// Tuning for a fan of projectiles.
#[derive(Debug, Clone, Copy)]
pub struct VolleySpec {
    pub count: u8,
    /// Angle between neighbouring shots, radians
    pub spread: f32,
    /// Pixels per second
    pub speed: f32,
    pub damage: f32,
    pub radius: f32,
}

/// What happened to a projectile during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileFate {
    Flying,
    HitTarget,
    OutOfBounds,
    Deactivated,
}

impl Projectile {
    pub fn advance(&mut self, dt: f32) {
        self.position += self.velocity * dt;
    }

    pub fn hits(&self, target_center: Vec2, target_size: Vec2) -> bool {
        circle_overlaps_rect(self.position, self.radius, target_center, target_size)
    }

    /// Move one tick and classify the result. `target` is `None` when there
    /// is no living player to collide with.
    pub fn step(&mut self, dt: f32, target: Option<(Vec2, Vec2)>) -> ProjectileFate {
        if !self.active {
            return ProjectileFate::Deactivated;
        }
        self.advance(dt);
        if !in_bounds(self.position) {
            return ProjectileFate::OutOfBounds;
        }
        match target {
            Some((center, size)) if self.hits(center, size) => ProjectileFate::HitTarget,
            _ => ProjectileFate::Flying,
        }
    }
}

/// Velocities for `count` shots fanned around `bearing` (radians), `spread`
/// radians apart, all at `speed`.
pub fn volley_velocities(bearing: f32, count: u8, spread: f32, speed: f32) -> Vec<Vec2> {
    let middle = (f32::from(count) - 1.0) * 0.5;
    (0..count)
        .map(|i| {
            let angle = bearing + (f32::from(i) - middle) * spread;
            Vec2::from_angle(angle) * speed
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projectile(position: Vec2, velocity: Vec2) -> Projectile {
        Projectile {
            handle: VisualHandle(1),
            source: "Test Shot",
            position,
            velocity,
            damage: 10.0,
            radius: 8.0,
            active: true,
        }
    }

    #[test]
    fn test_flies_until_leaving_bounds() {
        let mut shot = projectile(Vec2::new(10.0, 100.0), Vec2::new(-40.0, 0.0));
        assert_eq!(shot.step(0.1, None), ProjectileFate::Flying); // x = 6
        assert_eq!(shot.step(0.1, None), ProjectileFate::Flying); // x = 2
        assert_eq!(shot.step(0.1, None), ProjectileFate::OutOfBounds); // x = -2
    }

    #[test]
    fn test_hits_target() {
        let mut shot = projectile(Vec2::new(100.0, 100.0), Vec2::new(100.0, 0.0));
        let target = (Vec2::new(125.0, 100.0), Vec2::splat(32.0));
        assert_eq!(shot.step(0.05, Some(target)), ProjectileFate::HitTarget);
    }

    #[test]
    fn test_deactivated_is_removed_without_moving() {
        let mut shot = projectile(Vec2::new(100.0, 100.0), Vec2::new(100.0, 0.0));
        shot.active = false;
        assert_eq!(shot.step(1.0, None), ProjectileFate::Deactivated);
        assert_eq!(shot.position, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_volley_is_symmetric_around_bearing() {
        let velocities = volley_velocities(0.0, 5, 0.2, 300.0);
        assert_eq!(velocities.len(), 5);
        assert!(velocities[2].y.abs() < 1e-4);
        assert!((velocities[0].y + velocities[4].y).abs() < 1e-4);
        for v in &velocities {
            assert!((v.length() - 300.0).abs() < 1e-3);
        }
    }
}
