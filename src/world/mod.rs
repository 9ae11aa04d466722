//! World collaborators
//!
//! The boss engine only needs a thin slice of the game world: the arena
//! bounds, the shared enemy roster, the player it hunts and a seeded RNG.
//! The full game owns richer versions of each.

pub mod enemy;
pub mod player;
pub mod rng;

use bevy::prelude::*;

pub use enemy::{Enemy, EnemyId, EnemyKind, EnemyRoster, EnemyStats};
pub use player::{BossTarget, Player, StatusEffect};
pub use rng::GameRng;

/// Playfield width in pixels.
pub const GAME_WIDTH: f32 = 1280.0;

/// Playfield height in pixels.
pub const GAME_HEIGHT: f32 = 720.0;

/// Whether a point lies inside `[0, GAME_WIDTH] x [0, GAME_HEIGHT]` (edges included).
pub fn in_bounds(point: Vec2) -> bool {
    (0.0..=GAME_WIDTH).contains(&point.x) && (0.0..=GAME_HEIGHT).contains(&point.y)
}

/// Clamp a center point so a body of `size` stays fully inside the playfield.
pub fn clamp_center(center: Vec2, size: Vec2) -> Vec2 {
    let half = size * 0.5;
    Vec2::new(
        center.x.clamp(half.x, (GAME_WIDTH - half.x).max(half.x)),
        center.y.clamp(half.y, (GAME_HEIGHT - half.y).max(half.y)),
    )
}

/// Circle vs axis-aligned rectangle overlap. The rectangle is given by its center and size.
pub fn circle_overlaps_rect(circle: Vec2, radius: f32, rect_center: Vec2, rect_size: Vec2) -> bool {
    let half = rect_size * 0.5;
    let closest = circle.clamp(rect_center - half, rect_center + half);
    closest.distance_squared(circle) <= radius * radius
}

/// Rectangle vs rectangle overlap, both given by center and size.
pub fn rects_overlap(a_center: Vec2, a_size: Vec2, b_center: Vec2, b_size: Vec2) -> bool {
    let delta = (a_center - b_center).abs();
    let reach = (a_size + b_size) * 0.5;
    delta.x <= reach.x && delta.y <= reach.y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_bounds_includes_edges() {
        assert!(in_bounds(Vec2::ZERO));
        assert!(in_bounds(Vec2::new(GAME_WIDTH, GAME_HEIGHT)));
        assert!(!in_bounds(Vec2::new(-0.1, 10.0)));
        assert!(!in_bounds(Vec2::new(10.0, GAME_HEIGHT + 0.1)));
    }

    #[test]
    fn test_clamp_center_keeps_body_inside() {
        let clamped = clamp_center(Vec2::new(-50.0, 2000.0), Vec2::splat(40.0));
        assert_eq!(clamped, Vec2::new(20.0, GAME_HEIGHT - 20.0));
    }

    #[test]
    fn test_circle_rect_overlap() {
        let rect_center = Vec2::new(100.0, 100.0);
        let rect_size = Vec2::splat(20.0);
        assert!(circle_overlaps_rect(Vec2::new(115.0, 100.0), 5.0, rect_center, rect_size));
        assert!(!circle_overlaps_rect(Vec2::new(116.0, 100.0), 5.0, rect_center, rect_size));
    }

    #[test]
    fn test_rects_overlap() {
        let size = Vec2::splat(10.0);
        assert!(rects_overlap(Vec2::ZERO, size, Vec2::new(10.0, 0.0), size));
        assert!(!rects_overlap(Vec2::ZERO, size, Vec2::new(10.5, 0.0), size));
    }
}
