//! Beam attacks: a wind-up followed by a single directional hit-test.

use bevy::prelude::*;

use crate::boss::visuals::VisualHandle;

/// Tuning for a beam.
#[derive(Debug, Clone, Copy)]
pub struct BeamSpec {
    /// Wind-up before the beam fires
    pub charge_ms: f64,
    pub length: f32,
    pub half_width: f32,
    pub damage: f32,
}

/// Beam state machine: idle → charging → fired (resolved by a deferred task) → idle.
#[derive(Debug, Clone, Default)]
pub struct BeamState {
    pub charging: bool,
    /// Unit direction locked in when the wind-up started
    pub direction: Vec2,
    pub started_at_ms: f64,
    pub telegraph: Option<VisualHandle>,
}

impl BeamState {
    pub fn begin(&mut self, direction: Vec2, now_ms: f64, telegraph: VisualHandle) {
        self.charging = true;
        self.direction = direction.normalize_or_zero();
        self.started_at_ms = now_ms;
        self.telegraph = Some(telegraph);
    }

    /// Back to idle. Returns the telegraph visual to despawn, if any.
    pub fn finish(&mut self) -> Option<VisualHandle> {
        self.charging = false;
        self.telegraph.take()
    }
}

/// Ray hit-test for a beam fired from `origin` along `direction`.
///
/// The target is hit when its center projects forward onto the ray within
/// `length`, and its perpendicular distance from the ray is at most
/// `half_width` plus half of the target's body width. Targets behind the
/// origin are never hit.
pub fn beam_hits(
    origin: Vec2,
    direction: Vec2,
    length: f32,
    half_width: f32,
    target_center: Vec2,
    target_width: f32,
) -> bool {
    let direction = direction.normalize_or_zero();
    if direction == Vec2::ZERO {
        return false;
    }
    let to_target = target_center - origin;
    let forward = to_target.dot(direction);
    if forward < 0.0 || forward > length {
        return false;
    }
    let perpendicular = direction.perp_dot(to_target).abs();
    perpendicular <= half_width + target_width * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_along_bearing() {
        assert!(beam_hits(Vec2::ZERO, Vec2::X, 800.0, 25.0, Vec2::new(300.0, 10.0), 32.0));
    }

    #[test]
    fn test_body_width_extends_tolerance() {
        // 40 px off the ray: outside the 25 px half-width, inside once the 32 px body is counted
        assert!(beam_hits(Vec2::ZERO, Vec2::X, 800.0, 25.0, Vec2::new(300.0, 40.0), 32.0));
        assert!(!beam_hits(Vec2::ZERO, Vec2::X, 800.0, 25.0, Vec2::new(300.0, 42.0), 32.0));
    }

    #[test]
    fn test_no_hit_behind_origin() {
        assert!(!beam_hits(Vec2::ZERO, Vec2::X, 800.0, 25.0, Vec2::new(-30.0, 0.0), 32.0));
    }

    #[test]
    fn test_no_hit_past_length() {
        assert!(!beam_hits(Vec2::ZERO, Vec2::X, 800.0, 25.0, Vec2::new(801.0, 0.0), 32.0));
    }

    #[test]
    fn test_zero_direction_never_hits() {
        assert!(!beam_hits(Vec2::ZERO, Vec2::ZERO, 800.0, 25.0, Vec2::ZERO, 32.0));
    }

    #[test]
    fn test_state_round_trip() {
        let mut beam = BeamState::default();
        beam.begin(Vec2::new(3.0, 4.0), 100.0, VisualHandle(2));
        assert!(beam.charging);
        assert!((beam.direction.length() - 1.0).abs() < 1e-6);
        assert_eq!(beam.finish(), Some(VisualHandle(2)));
        assert!(!beam.charging);
    }
}
