//! Movement abilities that override normal movement: charges and teleports.

use bevy::prelude::*;

use crate::boss::visuals::VisualHandle;

/// A charge ends once the boss is this close to its target point.
pub const CHARGE_ARRIVAL_EPSILON: f32 = 12.0;

/// A charge that has not arrived by now is cancelled (target behind a wall, etc).
pub const CHARGE_MAX_DURATION_MS: f64 = 2500.0;

/// Tuning for a charge.
#[derive(Debug, Clone, Copy)]
pub struct ChargeSpec {
    /// Pixels per second
    pub speed: f32,
    pub damage: f32,
    /// Stun applied when the charge connects
    pub stun_ms: f64,
    /// How far past the player the charge aims
    pub overshoot: f32,
}

#[derive(Debug, Clone, Default)]
pub struct ChargeState {
    /// Ability driving the charge
    pub source: &'static str,
    pub target: Option<Vec2>,
    pub active: bool,
    /// Pixels per second while charging
    pub speed: f32,
    pub damage: f32,
    pub stun_ms: f64,
    pub started_at_ms: f64,
    /// Latched after the charge connects
    pub has_hit: bool,
    pub trail: Option<VisualHandle>,
}

impl ChargeState {
    pub fn begin(
        &mut self,
        source: &'static str,
        target: Vec2,
        spec: &ChargeSpec,
        now_ms: f64,
        trail: VisualHandle,
    ) {
        self.source = source;
        self.target = Some(target);
        self.active = true;
        self.speed = spec.speed;
        self.damage = spec.damage;
        self.stun_ms = spec.stun_ms;
        self.started_at_ms = now_ms;
        self.has_hit = false;
        self.trail = Some(trail);
    }

    pub fn has_arrived(&self, position: Vec2) -> bool {
        match self.target {
            Some(target) => position.distance(target) <= CHARGE_ARRIVAL_EPSILON,
            None => true,
        }
    }

    pub fn timed_out(&self, now_ms: f64) -> bool {
        now_ms - self.started_at_ms >= CHARGE_MAX_DURATION_MS
    }

    /// Stop the charge. Returns the trail visual to despawn, if any.
    pub fn clear(&mut self) -> Option<VisualHandle> {
        self.target = None;
        self.active = false;
        self.has_hit = false;
        self.trail.take()
    }
}

/// Teleport: vanish, relocate halfway through, reappear at the end.
#[derive(Debug, Clone, Default)]
pub struct TeleportState {
    pub destination: Option<Vec2>,
    pub started_at_ms: f64,
    pub duration_ms: f64,
    /// Set once the boss has been moved to the destination
    pub relocated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeleportStep {
    Idle,
    Vanished,
    Relocate,
    Reappeared,
    Finished,
}

impl TeleportState {
    pub fn is_active(&self) -> bool {
        self.destination.is_some()
    }

    pub fn begin(&mut self, destination: Vec2, duration_ms: f64, now_ms: f64) {
        self.destination = Some(destination);
        self.started_at_ms = now_ms;
        self.duration_ms = duration_ms;
        self.relocated = false;
    }

    /// Advance the teleport and report what the caller should do this tick.
    pub fn step(&mut self, now_ms: f64) -> TeleportStep {
        if !self.is_active() {
            return TeleportStep::Idle;
        }
        let elapsed = now_ms - self.started_at_ms;
        if elapsed >= self.duration_ms {
            // Very long frames can skip the midpoint; relocate on the way out
            if !self.relocated {
                self.relocated = true;
                return TeleportStep::Relocate;
            }
            return TeleportStep::Finished;
        }
        if !self.relocated && elapsed >= self.duration_ms * 0.5 {
            self.relocated = true;
            return TeleportStep::Relocate;
        }
        if self.relocated {
            TeleportStep::Reappeared
        } else {
            TeleportStep::Vanished
        }
    }

    pub fn clear(&mut self) {
        self.destination = None;
        self.relocated = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_charge_arrival_epsilon() {
        let mut charge = ChargeState::default();
        let spec = ChargeSpec {
            speed: 500.0,
            damage: 10.0,
            stun_ms: 300.0,
            overshoot: 0.0,
        };
        charge.begin("Test Charge", Vec2::new(100.0, 0.0), &spec, 0.0, VisualHandle(3));
        assert!(!charge.has_arrived(Vec2::new(80.0, 0.0)));
        assert!(charge.has_arrived(Vec2::new(90.0, 0.0)));
        assert_eq!(charge.clear(), Some(VisualHandle(3)));
        assert!(!charge.active);
        assert_eq!(charge.clear(), None);
    }

    #[test]
    fn test_teleport_sequence() {
        let mut teleport = TeleportState::default();
        assert_eq!(teleport.step(0.0), TeleportStep::Idle);

        teleport.begin(Vec2::splat(50.0), 600.0, 1000.0);
        assert_eq!(teleport.step(1100.0), TeleportStep::Vanished);
        assert_eq!(teleport.step(1300.0), TeleportStep::Relocate);
        assert_eq!(teleport.step(1400.0), TeleportStep::Reappeared);
        assert_eq!(teleport.step(1600.0), TeleportStep::Finished);
    }

    #[test]
    fn test_teleport_long_frame_still_relocates() {
        let mut teleport = TeleportState::default();
        teleport.begin(Vec2::splat(50.0), 600.0, 0.0);
        assert_eq!(teleport.step(5000.0), TeleportStep::Relocate);
        assert_eq!(teleport.step(5001.0), TeleportStep::Finished);
    }
}
