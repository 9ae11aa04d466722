//! Telegraphed strikes (light pillars).
//!
//! A pillar shows a warning marker first, then a strike marker during its
//! active window. Only the active window can hurt, and only once.

use bevy::prelude::*;

use crate::boss::visuals::VisualHandle;
use crate::world::rects_overlap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PillarStage {
    Warning,
    Active,
    Expired,
}

/// Tuning for a telegraphed strike.
#[derive(Debug, Clone, Copy)]
pub struct PillarSpec {
    pub size: Vec2,
    pub damage: f32,
    pub warning_ms: f64,
    pub active_ms: f64,
}

#[derive(Debug, Clone)]
pub struct Pillar {
    /// Ability that raised it
    pub source: &'static str,
    pub center: Vec2,
    pub size: Vec2,
    pub damage: f32,
    pub created_at_ms: f64,
    pub warning_ms: f64,
    pub active_ms: f64,
    /// Latched after the first hit
    pub has_hit: bool,
    pub warning_marker: Option<VisualHandle>,
    pub strike_marker: Option<VisualHandle>,
}

impl Pillar {
    /// New pillar in its warning stage, showing `warning_marker`.
    pub fn new(
        source: &'static str,
        center: Vec2,
        spec: &PillarSpec,
        created_at_ms: f64,
        warning_marker: VisualHandle,
    ) -> Self {
        Self {
            source,
            center,
            size: spec.size,
            damage: spec.damage,
            created_at_ms,
            warning_ms: spec.warning_ms,
            active_ms: spec.active_ms,
            has_hit: false,
            warning_marker: Some(warning_marker),
            strike_marker: None,
        }
    }

    pub fn stage(&self, now_ms: f64) -> PillarStage {
        let age = now_ms - self.created_at_ms;
        if age < self.warning_ms {
            PillarStage::Warning
        } else if age < self.warning_ms + self.active_ms {
            PillarStage::Active
        } else {
            PillarStage::Expired
        }
    }

    pub fn overlaps(&self, target_center: Vec2, target_size: Vec2) -> bool {
        rects_overlap(self.center, self.size, target_center, target_size)
    }

    /// Hit-test during the active window. Returns true at most once per pillar.
    pub fn try_strike(&mut self, now_ms: f64, target_center: Vec2, target_size: Vec2) -> bool {
        if self.has_hit || self.stage(now_ms) != PillarStage::Active {
            return false;
        }
        if self.overlaps(target_center, target_size) {
            self.has_hit = true;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pillar() -> Pillar {
        let spec = PillarSpec {
            size: Vec2::splat(80.0),
            damage: 20.0,
            warning_ms: 900.0,
            active_ms: 400.0,
        };
        Pillar::new("Test Pillar", Vec2::splat(300.0), &spec, 0.0, VisualHandle(1))
    }

    #[test]
    fn test_stage_sequence() {
        let pillar = pillar();
        assert_eq!(pillar.stage(0.0), PillarStage::Warning);
        assert_eq!(pillar.stage(899.0), PillarStage::Warning);
        assert_eq!(pillar.stage(900.0), PillarStage::Active);
        assert_eq!(pillar.stage(1299.0), PillarStage::Active);
        assert_eq!(pillar.stage(1300.0), PillarStage::Expired);
    }

    #[test]
    fn test_no_hit_during_warning() {
        let mut pillar = pillar();
        assert!(!pillar.try_strike(500.0, Vec2::splat(300.0), Vec2::splat(32.0)));
        assert!(!pillar.has_hit);
    }

    #[test]
    fn test_hits_once_per_instance() {
        let mut pillar = pillar();
        let inside = Vec2::splat(300.0);
        let size = Vec2::splat(32.0);
        assert!(pillar.try_strike(950.0, inside, size));
        assert!(!pillar.try_strike(1000.0, inside, size));
        assert!(!pillar.try_strike(1200.0, inside, size));
    }
}
