//! Ground zones (consecration): persistent area damage sampled on an interval.

use bevy::prelude::*;

use crate::boss::visuals::VisualHandle;

/// Tuning for a ground zone.
#[derive(Debug, Clone, Copy)]
pub struct ZoneSpec {
    pub radius: f32,
    pub damage_per_tick: f32,
    pub duration_ms: f64,
    /// Minimum time between two damage samples
    pub tick_interval_ms: f64,
    /// Slow applied with every damage sample (0 for none)
    pub slow_ms: f64,
}

#[derive(Debug, Clone)]
pub struct Zone {
    pub handle: VisualHandle,
    /// Ability that created it
    pub source: &'static str,
    pub center: Vec2,
    pub spec: ZoneSpec,
    pub created_at_ms: f64,
    last_tick_ms: Option<f64>,
}

impl Zone {
    pub fn new(
        handle: VisualHandle,
        source: &'static str,
        center: Vec2,
        spec: ZoneSpec,
        created_at_ms: f64,
    ) -> Self {
        Self {
            handle,
            source,
            center,
            spec,
            created_at_ms,
            last_tick_ms: None,
        }
    }

    pub fn is_expired(&self, now_ms: f64) -> bool {
        now_ms - self.created_at_ms >= self.spec.duration_ms
    }

    /// Linear fade from 1 at creation to 0 at expiry.
    pub fn opacity(&self, now_ms: f64) -> f32 {
        if self.spec.duration_ms <= 0.0 {
            return 0.0;
        }
        (1.0 - (now_ms - self.created_at_ms) / self.spec.duration_ms).clamp(0.0, 1.0) as f32
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.center.distance(point) <= self.spec.radius
    }

    /// Whether a damage sample is due; records the sample when it is.
    pub fn try_tick(&mut self, now_ms: f64) -> bool {
        let due = match self.last_tick_ms {
            None => true,
            Some(last) => now_ms - last >= self.spec.tick_interval_ms,
        };
        if due {
            self.last_tick_ms = Some(now_ms);
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone() -> Zone {
        let spec = ZoneSpec {
            radius: 100.0,
            damage_per_tick: 5.0,
            duration_ms: 6000.0,
            tick_interval_ms: 500.0,
            slow_ms: 0.0,
        };
        Zone::new(VisualHandle(1), "Test Zone", Vec2::splat(200.0), spec, 1000.0)
    }

    #[test]
    fn test_expiry_boundary() {
        let zone = zone();
        assert!(!zone.is_expired(6999.0));
        assert!(zone.is_expired(7000.0));
    }

    #[test]
    fn test_ticks_on_interval_not_every_frame() {
        let mut zone = zone();
        assert!(zone.try_tick(1000.0));
        assert!(!zone.try_tick(1016.0));
        assert!(!zone.try_tick(1499.0));
        assert!(zone.try_tick(1500.0));
    }

    #[test]
    fn test_opacity_fades() {
        let zone = zone();
        assert_eq!(zone.opacity(1000.0), 1.0);
        assert!((zone.opacity(4000.0) - 0.5).abs() < 1e-6);
        assert_eq!(zone.opacity(9000.0), 0.0);
    }

    #[test]
    fn test_contains() {
        let zone = zone();
        assert!(zone.contains(Vec2::new(300.0, 200.0)));
        assert!(!zone.contains(Vec2::new(301.0, 200.0)));
    }
}
