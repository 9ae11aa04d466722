//! Boss spawn timing.

use bevy::prelude::*;

use crate::boss::config::BossKind;

/// Default delay before the first boss and between a defeat and the next boss.
pub const DEFAULT_SPAWN_INTERVAL_MS: f64 = 90_000.0;

/// Decides when the next boss enters the arena, cycling through a rotation.
///
/// Only one boss is alive at a time: the timer for the next one starts when
/// the current one is defeated.
#[derive(Debug, Clone)]
pub struct BossSpawnController {
    rotation: Vec<BossKind>,
    next_index: usize,
    interval_ms: f64,
    /// `None` while a boss is alive
    next_spawn_at_ms: Option<f64>,
    spawned: u32,
}

impl Default for BossSpawnController {
    fn default() -> Self {
        Self::new(
            BossKind::ALL.to_vec(),
            DEFAULT_SPAWN_INTERVAL_MS,
            DEFAULT_SPAWN_INTERVAL_MS,
        )
    }
}

impl BossSpawnController {
    pub fn new(rotation: Vec<BossKind>, first_spawn_ms: f64, interval_ms: f64) -> Self {
        Self {
            rotation,
            next_index: 0,
            interval_ms,
            next_spawn_at_ms: Some(first_spawn_ms),
            spawned: 0,
        }
    }

    /// Which boss to spawn now, if any. Never spawns while `boss_alive`.
    pub fn poll(&mut self, now_ms: f64, boss_alive: bool) -> Option<BossKind> {
        if boss_alive || self.rotation.is_empty() {
            return None;
        }
        let due_at = self.next_spawn_at_ms?;
        if now_ms < due_at {
            return None;
        }
        let kind = self.rotation[self.next_index % self.rotation.len()];
        self.next_index += 1;
        self.spawned += 1;
        self.next_spawn_at_ms = None;
        info!("Boss #{} incoming: {}", self.spawned, kind.name());
        Some(kind)
    }

    /// Start the countdown to the next boss.
    pub fn notify_defeated(&mut self, now_ms: f64) {
        self.next_spawn_at_ms = Some(now_ms + self.interval_ms);
    }

    pub fn next_spawn_at_ms(&self) -> Option<f64> {
        self.next_spawn_at_ms
    }

    pub fn spawned(&self) -> u32 {
        self.spawned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_spawn_waits_for_delay() {
        let mut spawner = BossSpawnController::new(vec![BossKind::ChurchPaladin], 5000.0, 10000.0);
        assert_eq!(spawner.poll(4999.0, false), None);
        assert_eq!(spawner.poll(5000.0, false), Some(BossKind::ChurchPaladin));
        assert_eq!(spawner.spawned(), 1);
    }

    #[test]
    fn test_no_spawn_until_defeat_then_interval() {
        let mut spawner = BossSpawnController::new(vec![BossKind::ChurchPaladin], 0.0, 10000.0);
        assert!(spawner.poll(0.0, false).is_some());
        // Timer is parked until the boss dies
        assert_eq!(spawner.poll(50_000.0, false), None);

        spawner.notify_defeated(60_000.0);
        assert_eq!(spawner.poll(65_000.0, false), None);
        assert_eq!(spawner.poll(70_000.0, true), None);
        assert_eq!(spawner.poll(70_000.0, false), Some(BossKind::ChurchPaladin));
    }

    #[test]
    fn test_empty_rotation_never_spawns() {
        let mut spawner = BossSpawnController::new(Vec::new(), 0.0, 0.0);
        assert_eq!(spawner.poll(1.0, false), None);
    }
}
