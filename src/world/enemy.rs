//! Generic enemy entity and the shared enemy roster.
//!
//! Positions follow the browser convention: `x`/`y` is the top-left corner
//! of the body, `center()` is derived from it.

use bevy::prelude::*;

use super::clamp_center;

pub type EnemyId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyKind {
    Regular,
    Minion,
    Boss,
}

/// Base stats an enemy is spawned with.
#[derive(Debug, Clone, Copy)]
pub struct EnemyStats {
    pub health: f32,
    pub damage: f32,
    pub speed: f32,
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: EnemyId,
    pub kind: EnemyKind,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Movement speed in pixels per second
    pub speed: f32,
    pub health: f32,
    pub max_health: f32,
    /// Contact / base attack damage
    pub damage: f32,
    /// False once cleaned up; the renderer and collision layer skip inactive enemies
    pub active: bool,
    /// Last position handed to the renderer by `commit_position`
    pub committed: Vec2,
}

impl Enemy {
    pub fn new(id: EnemyId, kind: EnemyKind, center: Vec2, size: Vec2, stats: EnemyStats) -> Self {
        let mut enemy = Self {
            id,
            kind,
            x: 0.0,
            y: 0.0,
            width: size.x,
            height: size.y,
            speed: stats.speed,
            health: stats.health,
            max_health: stats.health,
            damage: stats.damage,
            active: true,
            committed: Vec2::ZERO,
        };
        enemy.set_center(center);
        enemy.committed = Vec2::new(enemy.x, enemy.y);
        enemy
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.x = center.x - self.width * 0.5;
        self.y = center.y - self.height * 0.5;
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_health > 0.0 {
            self.health / self.max_health
        } else {
            0.0
        }
    }

    /// Step towards `target` at `speed` px/s, never overshooting it.
    pub fn move_towards(&mut self, target: Vec2, speed: f32, dt: f32) {
        let center = self.center();
        let to_target = target - center;
        let distance = to_target.length();
        let step = speed * dt;
        if distance <= step {
            self.set_center(target);
        } else if distance > 0.0 {
            self.set_center(center + to_target / distance * step);
        }
    }

    /// Step along `direction` (normalized internally) at `speed` px/s.
    pub fn move_along(&mut self, direction: Vec2, speed: f32, dt: f32) {
        let direction = direction.normalize_or_zero();
        self.set_center(self.center() + direction * speed * dt);
    }

    /// Clamp into the playfield and publish the position to the renderer.
    pub fn commit_position(&mut self) {
        let clamped = clamp_center(self.center(), self.size());
        self.set_center(clamped);
        self.committed = Vec2::new(self.x, self.y);
    }

    /// Subtract damage (health floors at 0). Returns true when health reached 0.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        self.health = (self.health - amount).max(0.0);
        self.health <= 0.0
    }

    /// Unregister from rendering and collision. Safe to call repeatedly.
    pub fn cleanup(&mut self) {
        self.active = false;
    }
}

/// The shared enemy collection. The roster owns every enemy, including
/// minions a boss summoned; the boss only keeps their ids.
#[derive(Debug, Default)]
pub struct EnemyRoster {
    enemies: Vec<Enemy>,
    next_id: EnemyId,
}

impl EnemyRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve an id without spawning, used for entities kept outside the roster (bosses).
    pub fn allocate_id(&mut self) -> EnemyId {
        self.next_id += 1;
        self.next_id
    }

    pub fn spawn(&mut self, kind: EnemyKind, center: Vec2, size: Vec2, stats: EnemyStats) -> EnemyId {
        let id = self.allocate_id();
        self.enemies.push(Enemy::new(id, kind, center, size, stats));
        id
    }

    pub fn get(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Enemy> {
        self.enemies.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    pub fn alive_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.active && e.is_alive()).count()
    }

    /// Drop dead or cleaned-up enemies. Returns how many were removed.
    pub fn remove_finished(&mut self) -> usize {
        let before = self.enemies.len();
        self.enemies.retain(|e| e.active && e.is_alive());
        before - self.enemies.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> EnemyStats {
        EnemyStats {
            health: 50.0,
            damage: 5.0,
            speed: 100.0,
        }
    }

    #[test]
    fn test_take_damage_floors_at_zero() {
        let mut enemy = Enemy::new(1, EnemyKind::Regular, Vec2::splat(100.0), Vec2::splat(20.0), stats());
        assert!(!enemy.take_damage(20.0));
        assert_eq!(enemy.health, 30.0);
        assert!(enemy.take_damage(500.0));
        assert_eq!(enemy.health, 0.0);
    }

    #[test]
    fn test_move_towards_does_not_overshoot() {
        let mut enemy = Enemy::new(1, EnemyKind::Regular, Vec2::new(100.0, 100.0), Vec2::splat(20.0), stats());
        enemy.move_towards(Vec2::new(105.0, 100.0), 100.0, 1.0);
        assert_eq!(enemy.center(), Vec2::new(105.0, 100.0));
    }

    #[test]
    fn test_roster_ids_are_unique() {
        let mut roster = EnemyRoster::new();
        let a = roster.spawn(EnemyKind::Regular, Vec2::ZERO, Vec2::ONE, stats());
        let reserved = roster.allocate_id();
        let b = roster.spawn(EnemyKind::Minion, Vec2::ZERO, Vec2::ONE, stats());
        assert_ne!(a, b);
        assert_ne!(reserved, b);
        assert_eq!(roster.len(), 2);
        assert!(roster.get(reserved).is_none());
    }

    #[test]
    fn test_remove_finished() {
        let mut roster = EnemyRoster::new();
        let a = roster.spawn(EnemyKind::Regular, Vec2::ZERO, Vec2::ONE, stats());
        roster.spawn(EnemyKind::Regular, Vec2::ZERO, Vec2::ONE, stats());
        if let Some(enemy) = roster.get_mut(a) {
            enemy.take_damage(1000.0);
        }
        assert_eq!(roster.remove_finished(), 1);
        assert_eq!(roster.len(), 1);
    }
}
