//! The player as seen by a boss.
//!
//! Bosses only talk to the player through [`BossTarget`]. Everything beyond
//! position, size and health is optional: the default methods report "not
//! supported" and the boss falls back to touching health directly.

use bevy::prelude::*;

use super::clamp_center;

/// Timed status effects a boss ability can put on the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusEffect {
    /// Movement speed halved
    Slow,
    /// No movement at all
    Stun,
}

impl StatusEffect {
    pub fn name(&self) -> &'static str {
        match self {
            StatusEffect::Slow => "Slow",
            StatusEffect::Stun => "Stun",
        }
    }
}

pub trait BossTarget {
    /// Center of the player's body in playfield pixels
    fn center(&self) -> Vec2;

    /// Body width and height
    fn size(&self) -> Vec2;

    fn health(&self) -> f32;

    fn set_health(&mut self, health: f32);

    fn is_alive(&self) -> bool {
        self.health() > 0.0
    }

    /// Player-side damage routine. `None` means the player has none and the
    /// caller should subtract health itself; `Some(died)` otherwise.
    fn take_damage(&mut self, _amount: f32) -> Option<bool> {
        None
    }

    /// Returns false when the player does not support status effects.
    fn apply_effect(&mut self, _effect: StatusEffect, _duration_ms: f64) -> bool {
        false
    }

    /// Returns false when the player has no death routine of its own.
    fn die(&mut self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy)]
struct ActiveEffect {
    effect: StatusEffect,
    remaining_ms: f64,
}

/// Concrete player used by the headless runner and the bevy integration.
#[derive(Debug, Clone)]
pub struct Player {
    pub position: Vec2,
    pub width: f32,
    pub height: f32,
    pub health: f32,
    pub max_health: f32,
    /// Movement speed in pixels per second
    pub speed: f32,
    pub is_dead: bool,
    pub damage_taken: f32,
    effects: Vec<ActiveEffect>,
}

impl Player {
    pub fn new(position: Vec2, max_health: f32) -> Self {
        Self {
            position,
            width: 32.0,
            height: 32.0,
            health: max_health,
            max_health,
            speed: 180.0,
            is_dead: false,
            damage_taken: 0.0,
            effects: Vec::new(),
        }
    }

    /// Count down status effect timers.
    pub fn tick(&mut self, dt: f32) {
        let elapsed = f64::from(dt) * 1000.0;
        for active in self.effects.iter_mut() {
            active.remaining_ms -= elapsed;
        }
        self.effects.retain(|active| active.remaining_ms > 0.0);
    }

    pub fn has_effect(&self, effect: StatusEffect) -> bool {
        self.effects.iter().any(|active| active.effect == effect)
    }

    /// Speed multiplier from active effects (stun wins over slow).
    pub fn speed_multiplier(&self) -> f32 {
        if self.has_effect(StatusEffect::Stun) {
            0.0
        } else if self.has_effect(StatusEffect::Slow) {
            0.5
        } else {
            1.0
        }
    }

    /// Move along `direction` for one tick, honoring status effects and arena bounds.
    pub fn move_along(&mut self, direction: Vec2, dt: f32) {
        if self.is_dead {
            return;
        }
        let step = direction.normalize_or_zero() * self.speed * self.speed_multiplier() * dt;
        self.position = clamp_center(self.position + step, Vec2::new(self.width, self.height));
    }
}

impl BossTarget for Player {
    fn center(&self) -> Vec2 {
        self.position
    }

    fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    fn health(&self) -> f32 {
        self.health
    }

    fn set_health(&mut self, health: f32) {
        self.health = health;
    }

    fn is_alive(&self) -> bool {
        !self.is_dead && self.health > 0.0
    }

    fn take_damage(&mut self, amount: f32) -> Option<bool> {
        if self.is_dead {
            return Some(false);
        }
        self.health = (self.health - amount).max(0.0);
        self.damage_taken += amount;
        if self.health <= 0.0 {
            self.die();
            return Some(true);
        }
        Some(false)
    }

    fn apply_effect(&mut self, effect: StatusEffect, duration_ms: f64) -> bool {
        if self.is_dead {
            return false;
        }
        match self.effects.iter_mut().find(|active| active.effect == effect) {
            // Refresh rather than stack
            Some(active) => active.remaining_ms = active.remaining_ms.max(duration_ms),
            None => self.effects.push(ActiveEffect {
                effect,
                remaining_ms: duration_ms,
            }),
        }
        true
    }

    fn die(&mut self) -> bool {
        if !self.is_dead {
            info!("Player has fallen");
        }
        self.is_dead = true;
        self.health = 0.0;
        self.effects.clear();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lethal_damage_kills_once() {
        let mut player = Player::new(Vec2::splat(100.0), 50.0);
        assert_eq!(player.take_damage(30.0), Some(false));
        assert_eq!(player.take_damage(30.0), Some(true));
        assert!(!player.is_alive());
        // Already dead: no further damage is recorded
        assert_eq!(player.take_damage(30.0), Some(false));
        assert_eq!(player.damage_taken, 60.0);
    }

    #[test]
    fn test_stun_blocks_movement_until_expired() {
        let mut player = Player::new(Vec2::splat(100.0), 50.0);
        assert!(player.apply_effect(StatusEffect::Stun, 500.0));
        player.move_along(Vec2::X, 0.1);
        assert_eq!(player.position, Vec2::splat(100.0));

        player.tick(0.6);
        assert!(!player.has_effect(StatusEffect::Stun));
        player.move_along(Vec2::X, 0.1);
        assert!(player.position.x > 100.0);
    }

    #[test]
    fn test_effect_refresh_does_not_stack() {
        let mut player = Player::new(Vec2::splat(100.0), 50.0);
        player.apply_effect(StatusEffect::Slow, 1000.0);
        player.apply_effect(StatusEffect::Slow, 200.0);
        player.tick(0.5);
        assert!(player.has_effect(StatusEffect::Slow));
        assert_eq!(player.speed_multiplier(), 0.5);
    }
}
