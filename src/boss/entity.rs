//! The boss entity and its public contract with the game loop.

use bevy::prelude::*;

use crate::boss::behavior::BossBehavior;
use crate::boss::boss_core::BossCore;
use crate::boss::config::{BossDefinition, BossKind};
use crate::boss::visuals::{EffectSink, FlashKind};
use crate::combat::events::BossEvent;
use crate::world::{BossTarget, EnemyId, EnemyRoster, GameRng};

/// A boss: shared core state plus the behavior for its kind.
pub struct Boss {
    pub core: BossCore,
    pub behavior: BossBehavior,
}

impl Boss {
    /// Build a boss scaled for `player_level`. Call [`Boss::initialize`] before the first update.
    pub fn new(
        id: EnemyId,
        kind: BossKind,
        definition: &BossDefinition,
        player_level: u32,
        sink: Box<dyn EffectSink>,
        rng: GameRng,
    ) -> Self {
        Self {
            core: BossCore::new(id, kind, definition, player_level, sink, rng),
            behavior: BossBehavior::for_kind(kind),
        }
    }

    /// Enter the arena at the default spawn point (top center).
    pub fn initialize(&mut self) {
        let spawn = self.core.center();
        self.initialize_at(spawn);
    }

    pub fn initialize_at(&mut self, center: Vec2) {
        self.core.base.set_center(center);
        self.core.commit_position();
        self.core.show_health_bar();
        info!(
            "{} appears (level {}, {:.0} HP)",
            self.core.name, self.core.level, self.core.base.max_health
        );
        let boss = self.core.boss_ref();
        self.core.emit(BossEvent::Spawn { boss });
    }

    /// Advance one tick. Without a player the boss only maintains its
    /// effects: deferred tasks, trackers and minion bookkeeping.
    pub fn update(
        &mut self,
        dt: f32,
        mut player: Option<&mut (dyn BossTarget + '_)>,
        mut enemies: Option<&mut EnemyRoster>,
    ) {
        if !self.core.is_active {
            return;
        }
        self.core.advance_clock(dt);
        self.core
            .run_due_tasks(player.as_deref_mut(), enemies.as_deref_mut());
        self.core.tick_shield();

        if let Some(phase) = self.core.check_phase() {
            self.behavior.on_phase_change(&mut self.core, phase);
        }
        self.core.refresh_health_bar();

        match player {
            Some(player) => {
                self.behavior.on_update(&mut self.core, dt, &mut *player);
                self.core.update_trackers(dt, Some(player));
            }
            None => self.core.update_trackers(dt, None),
        }

        self.core.prune_minions(enemies.as_deref());
        self.core.commit_position();
    }

    /// Apply incoming damage. Returns true when this hit (or an earlier one)
    /// left the boss at zero health.
    ///
    /// `attack_tag` selects a damage modifier; unknown or missing tags deal
    /// full damage. `particles` is called with the hit position when damage
    /// goes through.
    pub fn take_damage(
        &mut self,
        amount: f32,
        particles: Option<&mut dyn FnMut(Vec2)>,
        attack_tag: Option<&str>,
    ) -> bool {
        let core = &mut self.core;
        core.tick_shield();
        let center = core.center();

        if core.shield.active {
            core.shield.absorbed += amount;
            core.stats.hits_deflected += 1;
            core.flash(FlashKind::Deflect, center);
            return false;
        }

        let modifier = attack_tag
            .and_then(|tag| core.damage_modifiers.get(tag))
            .copied()
            .unwrap_or(1.0);
        let applied = amount * modifier;

        core.flash(FlashKind::Hit, center);
        if let Some(particles) = particles {
            particles(center);
        }
        core.stats.damage_taken += applied.min(core.base.health);
        let died = core.base.take_damage(applied);
        core.refresh_health_bar();

        if died && !core.reward_dropped {
            core.reward_dropped = true;
            core.is_active = false;
            info!("{} has been defeated", core.name);
            let boss = core.boss_ref();
            core.emit(BossEvent::Defeated { boss });
            if let Some(reward) = self.behavior.on_defeated(&mut self.core) {
                info!(
                    "{} drops {:?} reward '{}'",
                    self.core.name, reward.reward_type, reward.power_up
                );
                let boss = self.core.boss_ref();
                let boss_tag = self.core.tag.clone();
                self.core.emit(BossEvent::Reward {
                    boss,
                    boss_tag,
                    reward,
                });
            }
        }
        died
    }

    /// Release every effect, minion and visual the boss owns. Safe to call
    /// more than once.
    pub fn cleanup(&mut self, mut enemies: Option<&mut EnemyRoster>) {
        let was_active = self.core.is_active;
        self.core.is_active = false;
        self.core.clear_effects();
        self.core.release_minions(enemies.as_deref_mut());
        self.core.hide_health_bar();
        self.core.base.cleanup();
        if was_active || self.core.reward_dropped {
            debug!("{} cleaned up", self.core.name);
        }
    }

    // Accessors used by the game loop and UI

    pub fn id(&self) -> EnemyId {
        self.core.base.id
    }

    pub fn kind(&self) -> BossKind {
        self.core.kind
    }

    pub fn name(&self) -> &str {
        &self.core.name
    }

    pub fn phase(&self) -> u8 {
        self.core.phase.phase()
    }

    pub fn health(&self) -> f32 {
        self.core.base.health
    }

    pub fn max_health(&self) -> f32 {
        self.core.base.max_health
    }

    pub fn center(&self) -> Vec2 {
        self.core.center()
    }

    pub fn size(&self) -> Vec2 {
        self.core.base.size()
    }

    pub fn is_active(&self) -> bool {
        self.core.is_active
    }

    pub fn is_alive(&self) -> bool {
        self.core.base.is_alive()
    }

    pub fn reward_dropped(&self) -> bool {
        self.core.reward_dropped
    }

    pub fn is_shielded(&self) -> bool {
        self.core.shield.active
    }

    pub fn drain_events(&mut self) -> Vec<BossEvent> {
        self.core.drain_events()
    }
}
