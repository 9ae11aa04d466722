//! Ability launchers
//!
//! Each launcher starts one ability on the boss core: it pushes into the
//! right tracker, queues any deferred follow-up and raises the event that
//! tells UI and audio what happened. Cooldowns and distance checks are the
//! caller's business.

use bevy::prelude::*;

use crate::boss::boss_core::{BossCore, BossTask, Channel, NovaSpec, SummonSpec};
use crate::boss::effects::{
    volley_velocities, BeamSpec, ChargeSpec, Pillar, PillarSpec, Projectile, VolleySpec, Zone,
    ZoneSpec,
};
use crate::boss::visuals::{VisualHandle, VisualKind};
use crate::combat::events::{AttackDetail, BossEvent};
use crate::world::clamp_center;

/// One hit of a multi-hit combo.
#[derive(Debug, Clone, Copy)]
pub struct ComboStep {
    /// Delay after the combo starts
    pub delay_ms: f64,
    /// Multiplier on the boss's base damage
    pub multiplier: f32,
}

impl BossCore {
    fn record_ability(&mut self, ability: &str) {
        self.stats.abilities_used += 1;
        debug!("{} uses {} (phase {})", self.name, ability, self.phase.phase());
    }

    /// Fire `spec.count` projectiles fanned around the bearing to `target`.
    pub fn fire_volley(&mut self, ability: &'static str, target: Vec2, spec: &VolleySpec) {
        self.record_ability(ability);
        let origin = self.center();
        let bearing = target - origin;
        let angle = bearing.y.atan2(bearing.x);
        for velocity in volley_velocities(angle, spec.count, spec.spread, spec.speed) {
            let handle = self.spawn_visual(VisualKind::Projectile, origin, Vec2::splat(spec.radius * 2.0));
            self.projectiles.push(Projectile {
                handle,
                source: ability,
                position: origin,
                velocity,
                damage: spec.damage,
                radius: spec.radius,
                active: true,
            });
        }
        self.emit_attack(ability, Some(AttackDetail::Projectiles(spec.count)));
    }

    pub fn spawn_zone(&mut self, ability: &'static str, center: Vec2, spec: ZoneSpec) {
        self.record_ability(ability);
        let handle = self.spawn_visual(VisualKind::ConsecrationZone, center, Vec2::splat(spec.radius * 2.0));
        let now = self.now_ms();
        self.zones.push(Zone::new(handle, ability, center, spec, now));
        self.emit_attack(ability, None);
    }

    /// Telegraph one pillar per center.
    pub fn spawn_pillars(&mut self, ability: &'static str, centers: &[Vec2], spec: &PillarSpec) {
        self.record_ability(ability);
        let now = self.now_ms();
        for &center in centers {
            let center = clamp_center(center, spec.size);
            let warning = self.spawn_visual(VisualKind::PillarWarning, center, spec.size);
            self.pillars.push(Pillar::new(ability, center, spec, now, warning));
        }
        self.emit_attack(ability, Some(AttackDetail::Pillars(centers.len() as u8)));
    }

    /// Charge through `target`, aiming `spec.overshoot` pixels past it.
    pub fn begin_charge(&mut self, ability: &'static str, target: Vec2, spec: &ChargeSpec) {
        self.record_ability(ability);
        let origin = self.center();
        let direction = (target - origin).normalize_or_zero();
        let destination = clamp_center(target + direction * spec.overshoot, self.base.size());
        let trail = self.spawn_visual(VisualKind::ChargeTrail, origin, self.base.size());
        let now = self.now_ms();
        self.charge.begin(ability, destination, spec, now, trail);
        self.emit_special_move(ability);
    }

    pub fn begin_teleport(&mut self, ability: &'static str, destination: Vec2, duration_ms: f64) {
        self.record_ability(ability);
        let destination = clamp_center(destination, self.base.size());
        let now = self.now_ms();
        self.teleport.begin(destination, duration_ms, now);
        self.emit_special_move(ability);
    }

    pub fn raise_shield(&mut self, ability: &'static str, duration_ms: f64) {
        self.record_ability(ability);
        let center = self.center();
        let bubble = self.spawn_visual(VisualKind::ShieldBubble, center, self.base.size() * 1.4);
        let now = self.now_ms();
        self.shield.raise(now, duration_ms, bubble);
        info!("{} raises {} for {:.1}s", self.name, ability, duration_ms / 1000.0);
        self.emit_attack(ability, None);
    }

    /// Queue every hit of a combo. Each hit re-checks `reach` when it lands.
    pub fn queue_combo(&mut self, ability: &'static str, steps: &[ComboStep], reach: f32) {
        self.record_ability(ability);
        let base_damage = self.base.damage;
        for (index, step) in steps.iter().enumerate() {
            self.schedule(
                step.delay_ms,
                BossTask::ComboHit {
                    ability,
                    hit: index as u8 + 1,
                    damage: base_damage * step.multiplier,
                    reach,
                },
            );
        }
        self.emit_attack(ability, None);
    }

    /// Lock a beam direction toward `target` and start the wind-up.
    pub fn begin_beam(&mut self, ability: &'static str, target: Vec2, spec: BeamSpec) {
        self.record_ability(ability);
        let origin = self.center();
        let direction = (target - origin).normalize_or_zero();
        let telegraph = self.spawn_visual(
            VisualKind::BeamTelegraph,
            origin + direction * spec.length * 0.5,
            Vec2::new(spec.length, spec.half_width * 2.0),
        );
        let now = self.now_ms();
        self.beam.begin(direction, now, telegraph);
        self.start_channel(ability, spec.charge_ms, None);
        self.schedule(spec.charge_ms, BossTask::FireBeam { ability, spec });
    }

    pub fn begin_nova(&mut self, ability: &'static str, spec: NovaSpec) {
        self.record_ability(ability);
        let center = self.center();
        let telegraph = self.spawn_visual(VisualKind::NovaTelegraph, center, Vec2::splat(spec.radius * 2.0));
        self.start_channel(ability, spec.charge_ms, Some(telegraph));
        self.schedule(spec.charge_ms, BossTask::Nova { ability, spec });
    }

    pub fn begin_summon(&mut self, ability: &'static str, spec: SummonSpec) {
        self.record_ability(ability);
        let center = self.center();
        let circle = self.spawn_visual(VisualKind::SummonCircle, center, Vec2::splat(spec.spread * 2.0));
        self.start_channel(ability, spec.charge_ms, Some(circle));
        self.schedule(spec.charge_ms, BossTask::Summon { ability, spec });
    }

    fn start_channel(&mut self, ability: &'static str, charge_ms: f64, telegraph: Option<VisualHandle>) {
        self.channel = Some(Channel {
            ability,
            ends_at_ms: self.now_ms() + charge_ms,
            telegraph,
        });
        let boss = self.boss_ref();
        self.emit(BossEvent::AttackStart {
            boss,
            ability: ability.to_string(),
        });
    }

    fn emit_special_move(&mut self, name: &str) {
        let boss = self.boss_ref();
        self.emit(BossEvent::SpecialMove {
            boss,
            name: name.to_string(),
        });
    }
}
