//! Boss core
//!
//! State every boss kind shares: vitals, phase, the transient effect
//! trackers, the deferred task queue, the event outbox and the effect sink.
//! Kind-specific decisions live in [`crate::boss::behavior`]; the core only
//! provides the moves they are built from.

use bevy::prelude::*;
use smallvec::SmallVec;
use std::collections::HashMap;

use crate::boss::config::{BossDefinition, BossKind, MinionDefinition, RewardDefinition};
use crate::boss::effects::{
    beam_hits, BeamSpec, BeamState, ChargeState, Pillar, PillarStage, Projectile, ProjectileFate,
    ShieldState, TeleportState, TeleportStep, Zone,
};
use crate::boss::phase::PhaseTracker;
use crate::boss::scheduler::DeferredQueue;
use crate::boss::visuals::{EffectSink, FlashKind, VisualCommand, VisualHandle, VisualKind};
use crate::combat::events::{AttackDetail, BossEvent, BossRef};
use crate::world::{
    clamp_center, rects_overlap, BossTarget, Enemy, EnemyId, EnemyKind, EnemyRoster, EnemyStats,
    GameRng, StatusEffect, GAME_WIDTH,
};

/// How long one-shot visuals (swings, beams, novas) stay on screen.
pub const FLASH_VISUAL_MS: f64 = 250.0;

/// Wind-up for a nova.
#[derive(Debug, Clone, Copy)]
pub struct NovaSpec {
    pub charge_ms: f64,
    pub radius: f32,
    pub damage: f32,
}

/// Wind-up for a summon.
#[derive(Debug, Clone, Copy)]
pub struct SummonSpec {
    pub charge_ms: f64,
    /// Minions per cast
    pub count: u8,
    /// Live minions the boss will keep at most
    pub max_alive: usize,
    /// Maximum distance from the boss a minion appears at
    pub spread: f32,
}

/// Work deferred to a later tick. Every task re-checks the world when it fires.
#[derive(Debug, Clone)]
pub enum BossTask {
    ComboHit {
        ability: &'static str,
        /// 1-based
        hit: u8,
        damage: f32,
        reach: f32,
    },
    FireBeam {
        ability: &'static str,
        spec: BeamSpec,
    },
    Nova {
        ability: &'static str,
        spec: NovaSpec,
    },
    Summon {
        ability: &'static str,
        spec: SummonSpec,
    },
    DespawnVisual(VisualHandle),
}

/// A wind-up in progress. Abilities are not selected while one runs.
#[derive(Debug, Clone)]
pub struct Channel {
    pub ability: &'static str,
    pub ends_at_ms: f64,
    pub telegraph: Option<VisualHandle>,
}

/// Running totals for the encounter summary.
#[derive(Debug, Clone, Default)]
pub struct BossStats {
    pub damage_dealt: f32,
    pub damage_taken: f32,
    pub hits_deflected: u32,
    pub abilities_used: u32,
}

pub struct BossCore {
    pub base: Enemy,
    pub kind: BossKind,
    pub name: String,
    /// Tag sent with the reward event
    pub tag: String,
    pub level: u32,
    pub phase: PhaseTracker,
    pub is_active: bool,
    pub reward_dropped: bool,
    pub damage_modifiers: HashMap<String, f32>,
    pub reward: RewardDefinition,
    pub minion: MinionDefinition,
    /// Level multiplier applied to minion stats
    pub minion_scale: f32,
    pub shield: ShieldState,
    pub projectiles: Vec<Projectile>,
    pub zones: Vec<Zone>,
    pub pillars: Vec<Pillar>,
    pub charge: ChargeState,
    pub teleport: TeleportState,
    pub beam: BeamState,
    pub channel: Option<Channel>,
    /// Non-owning ids into the shared roster
    pub minions: SmallVec<[EnemyId; 8]>,
    /// Multiplies normal movement speed (enrage)
    pub speed_multiplier: f32,
    pub stats: BossStats,
    pub rng: GameRng,
    tasks: DeferredQueue<BossTask>,
    events: Vec<BossEvent>,
    sink: Box<dyn EffectSink>,
    now_ms: f64,
    next_handle: u64,
    health_bar: Option<VisualHandle>,
    last_health_bar: Option<(f32, u8)>,
}

impl BossCore {
    pub fn new(
        id: EnemyId,
        kind: BossKind,
        definition: &BossDefinition,
        level: u32,
        sink: Box<dyn EffectSink>,
        rng: GameRng,
    ) -> Self {
        let scaling = definition.scaling;
        let size = definition.size * scaling.size_multiplier(level);
        let stats = EnemyStats {
            health: definition.base_health * scaling.health_multiplier(level),
            damage: definition.base_damage * scaling.damage_multiplier(level),
            speed: definition.speed,
        };
        let spawn = Vec2::new(GAME_WIDTH * 0.5, size);
        Self {
            base: Enemy::new(id, EnemyKind::Boss, spawn, Vec2::splat(size), stats),
            kind,
            name: definition.name.clone(),
            tag: definition.tag.clone(),
            level,
            phase: PhaseTracker::new(definition.max_phases, &definition.phase_thresholds),
            is_active: true,
            reward_dropped: false,
            damage_modifiers: definition.damage_modifiers.clone(),
            reward: definition.reward.clone(),
            minion: definition.minion.clone(),
            minion_scale: scaling.damage_multiplier(level),
            shield: ShieldState::default(),
            projectiles: Vec::new(),
            zones: Vec::new(),
            pillars: Vec::new(),
            charge: ChargeState::default(),
            teleport: TeleportState::default(),
            beam: BeamState::default(),
            channel: None,
            minions: SmallVec::new(),
            speed_multiplier: 1.0,
            stats: BossStats::default(),
            rng,
            tasks: DeferredQueue::new(),
            events: Vec::new(),
            sink,
            now_ms: 0.0,
            next_handle: 1,
            health_bar: None,
            last_health_bar: None,
        }
    }

    // ------------------------------------------------------------------
    // Clock, events, visuals
    // ------------------------------------------------------------------

    /// Boss clock in milliseconds since construction.
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn advance_clock(&mut self, dt: f32) {
        self.now_ms += f64::from(dt) * 1000.0;
    }

    pub fn center(&self) -> Vec2 {
        self.base.center()
    }

    pub fn boss_ref(&self) -> BossRef {
        BossRef {
            id: self.base.id,
            kind: self.kind,
            name: self.name.clone(),
        }
    }

    pub fn emit(&mut self, event: BossEvent) {
        self.events.push(event);
    }

    pub fn emit_attack(&mut self, ability: &str, detail: Option<AttackDetail>) {
        let boss = self.boss_ref();
        self.emit(BossEvent::Attack {
            boss,
            ability: ability.to_string(),
            detail,
        });
    }

    /// Events raised since the last drain, oldest first.
    pub fn events(&self) -> &[BossEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<BossEvent> {
        std::mem::take(&mut self.events)
    }

    fn allocate_handle(&mut self) -> VisualHandle {
        let handle = VisualHandle(self.next_handle);
        self.next_handle += 1;
        handle
    }

    pub fn spawn_visual(&mut self, kind: VisualKind, position: Vec2, size: Vec2) -> VisualHandle {
        let handle = self.allocate_handle();
        self.sink.emit(VisualCommand::Spawn {
            handle,
            kind,
            position,
            size,
        });
        handle
    }

    pub fn despawn_visual(&mut self, handle: VisualHandle) {
        self.sink.emit(VisualCommand::Despawn { handle });
    }

    pub fn flash(&mut self, kind: FlashKind, position: Vec2) {
        self.sink.emit(VisualCommand::Flash { kind, position });
    }

    /// Spawn a visual that removes itself after `lifetime_ms`.
    fn spawn_transient_visual(&mut self, kind: VisualKind, position: Vec2, size: Vec2, lifetime_ms: f64) {
        let handle = self.spawn_visual(kind, position, size);
        self.schedule(lifetime_ms, BossTask::DespawnVisual(handle));
    }

    pub fn show_health_bar(&mut self) {
        if self.health_bar.is_none() {
            let position = self.center() - Vec2::new(0.0, self.base.height);
            let handle = self.spawn_visual(VisualKind::HealthBar, position, Vec2::new(self.base.width, 8.0));
            self.health_bar = Some(handle);
        }
        self.refresh_health_bar();
    }

    /// Push the current health and phase to the bar, only when either changed.
    pub fn refresh_health_bar(&mut self) {
        let Some(handle) = self.health_bar else {
            return;
        };
        let state = (self.base.health_fraction(), self.phase.phase());
        if self.last_health_bar == Some(state) {
            return;
        }
        self.last_health_bar = Some(state);
        self.sink.emit(VisualCommand::HealthBar {
            handle,
            fraction: state.0,
            phase: state.1,
        });
    }

    pub fn hide_health_bar(&mut self) {
        if let Some(handle) = self.health_bar.take() {
            self.despawn_visual(handle);
        }
        self.last_health_bar = None;
    }

    // ------------------------------------------------------------------
    // Deferred tasks
    // ------------------------------------------------------------------

    /// Queue `task` to run `delay_ms` from now.
    pub fn schedule(&mut self, delay_ms: f64, task: BossTask) {
        self.tasks.schedule(self.now_ms + delay_ms, task);
    }

    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    pub fn run_due_tasks(
        &mut self,
        mut player: Option<&mut (dyn BossTarget + '_)>,
        mut enemies: Option<&mut EnemyRoster>,
    ) {
        while let Some(task) = self.tasks.pop_due(self.now_ms) {
            self.execute_task(task, player.as_deref_mut(), enemies.as_deref_mut());
        }
    }

    fn execute_task(
        &mut self,
        task: BossTask,
        player: Option<&mut (dyn BossTarget + '_)>,
        enemies: Option<&mut EnemyRoster>,
    ) {
        if let BossTask::DespawnVisual(handle) = task {
            self.despawn_visual(handle);
            return;
        }
        if !self.is_active {
            return;
        }
        match task {
            BossTask::ComboHit {
                ability,
                hit,
                damage,
                reach,
            } => {
                let Some(player) = player.filter(|p| p.is_alive()) else {
                    debug!("{} hit {} skipped: no living target", ability, hit);
                    return;
                };
                let center = self.center();
                if center.distance(player.center()) > reach {
                    debug!("{} hit {} whiffed: target out of reach", ability, hit);
                    return;
                }
                let swing_at = center.lerp(player.center(), 0.5);
                self.spawn_transient_visual(VisualKind::ComboSwing, swing_at, Vec2::splat(reach), FLASH_VISUAL_MS);
                self.hit_player(player, damage, ability);
                self.emit_attack(ability, Some(AttackDetail::ComboHit(hit)));
            }
            BossTask::FireBeam { ability, spec } => {
                if let Some(telegraph) = self.beam.finish() {
                    self.despawn_visual(telegraph);
                }
                self.end_channel();
                let Some(player) = player.filter(|p| p.is_alive()) else {
                    debug!("{} fizzled: no living target", ability);
                    return;
                };
                let origin = self.center();
                let direction = self.beam.direction;
                let connected = beam_hits(
                    origin,
                    direction,
                    spec.length,
                    spec.half_width,
                    player.center(),
                    player.size().x,
                );
                self.spawn_transient_visual(
                    VisualKind::Beam,
                    origin + direction * spec.length * 0.5,
                    Vec2::new(spec.length, spec.half_width * 2.0),
                    FLASH_VISUAL_MS,
                );
                if connected {
                    self.hit_player(player, spec.damage, ability);
                }
                self.emit_attack(ability, Some(AttackDetail::Connected(connected)));
            }
            BossTask::Nova { ability, spec } => {
                self.end_channel();
                let Some(player) = player.filter(|p| p.is_alive()) else {
                    debug!("{} fizzled: no living target", ability);
                    return;
                };
                let center = self.center();
                self.spawn_transient_visual(VisualKind::Nova, center, Vec2::splat(spec.radius * 2.0), FLASH_VISUAL_MS);
                let reach = spec.radius + player.size().x * 0.5;
                let connected = center.distance(player.center()) <= reach;
                if connected {
                    self.hit_player(player, spec.damage, ability);
                }
                self.emit_attack(ability, Some(AttackDetail::Connected(connected)));
            }
            BossTask::Summon { ability, spec } => {
                self.end_channel();
                if !player.is_some_and(|p| p.is_alive()) {
                    debug!("{} cancelled: no living target", ability);
                    return;
                }
                let Some(enemies) = enemies else {
                    debug!("{} cancelled: no enemy roster to register minions in", ability);
                    return;
                };
                let summoned = self.summon_minions(enemies, &spec);
                self.emit_attack(ability, Some(AttackDetail::Minions(summoned)));
            }
            BossTask::DespawnVisual(_) => {}
        }
    }

    fn end_channel(&mut self) {
        if let Some(channel) = self.channel.take() {
            if let Some(telegraph) = channel.telegraph {
                self.despawn_visual(telegraph);
            }
        }
    }

    pub fn is_channeling(&self) -> bool {
        self.channel.is_some()
    }

    /// Spawn minions around the boss without exceeding the live cap.
    /// Returns how many were spawned.
    fn summon_minions(&mut self, enemies: &mut EnemyRoster, spec: &SummonSpec) -> u8 {
        self.prune_minions(Some(&*enemies));
        let room = spec.max_alive.saturating_sub(self.minions.len());
        let count = usize::from(spec.count).min(room);
        let size = Vec2::splat(self.minion.size);
        let stats = EnemyStats {
            health: self.minion.health * self.minion_scale,
            damage: self.minion.damage * self.minion_scale,
            speed: self.minion.speed,
        };
        let center = self.center();
        let inner = self.base.width * 0.5 + self.minion.size;
        for _ in 0..count {
            let offset = self.rng.random_offset(inner, inner.max(spec.spread));
            let at = clamp_center(center + offset, size);
            let id = enemies.spawn(EnemyKind::Minion, at, size, stats);
            self.minions.push(id);
        }
        if count > 0 {
            info!("{} summoned {} {}", self.name, count, self.minion.name);
        }
        count as u8
    }

    // ------------------------------------------------------------------
    // Player interaction
    // ------------------------------------------------------------------

    /// Damage the player on behalf of `ability`. Returns false when the player
    /// was already dead.
    pub fn hit_player(&mut self, player: &mut (dyn BossTarget + '_), amount: f32, ability: &str) -> bool {
        if !player.is_alive() {
            return false;
        }
        let handled = player.take_damage(amount);
        let died = match handled {
            Some(died) => died,
            None => {
                let remaining = (player.health() - amount).max(0.0);
                player.set_health(remaining);
                remaining <= 0.0
            }
        };
        self.stats.damage_dealt += amount;

        // A player with its own damage routine also handles its own death
        if died && handled.is_none() && !player.die() {
            warn!(
                "{} killed a player with no death routine; raising PlayerDefeated",
                ability
            );
            let boss = self.boss_ref();
            self.emit(BossEvent::PlayerDefeated {
                boss,
                ability: ability.to_string(),
            });
        }
        true
    }

    pub fn apply_status(&mut self, player: &mut (dyn BossTarget + '_), effect: StatusEffect, duration_ms: f64) {
        if duration_ms <= 0.0 || !player.is_alive() {
            return;
        }
        if !player.apply_effect(effect, duration_ms) {
            debug!("Player ignores {}", effect.name());
        }
    }

    // ------------------------------------------------------------------
    // Per-tick upkeep
    // ------------------------------------------------------------------

    /// Drop the shield once its window has passed.
    pub fn tick_shield(&mut self) {
        if self.shield.has_lapsed(self.now_ms) {
            if let Some(bubble) = self.shield.lower() {
                self.despawn_visual(bubble);
            }
            debug!(
                "{} shield down after absorbing {:.0} damage",
                self.name, self.shield.absorbed
            );
        }
    }

    /// One phase step at most. Returns the new phase when it changed.
    pub fn check_phase(&mut self) -> Option<u8> {
        let phase = self.phase.check(self.base.health_fraction())?;
        info!("{} enters phase {}", self.name, phase);
        let center = self.center();
        self.flash(FlashKind::PhaseShift, center);
        let boss = self.boss_ref();
        self.emit(BossEvent::PhaseChange { boss, phase });
        Some(phase)
    }

    /// Advance projectiles, zones and pillars against the player, if any.
    pub fn update_trackers(&mut self, dt: f32, mut player: Option<&mut (dyn BossTarget + '_)>) {
        self.update_projectiles(dt, player.as_deref_mut());
        self.update_zones(player.as_deref_mut());
        self.update_pillars(player);
    }

    fn update_projectiles(&mut self, dt: f32, mut player: Option<&mut (dyn BossTarget + '_)>) {
        let target = player
            .as_deref()
            .filter(|p| p.is_alive())
            .map(|p| (p.center(), p.size()));
        let projectiles = std::mem::take(&mut self.projectiles);
        let mut kept = Vec::with_capacity(projectiles.len());
        for mut shot in projectiles {
            match shot.step(dt, target) {
                ProjectileFate::Flying => {
                    self.sink.emit(VisualCommand::Move {
                        handle: shot.handle,
                        position: shot.position,
                    });
                    kept.push(shot);
                }
                ProjectileFate::HitTarget => {
                    if let Some(player) = player.as_deref_mut() {
                        self.hit_player(player, shot.damage, shot.source);
                    }
                    self.despawn_visual(shot.handle);
                }
                ProjectileFate::OutOfBounds | ProjectileFate::Deactivated => {
                    self.despawn_visual(shot.handle);
                }
            }
        }
        self.projectiles = kept;
    }

    fn update_zones(&mut self, mut player: Option<&mut (dyn BossTarget + '_)>) {
        let now = self.now_ms;
        let zones = std::mem::take(&mut self.zones);
        let mut kept = Vec::with_capacity(zones.len());
        for mut zone in zones {
            if zone.is_expired(now) {
                self.despawn_visual(zone.handle);
                continue;
            }
            self.sink.emit(VisualCommand::Fade {
                handle: zone.handle,
                opacity: zone.opacity(now),
            });
            if let Some(player) = player.as_deref_mut() {
                if player.is_alive() && zone.contains(player.center()) && zone.try_tick(now) {
                    self.hit_player(player, zone.spec.damage_per_tick, zone.source);
                    self.apply_status(player, StatusEffect::Slow, zone.spec.slow_ms);
                }
            }
            kept.push(zone);
        }
        self.zones = kept;
    }

    fn update_pillars(&mut self, mut player: Option<&mut (dyn BossTarget + '_)>) {
        let now = self.now_ms;
        let pillars = std::mem::take(&mut self.pillars);
        let mut kept = Vec::with_capacity(pillars.len());
        for mut pillar in pillars {
            match pillar.stage(now) {
                PillarStage::Warning => {}
                PillarStage::Active => {
                    if pillar.strike_marker.is_none() {
                        if let Some(warning) = pillar.warning_marker.take() {
                            self.despawn_visual(warning);
                        }
                        let strike = self.spawn_visual(VisualKind::PillarStrike, pillar.center, pillar.size);
                        pillar.strike_marker = Some(strike);
                    }
                    if let Some(player) = player.as_deref_mut() {
                        if player.is_alive() && pillar.try_strike(now, player.center(), player.size()) {
                            self.hit_player(player, pillar.damage, pillar.source);
                        }
                    }
                }
                PillarStage::Expired => {
                    self.remove_pillar_markers(&mut pillar);
                    continue;
                }
            }
            kept.push(pillar);
        }
        self.pillars = kept;
    }

    fn remove_pillar_markers(&mut self, pillar: &mut Pillar) {
        if let Some(warning) = pillar.warning_marker.take() {
            self.despawn_visual(warning);
        }
        if let Some(strike) = pillar.strike_marker.take() {
            self.despawn_visual(strike);
        }
    }

    /// Drive an in-flight charge or teleport. Returns true when one is in
    /// progress, in which case normal movement and ability selection are
    /// skipped for this tick.
    pub fn update_motion(&mut self, dt: f32, player: &mut (dyn BossTarget + '_)) -> bool {
        match self.teleport.step(self.now_ms) {
            TeleportStep::Idle => {}
            TeleportStep::Vanished | TeleportStep::Reappeared => return true,
            TeleportStep::Relocate => {
                let from = self.center();
                self.flash(FlashKind::TeleportOut, from);
                if let Some(destination) = self.teleport.destination {
                    let to = clamp_center(destination, self.base.size());
                    self.base.set_center(to);
                    self.flash(FlashKind::TeleportIn, to);
                }
                return true;
            }
            TeleportStep::Finished => {
                self.teleport.clear();
                return true;
            }
        }

        if !self.charge.active {
            return false;
        }
        if let Some(target) = self.charge.target {
            self.base.move_towards(target, self.charge.speed, dt);
        }
        let center = self.center();
        if let Some(trail) = self.charge.trail {
            self.sink.emit(VisualCommand::Move {
                handle: trail,
                position: center,
            });
        }
        if !self.charge.has_hit
            && player.is_alive()
            && rects_overlap(center, self.base.size(), player.center(), player.size())
        {
            self.charge.has_hit = true;
            let (damage, stun_ms, source) = (self.charge.damage, self.charge.stun_ms, self.charge.source);
            self.hit_player(player, damage, source);
            self.apply_status(player, StatusEffect::Stun, stun_ms);
        }
        if self.charge.has_arrived(center) || self.charge.timed_out(self.now_ms) {
            if let Some(trail) = self.charge.clear() {
                self.despawn_visual(trail);
            }
        }
        true
    }

    /// Forget minions that died or left the roster.
    pub fn prune_minions(&mut self, enemies: Option<&EnemyRoster>) {
        self.minions.retain(|id| match enemies {
            Some(roster) => roster
                .get(*id)
                .is_some_and(|minion| minion.active && minion.health > 0.0),
            None => true,
        });
    }

    /// Clamp into the arena and hand the position to the renderer.
    pub fn commit_position(&mut self) {
        self.base.commit_position();
        let center = self.center();
        if let Some(bubble) = self.shield.bubble {
            self.sink.emit(VisualCommand::Move {
                handle: bubble,
                position: center,
            });
        }
        if let Some(bar) = self.health_bar {
            self.sink.emit(VisualCommand::Move {
                handle: bar,
                position: center - Vec2::new(0.0, self.base.height),
            });
        }
    }

    // ------------------------------------------------------------------
    // Normal movement
    // ------------------------------------------------------------------

    fn move_speed(&self, factor: f32) -> f32 {
        self.base.speed * self.speed_multiplier * factor
    }

    pub fn approach(&mut self, target: Vec2, factor: f32, dt: f32) {
        let speed = self.move_speed(factor);
        self.base.move_towards(target, speed, dt);
    }

    pub fn retreat(&mut self, from: Vec2, factor: f32, dt: f32) {
        let away = self.center() - from;
        let speed = self.move_speed(factor);
        self.base.move_along(away, speed, dt);
    }

    /// Circle around `around`; `sign` picks the direction.
    pub fn strafe(&mut self, around: Vec2, sign: f32, factor: f32, dt: f32) {
        let to_target = (around - self.center()).normalize_or_zero();
        let speed = self.move_speed(factor);
        self.base.move_along(to_target.perp() * sign, speed, dt);
    }

    // ------------------------------------------------------------------
    // Teardown
    // ------------------------------------------------------------------

    /// Remove every transient effect and its visuals, and drop pending tasks.
    /// Visuals that were waiting on a deferred despawn are removed now.
    pub fn clear_effects(&mut self) {
        for task in self.tasks.drain() {
            if let BossTask::DespawnVisual(handle) = task {
                self.despawn_visual(handle);
            }
        }
        for shot in std::mem::take(&mut self.projectiles) {
            self.despawn_visual(shot.handle);
        }
        for zone in std::mem::take(&mut self.zones) {
            self.despawn_visual(zone.handle);
        }
        for mut pillar in std::mem::take(&mut self.pillars) {
            self.remove_pillar_markers(&mut pillar);
        }
        if let Some(trail) = self.charge.clear() {
            self.despawn_visual(trail);
        }
        self.teleport.clear();
        if let Some(telegraph) = self.beam.finish() {
            self.despawn_visual(telegraph);
        }
        self.end_channel();
        if let Some(bubble) = self.shield.lower() {
            self.despawn_visual(bubble);
        }
    }

    /// Forward cleanup to every tracked minion and forget them. Without a
    /// roster the ids are kept so a later call can still reach them.
    pub fn release_minions(&mut self, enemies: Option<&mut EnemyRoster>) {
        let Some(roster) = enemies else {
            return;
        };
        for id in self.minions.drain(..) {
            if let Some(minion) = roster.get_mut(id) {
                minion.cleanup();
            }
        }
    }
}
