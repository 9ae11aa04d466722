//! Church Paladin
//!
//! Three-phase holy knight.
//!
//! ## Priority Order
//! Phase 1 (melee bruiser)
//! 1. Holy Charge (gap closer at medium range)
//! 2. Crusader Combo (three-hit melee chain)
//! 3. Divine Volley (projectile fan at range)
//!
//! Phase 2 (area control)
//! 1. Divine Shield (invulnerability window)
//! 2. Consecration (zone under the player)
//! 3. Light Pillars (telegraphed strikes around the player)
//! 4. Holy Teleport (reposition when the player is far away)
//!
//! Phase 3 (enraged)
//! 1. Judgment Beam
//! 2. Holy Nova
//! 3. Summon Crusaders
//! 4. Backup: Divine Shield, Holy Charge, Crusader Combo, Light Pillars,
//!    Consecration, Divine Volley

use bevy::prelude::*;

use crate::boss::abilities::ComboStep;
use crate::boss::boss_core::{BossCore, NovaSpec, SummonSpec};
use crate::boss::config::RewardDefinition;
use crate::boss::cooldown::Cooldown;
use crate::boss::effects::{BeamSpec, ChargeSpec, PillarSpec, VolleySpec, ZoneSpec};
use crate::world::BossTarget;

pub const HOLY_CHARGE: &str = "Holy Charge";
pub const CRUSADER_COMBO: &str = "Crusader Combo";
pub const DIVINE_VOLLEY: &str = "Divine Volley";
pub const DIVINE_SHIELD: &str = "Divine Shield";
pub const CONSECRATION: &str = "Consecration";
pub const LIGHT_PILLARS: &str = "Light Pillars";
pub const HOLY_TELEPORT: &str = "Holy Teleport";
pub const JUDGMENT_BEAM: &str = "Judgment Beam";
pub const HOLY_NOVA: &str = "Holy Nova";
pub const SUMMON_CRUSADERS: &str = "Summon Crusaders";

// ============================================================================
// Tuning
// ============================================================================

const HOLY_CHARGE_COOLDOWN_MS: f64 = 8000.0;
const HOLY_CHARGE_MIN_DISTANCE: f32 = 260.0;
const HOLY_CHARGE_MAX_DISTANCE: f32 = 650.0;
const HOLY_CHARGE_SPEED: f32 = 520.0;
const HOLY_CHARGE_OVERSHOOT: f32 = 60.0;
const HOLY_CHARGE_STUN_MS: f64 = 500.0;

const CRUSADER_COMBO_COOLDOWN_MS: f64 = 3200.0;
/// Combo starts only inside this range; each hit re-checks against the reach
const CRUSADER_COMBO_RANGE: f32 = 110.0;
const CRUSADER_COMBO_REACH: f32 = 120.0;
const CRUSADER_COMBO_STEPS: [ComboStep; 3] = [
    ComboStep {
        delay_ms: 150.0,
        multiplier: 1.0,
    },
    ComboStep {
        delay_ms: 450.0,
        multiplier: 1.25,
    },
    ComboStep {
        delay_ms: 800.0,
        multiplier: 1.6,
    },
];

const DIVINE_VOLLEY_COOLDOWN_MS: f64 = 4200.0;
const DIVINE_VOLLEY_MIN_DISTANCE: f32 = 160.0;
const DIVINE_VOLLEY_COUNT: u8 = 5;
const DIVINE_VOLLEY_SPREAD_DEGREES: f32 = 12.0;
const DIVINE_VOLLEY_SPEED: f32 = 280.0;
const DIVINE_VOLLEY_DAMAGE: f32 = 0.6;
const DIVINE_VOLLEY_RADIUS: f32 = 10.0;

const DIVINE_SHIELD_COOLDOWN_MS: f64 = 18000.0;
const DIVINE_SHIELD_DURATION_MS: f64 = 3000.0;

const CONSECRATION_COOLDOWN_MS: f64 = 9000.0;
const CONSECRATION_MAX_DISTANCE: f32 = 240.0;
const CONSECRATION_RADIUS: f32 = 110.0;
const CONSECRATION_DAMAGE: f32 = 0.25;
const CONSECRATION_DURATION_MS: f64 = 6000.0;
const CONSECRATION_TICK_MS: f64 = 500.0;
const CONSECRATION_SLOW_MS: f64 = 600.0;

const LIGHT_PILLARS_COOLDOWN_MS: f64 = 7000.0;
const LIGHT_PILLARS_MIN_DISTANCE: f32 = 140.0;
const LIGHT_PILLARS_SPACING: f32 = 130.0;
const LIGHT_PILLARS_SIZE: f32 = 80.0;
const LIGHT_PILLARS_WARNING_MS: f64 = 900.0;
const LIGHT_PILLARS_ACTIVE_MS: f64 = 400.0;
const LIGHT_PILLARS_DAMAGE: f32 = 1.2;

const HOLY_TELEPORT_COOLDOWN_MS: f64 = 11000.0;
const HOLY_TELEPORT_MIN_DISTANCE: f32 = 420.0;
const HOLY_TELEPORT_LANDING_DISTANCE: f32 = 220.0;
const HOLY_TELEPORT_DURATION_MS: f64 = 700.0;

const JUDGMENT_BEAM_COOLDOWN_MS: f64 = 12000.0;
const JUDGMENT_BEAM_MIN_DISTANCE: f32 = 140.0;
const JUDGMENT_BEAM_MAX_DISTANCE: f32 = 720.0;
const JUDGMENT_BEAM_CHARGE_MS: f64 = 1200.0;
const JUDGMENT_BEAM_LENGTH: f32 = 900.0;
const JUDGMENT_BEAM_HALF_WIDTH: f32 = 28.0;
const JUDGMENT_BEAM_DAMAGE: f32 = 2.0;

const HOLY_NOVA_COOLDOWN_MS: f64 = 9500.0;
const HOLY_NOVA_MAX_DISTANCE: f32 = 200.0;
const HOLY_NOVA_CHARGE_MS: f64 = 800.0;
const HOLY_NOVA_RADIUS: f32 = 190.0;
const HOLY_NOVA_DAMAGE: f32 = 1.4;

const SUMMON_CRUSADERS_COOLDOWN_MS: f64 = 22000.0;
const SUMMON_CRUSADERS_COUNT: u8 = 3;
const SUMMON_CRUSADERS_MAX_ALIVE: usize = 6;
const SUMMON_CRUSADERS_CHARGE_MS: f64 = 1000.0;
const SUMMON_CRUSADERS_SPREAD: f32 = 90.0;

// Movement bands
const PHASE_ONE_ENGAGE_DISTANCE: f32 = 100.0;
const PHASE_TWO_RETREAT_DISTANCE: f32 = 170.0;
const PHASE_TWO_APPROACH_DISTANCE: f32 = 360.0;
const PHASE_THREE_ENGAGE_DISTANCE: f32 = 140.0;
const STRAFE_SPEED: f32 = 0.5;
/// Movement while winding up a beam, nova or summon
const CHANNEL_STRAFE_SPEED: f32 = 0.25;
const STRAFE_FLIP_MS: f64 = 2500.0;
const ENRAGE_SPEED_MULTIPLIER: f32 = 1.3;

#[derive(Debug, Clone)]
pub struct ChurchPaladin {
    pub holy_charge: Cooldown,
    pub crusader_combo: Cooldown,
    pub divine_volley: Cooldown,
    pub divine_shield: Cooldown,
    pub consecration: Cooldown,
    pub light_pillars: Cooldown,
    pub holy_teleport: Cooldown,
    pub judgment_beam: Cooldown,
    pub holy_nova: Cooldown,
    pub summon_crusaders: Cooldown,
    strafe_flip: Cooldown,
    strafe_sign: f32,
    pub enraged: bool,
}

impl Default for ChurchPaladin {
    fn default() -> Self {
        Self {
            holy_charge: Cooldown::new(HOLY_CHARGE_COOLDOWN_MS),
            crusader_combo: Cooldown::new(CRUSADER_COMBO_COOLDOWN_MS),
            divine_volley: Cooldown::new(DIVINE_VOLLEY_COOLDOWN_MS),
            divine_shield: Cooldown::new(DIVINE_SHIELD_COOLDOWN_MS),
            consecration: Cooldown::new(CONSECRATION_COOLDOWN_MS),
            light_pillars: Cooldown::new(LIGHT_PILLARS_COOLDOWN_MS),
            holy_teleport: Cooldown::new(HOLY_TELEPORT_COOLDOWN_MS),
            judgment_beam: Cooldown::new(JUDGMENT_BEAM_COOLDOWN_MS),
            holy_nova: Cooldown::new(HOLY_NOVA_COOLDOWN_MS),
            summon_crusaders: Cooldown::new(SUMMON_CRUSADERS_COOLDOWN_MS),
            strafe_flip: Cooldown::new(STRAFE_FLIP_MS),
            strafe_sign: 1.0,
            enraged: false,
        }
    }
}

/// Where the player stands relative to the boss this tick.
#[derive(Debug, Clone, Copy)]
struct Situation {
    player: Vec2,
    distance: f32,
    now_ms: f64,
}

impl ChurchPaladin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Per-tick decision: movement first, then at most one new ability.
    pub fn on_update(&mut self, core: &mut BossCore, dt: f32, player: &mut (dyn BossTarget + '_)) {
        // Charge and teleport replace everything else while they run
        if core.update_motion(dt, player) {
            return;
        }
        if !player.is_alive() {
            return;
        }

        let situation = Situation {
            player: player.center(),
            distance: core.center().distance(player.center()),
            now_ms: core.now_ms(),
        };
        if self.strafe_flip.is_ready(situation.now_ms) {
            if self.strafe_flip.last_triggered_ms().is_some() {
                self.strafe_sign = -self.strafe_sign;
            }
            self.strafe_flip.trigger(situation.now_ms);
        }

        if core.is_channeling() {
            core.strafe(situation.player, self.strafe_sign, CHANNEL_STRAFE_SPEED, dt);
            return;
        }

        match core.phase.phase() {
            1 => self.phase_one(core, situation, dt),
            2 => self.phase_two(core, situation, dt),
            _ => self.phase_three(core, situation, dt),
        }
    }

    pub fn on_phase_change(&mut self, core: &mut BossCore, phase: u8) {
        if phase == core.phase.max_phases() {
            self.enraged = true;
            core.speed_multiplier = ENRAGE_SPEED_MULTIPLIER;
            // The phase one gap closer is back as a backup right away
            self.holy_charge.reset();
            info!("{} is enraged", core.name);
        }
    }

    pub fn on_defeated(&mut self, core: &mut BossCore) -> Option<RewardDefinition> {
        Some(core.reward.clone())
    }

    // ========================================================================
    // Phase routines
    // ========================================================================

    fn phase_one(&mut self, core: &mut BossCore, at: Situation, dt: f32) {
        if at.distance > PHASE_ONE_ENGAGE_DISTANCE {
            core.approach(at.player, 1.0, dt);
        } else {
            core.strafe(at.player, self.strafe_sign, STRAFE_SPEED, dt);
        }

        // Priority 1: Holy Charge
        if self.try_holy_charge(core, at) {
            return;
        }

        // Priority 2: Crusader Combo
        if self.try_crusader_combo(core, at) {
            return;
        }

        // Priority 3: Divine Volley
        self.try_divine_volley(core, at);
    }

    fn phase_two(&mut self, core: &mut BossCore, at: Situation, dt: f32) {
        if at.distance < PHASE_TWO_RETREAT_DISTANCE {
            core.retreat(at.player, 1.0, dt);
        } else if at.distance > PHASE_TWO_APPROACH_DISTANCE {
            core.approach(at.player, 1.0, dt);
        } else {
            core.strafe(at.player, self.strafe_sign, STRAFE_SPEED, dt);
        }

        // Priority 1: Divine Shield
        if self.try_divine_shield(core, at) {
            return;
        }

        // Priority 2: Consecration
        if self.try_consecration(core, at) {
            return;
        }

        // Priority 3: Light Pillars
        if self.try_light_pillars(core, at) {
            return;
        }

        // Priority 4: Holy Teleport
        self.try_holy_teleport(core, at);
    }

    fn phase_three(&mut self, core: &mut BossCore, at: Situation, dt: f32) {
        if at.distance > PHASE_THREE_ENGAGE_DISTANCE {
            core.approach(at.player, 1.0, dt);
        } else {
            core.strafe(at.player, self.strafe_sign, STRAFE_SPEED, dt);
        }

        // Priority 1: Judgment Beam
        if self.try_judgment_beam(core, at) {
            return;
        }

        // Priority 2: Holy Nova
        if self.try_holy_nova(core, at) {
            return;
        }

        // Priority 3: Summon Crusaders
        if self.try_summon_crusaders(core, at) {
            return;
        }

        // Priority 4: earlier abilities
        self.backup_abilities(core, at);
    }

    fn backup_abilities(&mut self, core: &mut BossCore, at: Situation) -> bool {
        self.try_divine_shield(core, at)
            || self.try_holy_charge(core, at)
            || self.try_crusader_combo(core, at)
            || self.try_light_pillars(core, at)
            || self.try_consecration(core, at)
            || self.try_divine_volley(core, at)
    }

    // ========================================================================
    // Abilities
    // ========================================================================

    fn try_holy_charge(&mut self, core: &mut BossCore, at: Situation) -> bool {
        if !self.holy_charge.is_ready(at.now_ms)
            || !(HOLY_CHARGE_MIN_DISTANCE..=HOLY_CHARGE_MAX_DISTANCE).contains(&at.distance)
        {
            return false;
        }
        self.holy_charge.trigger(at.now_ms);
        let spec = ChargeSpec {
            speed: HOLY_CHARGE_SPEED,
            damage: core.base.damage,
            stun_ms: HOLY_CHARGE_STUN_MS,
            overshoot: HOLY_CHARGE_OVERSHOOT,
        };
        core.begin_charge(HOLY_CHARGE, at.player, &spec);
        true
    }

    fn try_crusader_combo(&mut self, core: &mut BossCore, at: Situation) -> bool {
        if !self.crusader_combo.is_ready(at.now_ms) || at.distance > CRUSADER_COMBO_RANGE {
            return false;
        }
        self.crusader_combo.trigger(at.now_ms);
        core.queue_combo(CRUSADER_COMBO, &CRUSADER_COMBO_STEPS, CRUSADER_COMBO_REACH);
        true
    }

    fn try_divine_volley(&mut self, core: &mut BossCore, at: Situation) -> bool {
        if !self.divine_volley.is_ready(at.now_ms) || at.distance < DIVINE_VOLLEY_MIN_DISTANCE {
            return false;
        }
        self.divine_volley.trigger(at.now_ms);
        let spec = VolleySpec {
            count: DIVINE_VOLLEY_COUNT,
            spread: DIVINE_VOLLEY_SPREAD_DEGREES.to_radians(),
            speed: DIVINE_VOLLEY_SPEED,
            damage: core.base.damage * DIVINE_VOLLEY_DAMAGE,
            radius: DIVINE_VOLLEY_RADIUS,
        };
        core.fire_volley(DIVINE_VOLLEY, at.player, &spec);
        true
    }

    fn try_divine_shield(&mut self, core: &mut BossCore, at: Situation) -> bool {
        if !self.divine_shield.is_ready(at.now_ms) || core.shield.active {
            return false;
        }
        self.divine_shield.trigger(at.now_ms);
        core.raise_shield(DIVINE_SHIELD, DIVINE_SHIELD_DURATION_MS);
        true
    }

    fn try_consecration(&mut self, core: &mut BossCore, at: Situation) -> bool {
        if !self.consecration.is_ready(at.now_ms) || at.distance > CONSECRATION_MAX_DISTANCE {
            return false;
        }
        self.consecration.trigger(at.now_ms);
        let spec = ZoneSpec {
            radius: CONSECRATION_RADIUS,
            damage_per_tick: core.base.damage * CONSECRATION_DAMAGE,
            duration_ms: CONSECRATION_DURATION_MS,
            tick_interval_ms: CONSECRATION_TICK_MS,
            slow_ms: CONSECRATION_SLOW_MS,
        };
        core.spawn_zone(CONSECRATION, at.player, spec);
        true
    }

    fn try_light_pillars(&mut self, core: &mut BossCore, at: Situation) -> bool {
        if !self.light_pillars.is_ready(at.now_ms) || at.distance < LIGHT_PILLARS_MIN_DISTANCE {
            return false;
        }
        self.light_pillars.trigger(at.now_ms);
        let bearing = (at.player - core.center()).normalize_or(Vec2::X);
        let across = bearing.perp() * LIGHT_PILLARS_SPACING;
        let centers = [at.player, at.player + across, at.player - across];
        let spec = PillarSpec {
            size: Vec2::splat(LIGHT_PILLARS_SIZE),
            damage: core.base.damage * LIGHT_PILLARS_DAMAGE,
            warning_ms: LIGHT_PILLARS_WARNING_MS,
            active_ms: LIGHT_PILLARS_ACTIVE_MS,
        };
        core.spawn_pillars(LIGHT_PILLARS, &centers, &spec);
        true
    }

    fn try_holy_teleport(&mut self, core: &mut BossCore, at: Situation) -> bool {
        if !self.holy_teleport.is_ready(at.now_ms) || at.distance <= HOLY_TELEPORT_MIN_DISTANCE {
            return false;
        }
        self.holy_teleport.trigger(at.now_ms);
        let angle = core.rng.random_angle();
        let destination = at.player + Vec2::from_angle(angle) * HOLY_TELEPORT_LANDING_DISTANCE;
        core.begin_teleport(HOLY_TELEPORT, destination, HOLY_TELEPORT_DURATION_MS);
        true
    }

    fn try_judgment_beam(&mut self, core: &mut BossCore, at: Situation) -> bool {
        if !self.judgment_beam.is_ready(at.now_ms)
            || !(JUDGMENT_BEAM_MIN_DISTANCE..=JUDGMENT_BEAM_MAX_DISTANCE).contains(&at.distance)
        {
            return false;
        }
        self.judgment_beam.trigger(at.now_ms);
        let spec = BeamSpec {
            charge_ms: JUDGMENT_BEAM_CHARGE_MS,
            length: JUDGMENT_BEAM_LENGTH,
            half_width: JUDGMENT_BEAM_HALF_WIDTH,
            damage: core.base.damage * JUDGMENT_BEAM_DAMAGE,
        };
        core.begin_beam(JUDGMENT_BEAM, at.player, spec);
        true
    }

    fn try_holy_nova(&mut self, core: &mut BossCore, at: Situation) -> bool {
        if !self.holy_nova.is_ready(at.now_ms) || at.distance > HOLY_NOVA_MAX_DISTANCE {
            return false;
        }
        self.holy_nova.trigger(at.now_ms);
        let spec = NovaSpec {
            charge_ms: HOLY_NOVA_CHARGE_MS,
            radius: HOLY_NOVA_RADIUS,
            damage: core.base.damage * HOLY_NOVA_DAMAGE,
        };
        core.begin_nova(HOLY_NOVA, spec);
        true
    }

    fn try_summon_crusaders(&mut self, core: &mut BossCore, at: Situation) -> bool {
        if !self.summon_crusaders.is_ready(at.now_ms)
            || core.minions.len() >= SUMMON_CRUSADERS_MAX_ALIVE
        {
            return false;
        }
        self.summon_crusaders.trigger(at.now_ms);
        let spec = SummonSpec {
            charge_ms: SUMMON_CRUSADERS_CHARGE_MS,
            count: SUMMON_CRUSADERS_COUNT,
            max_alive: SUMMON_CRUSADERS_MAX_ALIVE,
            spread: SUMMON_CRUSADERS_SPREAD,
        };
        core.begin_summon(SUMMON_CRUSADERS, spec);
        true
    }
}
