//! Headless encounter execution
//!
//! Runs a boss encounter without any graphical output at a fixed 60 Hz step.
//! A scripted player kites the boss and shoots it until one side falls or
//! the time limit is reached.

use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use crate::boss::spawn::DEFAULT_SPAWN_INTERVAL_MS;
use crate::boss::{Arena, BossConfigPlugin, BossPlugin, BossSpawnController, BossSystemPhase};
use crate::combat::log::{EncounterEventType, EncounterLog, EncounterMetadata};
use crate::combat::EncounterLogPlugin;
use crate::world::{
    rects_overlap, BossTarget, EnemyId, EnemyKind, EnemyRoster, GameRng, Player, GAME_HEIGHT,
    GAME_WIDTH,
};

use super::config::HeadlessEncounterConfig;

/// Simulation step in seconds
pub const HEADLESS_TIMESTEP: f64 = 1.0 / 60.0;

/// Distance the scripted player tries to keep from the boss
const PREFERRED_RANGE: f32 = 260.0;
const RANGE_SLACK: f32 = 50.0;
/// Seconds between strafe direction swaps
const STRAFE_SWAP_SECS: f32 = 3.0;
/// Seconds between player shots; each shot carries `player_dps * interval` damage
const SHOT_INTERVAL_SECS: f32 = 0.5;
/// A minion damages the player at most once per interval
pub const MINION_CONTACT_INTERVAL_MS: f64 = 1000.0;

/// How an encounter ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncounterOutcome {
    BossDefeated,
    PlayerDefeated,
    TimedOut,
}

impl EncounterOutcome {
    pub fn name(&self) -> &'static str {
        match self {
            EncounterOutcome::BossDefeated => "BossDefeated",
            EncounterOutcome::PlayerDefeated => "PlayerDefeated",
            EncounterOutcome::TimedOut => "TimedOut",
        }
    }
}

/// Result of a completed headless encounter
///
/// This struct provides programmatic access to encounter results for testing and analysis.
#[derive(Debug, Clone)]
pub struct EncounterResult {
    pub outcome: EncounterOutcome,
    /// Seconds from the first frame to the end of the encounter
    pub encounter_time: f32,
    pub boss_name: String,
    /// Highest phase the boss reached (0 if it never spawned)
    pub highest_phase: u8,
    pub damage_to_boss: f32,
    pub damage_to_player: f32,
    /// Player health remaining at the end
    pub player_health: f32,
    /// Activations per ability name
    pub abilities_used: BTreeMap<String, u32>,
    /// Random seed used (if deterministic mode)
    pub random_seed: Option<u64>,
}

/// Resource to track headless encounter state
#[derive(Resource)]
pub struct HeadlessEncounterState {
    pub max_duration: f32,
    pub elapsed_time: f32,
    pub player_dps: f32,
    pub player_attack_tag: Option<String>,
    pub random_seed: Option<u64>,
    pub encounter_complete: bool,
    pub highest_phase: u8,
    pub boss_name: String,
    /// Populated when the encounter completes
    pub result: Option<EncounterResult>,
    shot_timer: f32,
    /// Player damage already written to the log
    player_damage_logged: f32,
    /// Last time each minion touched the player
    minion_contacts: HashMap<EnemyId, f64>,
}

impl HeadlessEncounterState {
    fn new(config: &HeadlessEncounterConfig) -> Self {
        Self {
            max_duration: config.max_duration_secs,
            elapsed_time: 0.0,
            player_dps: config.player_dps,
            player_attack_tag: config.player_attack_tag.clone(),
            random_seed: config.random_seed,
            encounter_complete: false,
            highest_phase: 0,
            boss_name: config.boss.clone(),
            result: None,
            shot_timer: 0.0,
            player_damage_logged: 0.0,
            minion_contacts: HashMap::new(),
        }
    }

    /// Forget contact times of minions that died or left the roster.
    fn prune_minion_contacts(&mut self, enemies: &EnemyRoster) {
        self.minion_contacts.retain(|id, _| {
            enemies
                .get(*id)
                .is_some_and(|minion| minion.active && minion.is_alive())
        });
    }
}

/// Plugin for headless encounter execution. Expects [`Arena`] to be
/// inserted by the caller after [`BossPlugin`].
pub struct HeadlessPlugin {
    pub config: HeadlessEncounterConfig,
}

impl Plugin for HeadlessPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(HeadlessEncounterState::new(&self.config))
            .add_systems(Startup, headless_setup_encounter)
            .add_systems(
                Update,
                scripted_player
                    .after(BossSystemPhase::Spawn)
                    .before(BossSystemPhase::Tick),
            )
            .add_systems(
                Update,
                (record_player_damage, minion_contact)
                    .chain()
                    .after(BossSystemPhase::Tick)
                    .before(BossSystemPhase::Resolve),
            )
            .add_systems(
                PostUpdate,
                (headless_track_time, headless_check_encounter_end).chain(),
            );
    }
}

fn headless_setup_encounter(state: Res<HeadlessEncounterState>, mut log: ResMut<EncounterLog>) {
    log.clear();
    log.log(
        EncounterEventType::EncounterEvent,
        "Encounter started (headless mode)!".to_string(),
    );
    match state.random_seed {
        Some(seed) => info!("Using deterministic RNG with seed: {}", seed),
        None => info!("Using non-deterministic RNG (no seed provided)"),
    }
}

/// Kite the boss at a preferred range and shoot it at a fixed rate.
fn scripted_player(
    time: Res<Time>,
    mut arena: ResMut<Arena>,
    mut state: ResMut<HeadlessEncounterState>,
    mut log: ResMut<EncounterLog>,
) {
    let dt = time.delta_secs();
    let arena = &mut *arena;
    let state = &mut *state;
    arena.player.tick(dt);
    if arena.player.is_dead {
        return;
    }
    let Some(boss) = arena.boss.as_mut().filter(|boss| boss.is_active()) else {
        return;
    };

    let to_boss = boss.center() - arena.player.position;
    let away = -to_boss.normalize_or_zero();
    let strafe_sign = if (state.elapsed_time / STRAFE_SWAP_SECS) as u32 % 2 == 0 {
        1.0
    } else {
        -1.0
    };
    let distance = to_boss.length();
    let direction = if distance < PREFERRED_RANGE - RANGE_SLACK {
        away + away.perp() * 0.5 * strafe_sign
    } else if distance > PREFERRED_RANGE + RANGE_SLACK {
        -away
    } else {
        away.perp() * strafe_sign
    };
    arena.player.move_along(direction, dt);

    state.shot_timer += dt;
    if state.shot_timer < SHOT_INTERVAL_SECS || state.player_dps <= 0.0 {
        return;
    }
    state.shot_timer -= SHOT_INTERVAL_SECS;
    let tag = state.player_attack_tag.as_deref();
    let before = boss.health();
    boss.take_damage(state.player_dps * SHOT_INTERVAL_SECS, None, tag);
    let dealt = before - boss.health();
    if dealt > 0.0 {
        log.log_damage_to_boss(boss.name(), dealt, tag);
    }
}

/// Log whatever the boss did to the player this tick.
fn record_player_damage(
    arena: Res<Arena>,
    mut state: ResMut<HeadlessEncounterState>,
    mut log: ResMut<EncounterLog>,
) {
    let taken = arena.player.damage_taken - state.player_damage_logged;
    if taken <= 0.0 {
        return;
    }
    state.player_damage_logged = arena.player.damage_taken;
    let source = arena.boss.as_ref().map(|boss| boss.name().to_string());
    log.log_damage_to_player(taken, source.as_deref());
}

/// Minions chase the player and deal contact damage.
fn minion_contact(
    time: Res<Time>,
    mut arena: ResMut<Arena>,
    mut state: ResMut<HeadlessEncounterState>,
    mut log: ResMut<EncounterLog>,
) {
    let dt = time.delta_secs();
    let arena = &mut *arena;
    let state = &mut *state;
    let now = arena.elapsed_ms;
    let player = &mut arena.player;

    for minion in arena
        .enemies
        .iter_mut()
        .filter(|e| e.kind == EnemyKind::Minion && e.active && e.is_alive())
    {
        if player.is_dead {
            break;
        }
        minion.move_towards(player.position, minion.speed, dt);
        minion.commit_position();
        if !rects_overlap(minion.center(), minion.size(), player.position, player.size()) {
            continue;
        }
        let last_contact = state.minion_contacts.get(&minion.id).copied();
        if last_contact.is_some_and(|at| now - at < MINION_CONTACT_INTERVAL_MS) {
            continue;
        }
        state.minion_contacts.insert(minion.id, now);

        let before = player.damage_taken;
        let died = player.take_damage(minion.damage).unwrap_or(false);
        let dealt = player.damage_taken - before;
        if dealt > 0.0 {
            state.player_damage_logged += dealt;
            log.log_damage_to_player(dealt, Some("minion"));
        }
        if died {
            log.log(
                EncounterEventType::PlayerDeath,
                "Player killed by a minion".to_string(),
            );
        }
    }
    state.prune_minion_contacts(&arena.enemies);
}

/// Track elapsed encounter time (used for timeout detection).
fn headless_track_time(time: Res<Time>, mut state: ResMut<HeadlessEncounterState>) {
    if !state.encounter_complete {
        state.elapsed_time += time.delta_secs();
    }
}

/// Check whether the boss or the player fell, or time ran out.
fn headless_check_encounter_end(
    arena: Res<Arena>,
    mut state: ResMut<HeadlessEncounterState>,
    mut log: ResMut<EncounterLog>,
) {
    if state.encounter_complete {
        return;
    }
    if let Some(boss) = &arena.boss {
        state.highest_phase = state.highest_phase.max(boss.phase());
        state.boss_name = boss.name().to_string();
    }

    let outcome = if arena.bosses_defeated > 0 {
        info!("Encounter ended: {} defeated", state.boss_name);
        EncounterOutcome::BossDefeated
    } else if arena.player.is_dead {
        info!("Encounter ended: player defeated by {}", state.boss_name);
        EncounterOutcome::PlayerDefeated
    } else if state.elapsed_time >= state.max_duration {
        info!(
            "Encounter timed out after {:.1}s",
            state.elapsed_time
        );
        EncounterOutcome::TimedOut
    } else {
        return;
    };

    log.log(
        EncounterEventType::EncounterEvent,
        format!("Encounter ended: {}", outcome.name()),
    );
    state.result = Some(EncounterResult {
        outcome,
        encounter_time: state.elapsed_time,
        boss_name: state.boss_name.clone(),
        highest_phase: state.highest_phase,
        damage_to_boss: log.total_damage_to_boss(),
        damage_to_player: arena.player.damage_taken,
        player_health: arena.player.health,
        abilities_used: log.abilities_used(),
        random_seed: state.random_seed,
    });
    state.encounter_complete = true;
}

/// Build the bevy app for an encounter without running it.
pub fn build_headless_app(config: &HeadlessEncounterConfig) -> Result<App, String> {
    config.validate()?;
    let kind = config.boss_kind()?;

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            HEADLESS_TIMESTEP,
        )));
    // The global subscriber can only be set once per process
    if config.verbose {
        app.add_plugins(LogPlugin::default());
    }

    let player = Player::new(
        Vec2::new(GAME_WIDTH * 0.5, GAME_HEIGHT * 0.75),
        config.player_health,
    );
    let spawner = BossSpawnController::new(
        vec![kind],
        f64::from(config.spawn_delay_secs) * 1000.0,
        DEFAULT_SPAWN_INTERVAL_MS,
    );
    let rng = GameRng::from_optional_seed(config.random_seed);

    app.add_plugins((BossConfigPlugin, BossPlugin, EncounterLogPlugin))
        .insert_resource(Arena::new(player, spawner, config.player_level, rng))
        .add_plugins(HeadlessPlugin {
            config: config.clone(),
        });
    Ok(app)
}

/// Run a headless encounter to completion and save its log.
pub fn run_headless_encounter(config: HeadlessEncounterConfig) -> Result<EncounterResult, String> {
    println!("Starting headless encounter simulation...");
    println!("  Boss: {} (level {})", config.boss, config.player_level);
    println!(
        "  Player: {:.0} HP, {:.0} DPS",
        config.player_health, config.player_dps
    );
    println!("  Max duration: {:.0}s", config.max_duration_secs);

    let mut app = build_headless_app(&config)?;
    app.finish();
    app.cleanup();

    // One spare second of frames for the final tick to be observed
    let max_frames = ((f64::from(config.max_duration_secs) + 1.0) / HEADLESS_TIMESTEP).ceil() as u64;
    let mut frames = 0;
    let result = loop {
        app.update();
        frames += 1;
        if let Some(result) = app.world().resource::<HeadlessEncounterState>().result.clone() {
            break result;
        }
        if frames > max_frames {
            return Err(format!(
                "Encounter did not finish within {} frames",
                max_frames
            ));
        }
    };

    let metadata = EncounterMetadata {
        boss: result.boss_name.clone(),
        outcome: result.outcome.name().to_string(),
        duration_secs: result.encounter_time,
        player_level: config.player_level,
        highest_phase: result.highest_phase,
        random_seed: result.random_seed,
    };
    let log = app.world().resource::<EncounterLog>();
    match log.save_to_file(&metadata, config.output_path.as_deref()) {
        Ok(filename) => println!("Encounter complete. Log saved to: {}", filename),
        Err(e) => warn!("Failed to save encounter log: {}", e),
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::EnemyStats;

    #[test]
    fn test_contacts_forget_departed_minions() {
        let mut state = HeadlessEncounterState::new(&HeadlessEncounterConfig::default());
        let mut roster = EnemyRoster::new();
        let stats = EnemyStats {
            health: 30.0,
            damage: 5.0,
            speed: 80.0,
        };
        let alive = roster.spawn(EnemyKind::Minion, Vec2::ZERO, Vec2::splat(24.0), stats);
        let killed = roster.spawn(EnemyKind::Minion, Vec2::ZERO, Vec2::splat(24.0), stats);
        let released = roster.spawn(EnemyKind::Minion, Vec2::ZERO, Vec2::splat(24.0), stats);
        for id in [alive, killed, released, 99] {
            state.minion_contacts.insert(id, 0.0);
        }
        if let Some(minion) = roster.get_mut(killed) {
            minion.take_damage(100.0);
        }
        if let Some(minion) = roster.get_mut(released) {
            minion.cleanup();
        }

        state.prune_minion_contacts(&roster);

        assert_eq!(state.minion_contacts.len(), 1);
        assert!(state.minion_contacts.contains_key(&alive));
    }
}
