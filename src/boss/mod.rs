//! Boss encounters
//!
//! A boss is a [`Boss`]: a [`boss_core::BossCore`] with the shared state and
//! effect trackers, driven by a [`behavior::BossBehavior`] for its kind.
//! [`BossPlugin`] plugs bosses into a bevy app through the [`Arena`]
//! resource, which stands in for the game world (player, shared enemy
//! roster, active boss).
//!
//! ## System order (Update)
//! 1. `Spawn`: advance the arena clock, spawn a boss when the controller says so
//! 2. `Tick`: update the active boss against the player and the roster
//! 3. `Resolve`: forward boss events to the bevy event bus, retire defeated bosses

use bevy::prelude::*;

pub mod abilities;
pub mod behavior;
pub mod boss_core;
pub mod config;
pub mod cooldown;
pub mod effects;
pub mod entity;
pub mod paladin;
pub mod phase;
pub mod scheduler;
pub mod spawn;
pub mod visuals;

pub use behavior::BossBehavior;
pub use config::{BossConfigPlugin, BossDefinition, BossDefinitions, BossKind, RewardDefinition};
pub use entity::Boss;
pub use spawn::BossSpawnController;

use crate::combat::events::BossEventMessage;
use crate::world::{BossTarget, EnemyRoster, GameRng, Player, GAME_HEIGHT, GAME_WIDTH};
use visuals::{EffectSink, NullSink, VisualRecorder};

/// Starting health of the default player.
pub const DEFAULT_PLAYER_HEALTH: f32 = 100.0;

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum BossSystemPhase {
    Spawn,
    Tick,
    Resolve,
}

/// The slice of the game world bosses interact with.
#[derive(Resource)]
pub struct Arena {
    pub player: Player,
    /// Shared enemy collection; summoned minions are registered here
    pub enemies: EnemyRoster,
    pub boss: Option<Boss>,
    pub spawner: BossSpawnController,
    /// Milliseconds since the arena started
    pub elapsed_ms: f64,
    /// Scales newly spawned bosses
    pub player_level: u32,
    pub bosses_defeated: u32,
    pub rng: GameRng,
    /// When set, every boss sends its visual commands here
    pub visuals: Option<VisualRecorder>,
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(
            Player::new(Vec2::new(GAME_WIDTH * 0.5, GAME_HEIGHT * 0.75), DEFAULT_PLAYER_HEALTH),
            BossSpawnController::default(),
            1,
            GameRng::from_entropy(),
        )
    }
}

impl Arena {
    pub fn new(player: Player, spawner: BossSpawnController, player_level: u32, rng: GameRng) -> Self {
        Self {
            player,
            enemies: EnemyRoster::new(),
            boss: None,
            spawner,
            elapsed_ms: 0.0,
            player_level,
            bosses_defeated: 0,
            rng,
            visuals: None,
        }
    }

    pub fn boss_alive(&self) -> bool {
        self.boss.as_ref().is_some_and(|boss| boss.is_active())
    }

    /// Construct, initialize and install a boss of `kind`.
    pub fn spawn_boss(&mut self, kind: BossKind, definition: &BossDefinition) {
        let id = self.enemies.allocate_id();
        let rng = GameRng::from_seed(self.rng.next_seed());
        let sink: Box<dyn EffectSink> = match &self.visuals {
            Some(recorder) => Box::new(recorder.clone()),
            None => Box::new(NullSink),
        };
        let mut boss = Boss::new(id, kind, definition, self.player_level, sink, rng);
        boss.initialize();
        if let Some(mut previous) = self.boss.replace(boss) {
            previous.cleanup(Some(&mut self.enemies));
        }
    }

    /// Advance the active boss by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        let Some(boss) = self.boss.as_mut() else {
            return;
        };
        let player: &mut dyn BossTarget = &mut self.player;
        boss.update(dt, Some(player), Some(&mut self.enemies));
    }
}

/// Bevy plugin for boss encounters. Requires [`BossConfigPlugin`].
pub struct BossPlugin;

impl Plugin for BossPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<BossEventMessage>()
            .init_resource::<Arena>()
            .configure_sets(
                Update,
                (
                    BossSystemPhase::Spawn,
                    BossSystemPhase::Tick,
                    BossSystemPhase::Resolve,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (advance_arena_clock, spawn_bosses)
                    .chain()
                    .in_set(BossSystemPhase::Spawn),
            )
            .add_systems(Update, tick_boss.in_set(BossSystemPhase::Tick))
            .add_systems(
                Update,
                (forward_boss_events, retire_defeated_bosses)
                    .chain()
                    .in_set(BossSystemPhase::Resolve),
            );
    }
}

pub fn advance_arena_clock(time: Res<Time>, mut arena: ResMut<Arena>) {
    arena.elapsed_ms += f64::from(time.delta_secs()) * 1000.0;
}

pub fn spawn_bosses(definitions: Res<BossDefinitions>, mut arena: ResMut<Arena>) {
    let now = arena.elapsed_ms;
    let alive = arena.boss_alive();
    let Some(kind) = arena.spawner.poll(now, alive) else {
        return;
    };
    match definitions.get(kind) {
        Some(definition) => arena.spawn_boss(kind, definition),
        None => warn!("No definition for boss {}; spawn skipped", kind.name()),
    }
}

pub fn tick_boss(time: Res<Time>, mut arena: ResMut<Arena>) {
    arena.tick(time.delta_secs());
}

pub fn forward_boss_events(mut arena: ResMut<Arena>, mut writer: EventWriter<BossEventMessage>) {
    let Some(boss) = arena.boss.as_mut() else {
        return;
    };
    for event in boss.drain_events() {
        debug!("{} from {}", event.channel(), event.boss().name);
        writer.send(BossEventMessage(event));
    }
}

/// Clean up a defeated boss, start the next spawn countdown and drop
/// finished enemies from the shared roster.
pub fn retire_defeated_bosses(mut arena: ResMut<Arena>) {
    let arena = &mut *arena;
    if arena.boss.as_ref().is_some_and(|boss| !boss.is_active()) {
        if let Some(mut boss) = arena.boss.take() {
            boss.cleanup(Some(&mut arena.enemies));
            if boss.reward_dropped() {
                arena.bosses_defeated += 1;
            }
            arena.spawner.notify_defeated(arena.elapsed_ms);
        }
    }
    arena.enemies.remove_finished();
}
