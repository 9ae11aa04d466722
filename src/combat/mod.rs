//! Combat reporting
//!
//! Boss events and the encounter log that records them:
//! - [`events`]: what bosses announce to the rest of the game
//! - [`log`]: timestamped record of an encounter, saved as JSON

use bevy::prelude::*;

pub mod events;
pub mod log;

use crate::boss::BossSystemPhase;
use crate::combat::events::BossEventMessage;
use crate::combat::log::EncounterLog;

/// Plugin that records every boss event into the [`EncounterLog`].
pub struct EncounterLogPlugin;

impl Plugin for EncounterLogPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EncounterLog>().add_systems(
            Update,
            (track_log_time, record_boss_events)
                .chain()
                .after(BossSystemPhase::Resolve),
        );
    }
}

fn track_log_time(time: Res<Time>, mut log: ResMut<EncounterLog>) {
    log.match_time += time.delta_secs();
}

fn record_boss_events(mut events: EventReader<BossEventMessage>, mut log: ResMut<EncounterLog>) {
    for BossEventMessage(event) in events.read() {
        log.record_boss_event(event);
    }
}
