//! Boss behavior dispatch
//!
//! Each boss kind supplies a behavior that makes decisions for the shared
//! [`BossCore`]. New kinds add a variant here and a module next to
//! `paladin.rs`.

use crate::boss::boss_core::BossCore;
use crate::boss::config::{BossKind, RewardDefinition};
use crate::boss::paladin::ChurchPaladin;
use crate::world::BossTarget;

#[derive(Debug, Clone)]
pub enum BossBehavior {
    ChurchPaladin(ChurchPaladin),
}

impl BossBehavior {
    pub fn for_kind(kind: BossKind) -> Self {
        match kind {
            BossKind::ChurchPaladin => BossBehavior::ChurchPaladin(ChurchPaladin::new()),
        }
    }

    /// Movement and ability selection for one tick.
    pub fn on_update(&mut self, core: &mut BossCore, dt: f32, player: &mut (dyn BossTarget + '_)) {
        match self {
            BossBehavior::ChurchPaladin(paladin) => paladin.on_update(core, dt, player),
        }
    }

    /// Called once for every phase the boss enters.
    pub fn on_phase_change(&mut self, core: &mut BossCore, phase: u8) {
        match self {
            BossBehavior::ChurchPaladin(paladin) => paladin.on_phase_change(core, phase),
        }
    }

    /// Called once when the boss dies. Returns the reward to announce, if any.
    pub fn on_defeated(&mut self, core: &mut BossCore) -> Option<RewardDefinition> {
        match self {
            BossBehavior::ChurchPaladin(paladin) => paladin.on_defeated(core),
        }
    }
}
