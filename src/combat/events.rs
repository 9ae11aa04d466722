//! Boss events
//!
//! Everything a boss wants the rest of the game to know about (UI, audio,
//! progression) is published as a [`BossEvent`]. Bosses queue them while
//! ticking; the game loop drains the queue and forwards them to the bus.

use bevy::prelude::*;

use crate::boss::config::{BossKind, RewardDefinition};
use crate::world::EnemyId;

/// Identifies the boss that raised an event.
#[derive(Debug, Clone, PartialEq)]
pub struct BossRef {
    pub id: EnemyId,
    pub kind: BossKind,
    pub name: String,
}

/// Extra payload attached to an attack event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttackDetail {
    /// Number of projectiles in a volley
    Projectiles(u8),
    /// Number of pillars telegraphed
    Pillars(u8),
    /// Which hit of a combo landed (1-based)
    ComboHit(u8),
    /// Number of minions that answered a summon
    Minions(u8),
    /// Whether a beam or nova connected
    Connected(bool),
}

impl AttackDetail {
    /// True for the follow-up of an ability that was already reported when it started.
    pub fn is_resolution(&self) -> bool {
        matches!(
            self,
            AttackDetail::ComboHit(_) | AttackDetail::Minions(_) | AttackDetail::Connected(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BossEvent {
    /// Boss entered the arena
    Spawn { boss: BossRef },
    /// Health crossed a threshold
    PhaseChange { boss: BossRef, phase: u8 },
    /// An ability fired (or a deferred part of it resolved)
    Attack {
        boss: BossRef,
        ability: String,
        detail: Option<AttackDetail>,
    },
    /// A wind-up began; the ability resolves later
    AttackStart { boss: BossRef, ability: String },
    /// Movement ability (charge, teleport)
    SpecialMove { boss: BossRef, name: String },
    /// Health reached zero
    Defeated { boss: BossRef },
    /// Rewards for the progression system to apply
    Reward {
        boss: BossRef,
        boss_tag: String,
        reward: RewardDefinition,
    },
    /// A boss ability killed a player that has no death routine of its own
    PlayerDefeated { boss: BossRef, ability: String },
}

impl BossEvent {
    pub fn boss(&self) -> &BossRef {
        match self {
            BossEvent::Spawn { boss }
            | BossEvent::PhaseChange { boss, .. }
            | BossEvent::Attack { boss, .. }
            | BossEvent::AttackStart { boss, .. }
            | BossEvent::SpecialMove { boss, .. }
            | BossEvent::Defeated { boss }
            | BossEvent::Reward { boss, .. }
            | BossEvent::PlayerDefeated { boss, .. } => boss,
        }
    }

    /// Bus channel name, matching the names UI and audio listeners subscribe to.
    pub fn channel(&self) -> &'static str {
        match self {
            BossEvent::Spawn { .. } => "BOSS_SPAWN",
            BossEvent::PhaseChange { .. } => "BOSS_PHASE_CHANGE",
            BossEvent::Attack { .. } => "BOSS_ATTACK",
            BossEvent::AttackStart { .. } => "BOSS_ATTACK_START",
            BossEvent::SpecialMove { .. } => "BOSS_SPECIAL_MOVE",
            BossEvent::Defeated { .. } => "BOSS_DEFEATED",
            BossEvent::Reward { .. } => "BOSS_REWARD",
            BossEvent::PlayerDefeated { .. } => "PLAYER_DEATH",
        }
    }
}

/// Bevy wrapper so boss events travel on the regular event bus.
#[derive(Event, Debug, Clone)]
pub struct BossEventMessage(pub BossEvent);
