//! Visual effect sink
//!
//! Boss logic never touches rendering. It describes what should appear on
//! screen as [`VisualCommand`]s and hands them to an [`EffectSink`]; the game
//! decides how (or whether) to draw them.

use bevy::prelude::*;
use std::sync::{Arc, Mutex};

/// Opaque id of something the boss put on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisualHandle(pub u64);

/// Persistent visuals, spawned once and despawned later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualKind {
    HealthBar,
    Projectile,
    ConsecrationZone,
    PillarWarning,
    PillarStrike,
    ShieldBubble,
    ChargeTrail,
    BeamTelegraph,
    Beam,
    NovaTelegraph,
    Nova,
    SummonCircle,
    ComboSwing,
}

/// One-shot flashes with no lifetime of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    /// Boss took damage
    Hit,
    /// Shield absorbed a hit
    Deflect,
    /// Phase transition highlight
    PhaseShift,
    /// Boss vanished at the start of a teleport
    TeleportOut,
    /// Boss reappeared at the destination
    TeleportIn,
}

#[derive(Debug, Clone, PartialEq)]
pub enum VisualCommand {
    Spawn {
        handle: VisualHandle,
        kind: VisualKind,
        position: Vec2,
        size: Vec2,
    },
    Move {
        handle: VisualHandle,
        position: Vec2,
    },
    /// Opacity in [0, 1]
    Fade {
        handle: VisualHandle,
        opacity: f32,
    },
    Despawn {
        handle: VisualHandle,
    },
    Flash {
        kind: FlashKind,
        position: Vec2,
    },
    HealthBar {
        handle: VisualHandle,
        fraction: f32,
        phase: u8,
    },
}

pub trait EffectSink: Send + Sync {
    fn emit(&mut self, command: VisualCommand);
}

/// Discards everything. Used when nothing is rendering (headless runs).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EffectSink for NullSink {
    fn emit(&mut self, _command: VisualCommand) {}
}

/// Records commands into a shared buffer. Clones share the same buffer, so a
/// test can keep one clone while the boss owns the other.
#[derive(Debug, Default, Clone)]
pub struct VisualRecorder {
    commands: Arc<Mutex<Vec<VisualCommand>>>,
}

impl VisualRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> Vec<VisualCommand> {
        self.commands
            .lock()
            .map(|commands| commands.clone())
            .unwrap_or_default()
    }

    pub fn count_flashes(&self, kind: FlashKind) -> usize {
        self.commands()
            .iter()
            .filter(|c| matches!(c, VisualCommand::Flash { kind: k, .. } if *k == kind))
            .count()
    }

    pub fn count_spawns(&self, kind: VisualKind) -> usize {
        self.commands()
            .iter()
            .filter(|c| matches!(c, VisualCommand::Spawn { kind: k, .. } if *k == kind))
            .count()
    }

    pub fn clear(&self) {
        if let Ok(mut commands) = self.commands.lock() {
            commands.clear();
        }
    }
}

impl EffectSink for VisualRecorder {
    fn emit(&mut self, command: VisualCommand) {
        if let Ok(mut commands) = self.commands.lock() {
            commands.push(command);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_clones_share_buffer() {
        let recorder = VisualRecorder::new();
        let mut sink: Box<dyn EffectSink> = Box::new(recorder.clone());
        sink.emit(VisualCommand::Flash {
            kind: FlashKind::Hit,
            position: Vec2::ZERO,
        });
        assert_eq!(recorder.count_flashes(FlashKind::Hit), 1);
        recorder.clear();
        assert!(recorder.commands().is_empty());
    }
}
