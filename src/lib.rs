//! Crimson Vigil - Boss Encounter Engine
//!
//! Multi-phase bosses for a real-time survival action game: phase
//! transitions, cooldown-gated ability selection, deferred attacks and
//! transient hazards, damage with shields and modifiers, rewards and
//! cleanup. Runs inside a bevy app or headless.
//!
//! This library exposes the engine modules for testing and reuse.

pub mod boss;
pub mod cli;
pub mod combat;
pub mod headless;
pub mod world;

// Re-export commonly used types
pub use boss::{Boss, BossDefinitions, BossKind, BossPlugin};
pub use combat::events::BossEvent;
pub use combat::log::{EncounterEventType, EncounterLog};
pub use headless::HeadlessEncounterConfig;
