//! Transient effect trackers
//!
//! Everything a boss leaves in the world between ticks. Each tracker owns a
//! create → update → expire lifecycle; the boss core drives them and owns
//! their visuals.

pub mod beam;
pub mod motion;
pub mod pillar;
pub mod projectile;
pub mod shield;
pub mod zone;

pub use beam::{beam_hits, BeamSpec, BeamState};
pub use motion::{ChargeSpec, ChargeState, TeleportState, TeleportStep};
pub use pillar::{Pillar, PillarSpec, PillarStage};
pub use projectile::{volley_velocities, Projectile, ProjectileFate, VolleySpec};
pub use shield::ShieldState;
pub use zone::{Zone, ZoneSpec};
