//! Headless mode for automated testing
//!
//! Runs a boss encounter without any graphical output: a scripted player
//! fights the configured boss at a fixed timestep and the encounter log is
//! saved as JSON.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release -- --headless assets/config/encounter.json --seed 7
//! ```
//!
//! ## JSON Configuration
//!
//! ```json
//! {
//!   "boss": "ChurchPaladin",
//!   "player_level": 3,
//!   "player_dps": 45,
//!   "player_attack_tag": "holy",
//!   "max_duration_secs": 180
//! }
//! ```

pub mod config;
pub mod runner;

pub use config::HeadlessEncounterConfig;
pub use runner::{run_headless_encounter, EncounterOutcome, EncounterResult};
