//! JSON configuration parsing for headless mode

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::boss::BossKind;

/// Headless encounter configuration loaded from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadlessEncounterConfig {
    /// Boss to fight (default: "ChurchPaladin")
    #[serde(default = "default_boss")]
    pub boss: String,
    /// Level the boss is scaled for (default: 1)
    #[serde(default = "default_player_level")]
    pub player_level: u32,
    /// Starting health of the scripted player (default: 100)
    #[serde(default = "default_player_health")]
    pub player_health: f32,
    /// Damage per second the scripted player deals to the boss (default: 40)
    #[serde(default = "default_player_dps")]
    pub player_dps: f32,
    /// Attack tag sent with every player hit, selects a boss damage modifier
    #[serde(default)]
    pub player_attack_tag: Option<String>,
    /// Seconds before the boss spawns (default: 1)
    #[serde(default = "default_spawn_delay")]
    pub spawn_delay_secs: f32,
    /// Maximum encounter duration in seconds (default: 300)
    #[serde(default = "default_max_duration")]
    pub max_duration_secs: f32,
    /// Random seed for deterministic encounter reproduction
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Custom output path for the encounter log (optional)
    #[serde(default)]
    pub output_path: Option<String>,
    /// Print bevy log output to stdout
    #[serde(default)]
    pub verbose: bool,
}

fn default_boss() -> String {
    BossKind::ChurchPaladin.name().to_string()
}

fn default_player_level() -> u32 {
    1
}

fn default_player_health() -> f32 {
    100.0
}

fn default_player_dps() -> f32 {
    40.0
}

fn default_spawn_delay() -> f32 {
    1.0
}

fn default_max_duration() -> f32 {
    300.0
}

impl Default for HeadlessEncounterConfig {
    fn default() -> Self {
        Self {
            boss: default_boss(),
            player_level: default_player_level(),
            player_health: default_player_health(),
            player_dps: default_player_dps(),
            player_attack_tag: None,
            spawn_delay_secs: default_spawn_delay(),
            max_duration_secs: default_max_duration(),
            random_seed: None,
            output_path: None,
            verbose: false,
        }
    }
}

impl HeadlessEncounterConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        Self::from_json(&contents)
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json(contents: &str) -> Result<Self, String> {
        let config: HeadlessEncounterConfig =
            serde_json::from_str(contents).map_err(|e| format!("Failed to parse JSON: {}", e))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        self.boss_kind()?;

        if self.player_level == 0 {
            return Err("player_level must be at least 1".to_string());
        }
        if self.player_health <= 0.0 {
            return Err("player_health must be positive".to_string());
        }
        if self.player_dps < 0.0 {
            return Err("player_dps must not be negative".to_string());
        }
        if self.spawn_delay_secs < 0.0 {
            return Err("spawn_delay_secs must not be negative".to_string());
        }
        if self.max_duration_secs <= 0.0 {
            return Err("max_duration_secs must be positive".to_string());
        }

        Ok(())
    }

    /// The configured boss as a [`BossKind`]
    pub fn boss_kind(&self) -> Result<BossKind, String> {
        BossKind::parse(&self.boss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_json_uses_defaults() {
        let config = HeadlessEncounterConfig::from_json("{}").expect("empty object is valid");
        assert_eq!(config.boss, "ChurchPaladin");
        assert_eq!(config.player_level, 1);
        assert_eq!(config.max_duration_secs, 300.0);
        assert!(config.random_seed.is_none());
        assert!(!config.verbose);
    }

    #[test]
    fn test_unknown_boss_is_rejected() {
        let err = HeadlessEncounterConfig::from_json(r#"{ "boss": "Lich" }"#).unwrap_err();
        assert!(err.contains("Lich"), "error should name the bad boss: {}", err);
    }

    #[test]
    fn test_bad_numbers_are_rejected() {
        for json in [
            r#"{ "player_level": 0 }"#,
            r#"{ "player_health": 0 }"#,
            r#"{ "player_dps": -1 }"#,
            r#"{ "max_duration_secs": 0 }"#,
            r#"{ "spawn_delay_secs": -2 }"#,
        ] {
            assert!(
                HeadlessEncounterConfig::from_json(json).is_err(),
                "{} should fail validation",
                json
            );
        }
    }

    #[test]
    fn test_malformed_json_reports_parse_error() {
        let err = HeadlessEncounterConfig::from_json("{ boss: ").unwrap_err();
        assert!(err.starts_with("Failed to parse JSON"));
    }
}
