//! Data-Driven Boss Configuration
//!
//! Boss tuning lives in `assets/config/bosses.ron` instead of being hardcoded.
//! The file is embedded at compile time for [`BossDefinitions::builtin`] and can
//! also be loaded from disk with [`load_boss_definitions`] for balance work.
//!
//! ## Usage
//! ```ignore
//! fn my_system(bosses: Res<BossDefinitions>) {
//!     let def = bosses.get_unchecked(BossKind::ChurchPaladin);
//!     println!("Paladin health: {}", def.base_health);
//! }
//! ```

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

const BUILTIN_BOSSES: &str = include_str!("../../assets/config/bosses.ron");

/// Every boss type the engine knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BossKind {
    ChurchPaladin,
}

impl BossKind {
    pub const ALL: [BossKind; 1] = [BossKind::ChurchPaladin];

    pub fn name(&self) -> &'static str {
        match self {
            BossKind::ChurchPaladin => "ChurchPaladin",
        }
    }

    /// Parse a kind from its config/CLI name.
    pub fn parse(name: &str) -> Result<Self, String> {
        match name {
            "ChurchPaladin" | "Church Paladin" => Ok(BossKind::ChurchPaladin),
            _ => Err(format!(
                "Unknown boss: '{}'. Valid bosses: ChurchPaladin",
                name
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RewardType {
    /// Temporary power-up for `duration_ms`
    PowerUp,
    /// Permanent skill points only
    SkillPoints,
}

/// What the progression system grants when a boss falls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardDefinition {
    pub reward_type: RewardType,
    /// Power-up duration in milliseconds
    pub duration_ms: f64,
    /// Power-up identifier understood by the progression system
    pub power_up: String,
    #[serde(default)]
    pub experience: u32,
    #[serde(default)]
    pub skill_points: u32,
}

/// How stats grow with the player's level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LevelScaling {
    pub health_per_level: f32,
    pub damage_per_level: f32,
    pub size_per_level: f32,
    /// Upper bound on the size multiplier
    pub size_cap: f32,
}

impl LevelScaling {
    fn levels_above_first(level: u32) -> f32 {
        level.saturating_sub(1) as f32
    }

    pub fn health_multiplier(&self, level: u32) -> f32 {
        1.0 + self.health_per_level * Self::levels_above_first(level)
    }

    pub fn damage_multiplier(&self, level: u32) -> f32 {
        1.0 + self.damage_per_level * Self::levels_above_first(level)
    }

    pub fn size_multiplier(&self, level: u32) -> f32 {
        (1.0 + self.size_per_level * Self::levels_above_first(level)).min(self.size_cap)
    }
}

/// Minions a boss can call in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinionDefinition {
    pub name: String,
    pub health: f32,
    pub damage: f32,
    pub speed: f32,
    pub size: f32,
}

/// Complete tuning for one boss kind, loaded from RON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossDefinition {
    /// Display name
    pub name: String,
    /// Tag sent with reward events
    pub tag: String,
    pub base_health: f32,
    pub base_damage: f32,
    /// Movement speed in pixels per second
    pub speed: f32,
    /// Body width and height in pixels at level 1
    pub size: f32,
    pub max_phases: u8,
    /// Descending health fractions, one per phase boundary
    pub phase_thresholds: Vec<f32>,
    /// Incoming damage multiplier per attack-type tag
    #[serde(default)]
    pub damage_modifiers: HashMap<String, f32>,
    pub scaling: LevelScaling,
    pub minion: MinionDefinition,
    pub reward: RewardDefinition,
}

impl BossDefinition {
    /// Check internal consistency. Returns every problem found, joined.
    pub fn validate(&self) -> Result<(), String> {
        let mut problems = Vec::new();

        if self.base_health <= 0.0 {
            problems.push(format!("{}: base_health must be positive", self.name));
        }
        if self.size <= 0.0 {
            problems.push(format!("{}: size must be positive", self.name));
        }
        if self.max_phases == 0 {
            problems.push(format!("{}: max_phases must be at least 1", self.name));
        }
        if self.phase_thresholds.len() + 1 != usize::from(self.max_phases) {
            problems.push(format!(
                "{}: expected {} phase thresholds for {} phases, found {}",
                self.name,
                self.max_phases.saturating_sub(1),
                self.max_phases,
                self.phase_thresholds.len()
            ));
        }
        if self
            .phase_thresholds
            .iter()
            .any(|t| !(*t > 0.0 && *t < 1.0))
        {
            problems.push(format!("{}: phase thresholds must lie in (0, 1)", self.name));
        }
        if self.phase_thresholds.windows(2).any(|pair| pair[0] <= pair[1]) {
            problems.push(format!(
                "{}: phase thresholds must be strictly descending",
                self.name
            ));
        }
        if self.damage_modifiers.values().any(|m| *m < 0.0) {
            problems.push(format!("{}: damage modifiers cannot be negative", self.name));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems.join("; "))
        }
    }
}

/// Root structure for the bosses.ron file
#[derive(Debug, Serialize, Deserialize)]
pub struct BossesConfig {
    pub bosses: HashMap<BossKind, BossDefinition>,
}

/// Resource containing all boss definitions.
#[derive(Resource, Debug, Clone)]
pub struct BossDefinitions {
    definitions: HashMap<BossKind, BossDefinition>,
}

impl BossDefinitions {
    pub fn new(config: BossesConfig) -> Self {
        Self {
            definitions: config.bosses,
        }
    }

    /// Definitions embedded in the binary.
    pub fn builtin() -> Result<Self, String> {
        parse_boss_definitions(BUILTIN_BOSSES, "builtin bosses.ron")
    }

    pub fn get(&self, kind: BossKind) -> Option<&BossDefinition> {
        self.definitions.get(&kind)
    }

    /// Get the definition for a boss kind, panicking if not found.
    /// Use this when you know the kind must exist (validated at startup).
    pub fn get_unchecked(&self, kind: BossKind) -> &BossDefinition {
        self.definitions
            .get(&kind)
            .unwrap_or_else(|| panic!("Boss {:?} not found in definitions", kind))
    }

    /// Check that every kind is defined and every definition is consistent.
    pub fn validate(&self) -> Result<(), String> {
        let missing: Vec<BossKind> = BossKind::ALL
            .into_iter()
            .filter(|kind| !self.definitions.contains_key(kind))
            .collect();
        if !missing.is_empty() {
            return Err(format!("Missing boss definitions: {:?}", missing));
        }
        for definition in self.definitions.values() {
            definition.validate()?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

fn parse_boss_definitions(contents: &str, origin: &str) -> Result<BossDefinitions, String> {
    let config: BossesConfig =
        ron::from_str(contents).map_err(|e| format!("Failed to parse {}: {}", origin, e))?;

    let definitions = BossDefinitions::new(config);
    definitions.validate()?;
    Ok(definitions)
}

/// Load boss definitions from a RON file on disk.
pub fn load_boss_definitions(path: &Path) -> Result<BossDefinitions, String> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    let definitions = parse_boss_definitions(&contents, &path.display().to_string())?;
    info!(
        "Loaded {} boss definitions from {}",
        definitions.len(),
        path.display()
    );
    Ok(definitions)
}

/// Bevy plugin for boss configuration loading
pub struct BossConfigPlugin;

impl Plugin for BossConfigPlugin {
    fn build(&self, app: &mut App) {
        match BossDefinitions::builtin() {
            Ok(definitions) => {
                app.insert_resource(definitions);
            }
            Err(e) => {
                // The embedded file is part of the build; a bad one is a programming error
                panic!("Failed to load boss definitions: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paladin() -> BossDefinition {
        BossDefinitions::builtin()
            .expect("builtin definitions parse")
            .get_unchecked(BossKind::ChurchPaladin)
            .clone()
    }

    #[test]
    fn test_builtin_definitions_are_valid() {
        let definitions = BossDefinitions::builtin().expect("builtin definitions parse");
        assert!(definitions.validate().is_ok());
        assert_eq!(definitions.len(), BossKind::ALL.len());
    }

    #[test]
    fn test_paladin_has_three_phases() {
        let def = paladin();
        assert_eq!(def.max_phases, 3);
        assert_eq!(def.phase_thresholds, vec![0.7, 0.4]);
    }

    #[test]
    fn test_threshold_count_must_match_phases() {
        let mut def = paladin();
        def.phase_thresholds = vec![0.5];
        let err = def.validate().unwrap_err();
        assert!(err.contains("expected 2 phase thresholds"), "{}", err);
    }

    #[test]
    fn test_thresholds_must_descend() {
        let mut def = paladin();
        def.phase_thresholds = vec![0.4, 0.7];
        assert!(def.validate().unwrap_err().contains("strictly descending"));
    }

    #[test]
    fn test_thresholds_must_lie_inside_unit_interval() {
        let mut def = paladin();
        def.phase_thresholds = vec![1.2, 0.4];
        assert!(def.validate().unwrap_err().contains("(0, 1)"));

        def.phase_thresholds = vec![0.7, 0.0];
        assert!(def.validate().unwrap_err().contains("(0, 1)"));
    }

    #[test]
    fn test_health_and_size_must_be_positive() {
        let mut def = paladin();
        def.base_health = 0.0;
        assert!(def.validate().unwrap_err().contains("base_health must be positive"));

        let mut def = paladin();
        def.size = -4.0;
        assert!(def.validate().unwrap_err().contains("size must be positive"));
    }

    #[test]
    fn test_missing_kind_is_rejected() {
        let definitions = BossDefinitions::new(BossesConfig {
            bosses: HashMap::new(),
        });
        let err = definitions.validate().unwrap_err();
        assert!(err.contains("Missing boss definitions"), "{}", err);
        assert!(err.contains("ChurchPaladin"), "{}", err);
    }

    #[test]
    fn test_load_boss_definitions_from_disk() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/config/bosses.ron");
        let definitions = load_boss_definitions(&path).expect("shipped bosses.ron loads");
        assert_eq!(
            definitions.get(BossKind::ChurchPaladin).map(|d| d.max_phases),
            Some(3)
        );

        let missing = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/config/nope.ron");
        let err = load_boss_definitions(&missing).unwrap_err();
        assert!(err.starts_with("Failed to read"), "{}", err);
    }

    #[test]
    fn test_load_boss_definitions_rejects_incomplete_file() {
        let path = std::env::temp_dir().join(format!("crimson_vigil_bosses_{}.ron", std::process::id()));
        std::fs::write(&path, "(bosses: {})").expect("temp file writable");

        let err = load_boss_definitions(&path).unwrap_err();
        assert!(err.contains("Missing boss definitions"), "{}", err);

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_level_scaling() {
        let scaling = LevelScaling {
            health_per_level: 0.1,
            damage_per_level: 0.05,
            size_per_level: 0.1,
            size_cap: 1.2,
        };
        assert_eq!(scaling.health_multiplier(1), 1.0);
        assert!((scaling.health_multiplier(6) - 1.5).abs() < 1e-6);
        assert!((scaling.damage_multiplier(3) - 1.1).abs() < 1e-6);
        assert_eq!(scaling.size_multiplier(10), 1.2);
        // Level 0 is treated like level 1
        assert_eq!(scaling.health_multiplier(0), 1.0);
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!(BossKind::parse("ChurchPaladin"), Ok(BossKind::ChurchPaladin));
        assert!(BossKind::parse("Lich").is_err());
    }
}
