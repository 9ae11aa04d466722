//! Integration tests for headless encounter execution
//!
//! These tests verify that:
//! - Headless encounters run to completion
//! - Encounter results are accessible programmatically
//! - Seeded RNG produces deterministic results

use std::path::PathBuf;

use crimson_vigil::boss::Arena;
use crimson_vigil::combat::log::{EncounterEventType, EncounterLog};
use crimson_vigil::headless::runner::build_headless_app;
use crimson_vigil::headless::{
    run_headless_encounter, EncounterOutcome, EncounterResult, HeadlessEncounterConfig,
};

/// Temp file for a test's encounter log
fn temp_log(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "crimson_vigil_{}_{}.json",
        name,
        std::process::id()
    ))
}

/// Helper to create a short encounter config
fn create_config(name: &str, seed: Option<u64>) -> HeadlessEncounterConfig {
    HeadlessEncounterConfig {
        spawn_delay_secs: 0.5,
        max_duration_secs: 30.0, // Short duration for tests
        random_seed: seed,
        output_path: Some(temp_log(name).to_string_lossy().to_string()),
        ..HeadlessEncounterConfig::default()
    }
}

fn run(config: HeadlessEncounterConfig) -> EncounterResult {
    run_headless_encounter(config).expect("encounter should run")
}

// =============================================================================
// Configuration Tests
// =============================================================================

#[test]
fn test_config_with_seed() {
    let config = create_config("config_seed", Some(42));

    assert_eq!(config.random_seed, Some(42));
    assert_eq!(config.boss, "ChurchPaladin");
    assert!(config.validate().is_ok());
}

#[test]
fn test_sample_config_file_loads() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/config/encounter.json");
    let config = HeadlessEncounterConfig::load_from_file(&path).expect("sample config is valid");

    assert_eq!(config.player_level, 3);
    assert_eq!(config.player_attack_tag.as_deref(), Some("holy"));
}

#[test]
fn test_invalid_config_is_rejected_before_running() {
    let config = HeadlessEncounterConfig {
        boss: "Dragon".to_string(),
        ..HeadlessEncounterConfig::default()
    };

    assert!(run_headless_encounter(config).is_err());
}

// =============================================================================
// Encounter Execution Tests
// =============================================================================

#[test]
fn test_boss_spawns_after_delay() {
    let config = create_config("spawn_delay", Some(1));
    let mut app = build_headless_app(&config).expect("valid config");
    app.finish();
    app.cleanup();

    // 20 frames is about a third of a second: too early
    for _ in 0..20 {
        app.update();
    }
    assert!(app.world().resource::<Arena>().boss.is_none());

    for _ in 0..30 {
        app.update();
    }
    assert!(app.world().resource::<Arena>().boss_alive());
    let log = app.world().resource::<EncounterLog>();
    assert_eq!(log.filter_by_type(EncounterEventType::BossSpawn).len(), 1);
}

#[test]
fn test_strong_player_defeats_boss() {
    let config = HeadlessEncounterConfig {
        player_dps: 2000.0,
        player_health: 10_000.0,
        ..create_config("boss_defeated", Some(5))
    };
    let output = config.output_path.clone();

    let result = run(config);

    assert_eq!(result.outcome, EncounterOutcome::BossDefeated);
    assert!(result.highest_phase >= 2, "boss should pass its first threshold");
    assert!(
        (result.damage_to_boss - 2400.0).abs() < 1.0,
        "logged damage should add up to the boss's health, got {}",
        result.damage_to_boss
    );

    let saved = std::fs::read_to_string(output.expect("output path set")).expect("log saved");
    let json: serde_json::Value = serde_json::from_str(&saved).expect("log is JSON");
    assert_eq!(json["metadata"]["outcome"], "BossDefeated");
}

#[test]
fn test_encounter_times_out() {
    let config = HeadlessEncounterConfig {
        player_dps: 0.0,
        player_health: 100_000.0,
        max_duration_secs: 5.0,
        ..create_config("timeout", Some(9))
    };

    let result = run(config);

    assert_eq!(result.outcome, EncounterOutcome::TimedOut);
    assert!(result.encounter_time >= 5.0);
    assert_eq!(result.damage_to_boss, 0.0);
    assert!(
        !result.abilities_used.is_empty(),
        "the boss should act within five seconds"
    );
}

#[test]
fn test_seeded_encounters_are_deterministic() {
    let first = run(create_config("determinism_a", Some(12345)));
    let second = run(create_config("determinism_b", Some(12345)));

    assert_eq!(first.outcome, second.outcome);
    assert_eq!(first.encounter_time, second.encounter_time);
    assert_eq!(first.highest_phase, second.highest_phase);
    assert_eq!(first.damage_to_boss, second.damage_to_boss);
    assert_eq!(first.damage_to_player, second.damage_to_player);
    assert_eq!(first.abilities_used, second.abilities_used);
    assert_eq!(first.random_seed, Some(12345));
}
