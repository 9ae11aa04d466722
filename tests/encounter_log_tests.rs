//! Unit tests for encounter log formatting, queries and persistence
//!
//! These tests verify that the EncounterLog correctly:
//! - Formats boss events into readable messages
//! - Counts ability activations without double counting follow-ups
//! - Totals damage in both directions
//! - Saves itself as JSON

use regex::Regex;

use crimson_vigil::boss::{BossDefinitions, BossKind};
use crimson_vigil::combat::events::{AttackDetail, BossEvent, BossRef};
use crimson_vigil::combat::log::{EncounterEventType, EncounterLog, EncounterMetadata};

fn paladin() -> BossRef {
    BossRef {
        id: 1,
        kind: BossKind::ChurchPaladin,
        name: "Church Paladin".to_string(),
    }
}

fn attack(ability: &str, detail: Option<AttackDetail>) -> BossEvent {
    BossEvent::Attack {
        boss: paladin(),
        ability: ability.to_string(),
        detail,
    }
}

fn last_message(log: &EncounterLog) -> &str {
    log.entries
        .last()
        .map(|entry| entry.message.as_str())
        .unwrap_or_default()
}

// =============================================================================
// Message Format Tests
// =============================================================================

#[test]
fn test_boss_lifecycle_messages() {
    let mut log = EncounterLog::default();

    log.record_boss_event(&BossEvent::Spawn { boss: paladin() });
    assert_eq!(last_message(&log), "Church Paladin appears");

    log.record_boss_event(&BossEvent::PhaseChange {
        boss: paladin(),
        phase: 2,
    });
    assert_eq!(last_message(&log), "Church Paladin enters phase 2");

    log.record_boss_event(&BossEvent::Defeated { boss: paladin() });
    assert_eq!(last_message(&log), "Church Paladin has been defeated");
}

#[test]
fn test_attack_messages_include_details() {
    let mut log = EncounterLog::default();
    let volley = Regex::new(r"^Church Paladin uses Divine Volley \((\d+) projectiles\)$").unwrap();
    let combo = Regex::new(r"^Church Paladin's Crusader Combo hit (\d) lands$").unwrap();
    let summon = Regex::new(r"^Church Paladin's Summon Crusaders calls (\d+) minions$").unwrap();

    log.record_boss_event(&attack("Divine Volley", Some(AttackDetail::Projectiles(5))));
    let caps = volley.captures(last_message(&log)).expect("volley message");
    assert_eq!(&caps[1], "5");

    log.record_boss_event(&attack("Crusader Combo", Some(AttackDetail::ComboHit(2))));
    let caps = combo.captures(last_message(&log)).expect("combo message");
    assert_eq!(&caps[1], "2");

    log.record_boss_event(&attack("Summon Crusaders", Some(AttackDetail::Minions(3))));
    let caps = summon.captures(last_message(&log)).expect("summon message");
    assert_eq!(&caps[1], "3");

    log.record_boss_event(&attack("Judgment Beam", Some(AttackDetail::Connected(false))));
    assert_eq!(last_message(&log), "Church Paladin's Judgment Beam misses");
}

#[test]
fn test_wind_up_and_movement_messages() {
    let mut log = EncounterLog::default();

    log.record_boss_event(&BossEvent::AttackStart {
        boss: paladin(),
        ability: "Holy Nova".to_string(),
    });
    assert_eq!(last_message(&log), "Church Paladin begins casting Holy Nova");

    log.record_boss_event(&BossEvent::SpecialMove {
        boss: paladin(),
        name: "Holy Charge".to_string(),
    });
    assert_eq!(last_message(&log), "Church Paladin performs Holy Charge");
}

#[test]
fn test_reward_message() {
    let mut log = EncounterLog::default();
    let reward = BossDefinitions::builtin()
        .expect("builtin definitions parse")
        .get_unchecked(BossKind::ChurchPaladin)
        .reward
        .clone();

    log.record_boss_event(&BossEvent::Reward {
        boss: paladin(),
        boss_tag: "church_paladin".to_string(),
        reward,
    });

    let pattern = Regex::new(r"^Church Paladin drops PowerUp reward holy_aura \((\d+\.\d)s\)$").unwrap();
    let caps = pattern.captures(last_message(&log)).expect("reward message");
    assert_eq!(&caps[1], "30.0");
}

#[test]
fn test_damage_messages() {
    let mut log = EncounterLog::default();

    log.log_damage_to_player(12.0, Some("Church Paladin"));
    assert_eq!(last_message(&log), "Player takes 12.0 damage from Church Paladin");

    log.log_damage_to_boss("Church Paladin", 35.0, Some("holy"));
    assert_eq!(last_message(&log), "Church Paladin takes 35.0 damage (holy)");

    log.record_boss_event(&BossEvent::PlayerDefeated {
        boss: paladin(),
        ability: "Judgment Beam".to_string(),
    });
    assert_eq!(
        last_message(&log),
        "Player killed by Church Paladin's Judgment Beam"
    );
}

// =============================================================================
// Query Tests
// =============================================================================

#[test]
fn test_abilities_used_skips_follow_ups() {
    let mut log = EncounterLog::default();

    log.record_boss_event(&attack("Crusader Combo", None));
    log.record_boss_event(&attack("Crusader Combo", Some(AttackDetail::ComboHit(1))));
    log.record_boss_event(&attack("Crusader Combo", Some(AttackDetail::ComboHit(2))));
    log.record_boss_event(&BossEvent::AttackStart {
        boss: paladin(),
        ability: "Judgment Beam".to_string(),
    });
    log.record_boss_event(&attack("Judgment Beam", Some(AttackDetail::Connected(true))));
    log.record_boss_event(&attack("Divine Volley", Some(AttackDetail::Projectiles(5))));
    log.record_boss_event(&attack("Divine Volley", Some(AttackDetail::Projectiles(5))));

    let used = log.abilities_used();
    assert_eq!(used.get("Crusader Combo"), Some(&1));
    assert_eq!(used.get("Judgment Beam"), Some(&1));
    assert_eq!(used.get("Divine Volley"), Some(&2));
    assert_eq!(used.len(), 3);
}

#[test]
fn test_damage_totals_and_filters() {
    let mut log = EncounterLog::default();
    log.log_damage_to_player(10.0, Some("Church Paladin"));
    log.log_damage_to_player(5.5, None);
    log.log_damage_to_boss("Church Paladin", 100.0, None);

    assert_eq!(log.total_damage_to_player(), 15.5);
    assert_eq!(log.total_damage_to_boss(), 100.0);
    assert_eq!(log.filter_by_type(EncounterEventType::DamageToPlayer).len(), 2);
    assert_eq!(log.recent(1)[0].event_type, EncounterEventType::DamageToBoss);
}

#[test]
fn test_entries_carry_match_time() {
    let mut log = EncounterLog::default();
    log.match_time = 12.5;
    log.record_boss_event(&BossEvent::Spawn { boss: paladin() });

    assert_eq!(log.entries[0].timestamp, 12.5);

    log.clear();
    assert!(log.entries.is_empty());
    assert_eq!(log.match_time, 0.0);
}

// =============================================================================
// Persistence Tests
// =============================================================================

#[test]
fn test_save_to_file_writes_pretty_json() {
    let mut log = EncounterLog::default();
    log.record_boss_event(&BossEvent::Spawn { boss: paladin() });
    log.record_boss_event(&attack("Divine Volley", Some(AttackDetail::Projectiles(5))));
    log.log_damage_to_boss("Church Paladin", 40.0, Some("holy"));

    let dir = std::env::temp_dir().join(format!("crimson_vigil_log_{}", std::process::id()));
    let path = dir.join("nested").join("encounter.json");
    let metadata = EncounterMetadata {
        boss: "Church Paladin".to_string(),
        outcome: "TimedOut".to_string(),
        duration_secs: 30.0,
        player_level: 1,
        highest_phase: 1,
        random_seed: Some(3),
    };

    let written = log
        .save_to_file(&metadata, Some(&path.to_string_lossy()))
        .expect("log saves");
    let contents = std::fs::read_to_string(&written).expect("saved file readable");
    let json: serde_json::Value = serde_json::from_str(&contents).expect("valid JSON");

    assert!(contents.contains('\n'), "output is pretty printed");
    assert_eq!(json["metadata"]["random_seed"], 3);
    assert_eq!(json["total_damage_to_boss"], 40.0);
    assert_eq!(json["abilities_used"]["Divine Volley"], 1);
    assert_eq!(json["entries"].as_array().map(|e| e.len()), Some(3));

    let _ = std::fs::remove_dir_all(dir);
}
