//! Encounter logging
//!
//! Records boss events and damage in both directions for post-encounter
//! analysis. Saved logs are pretty-printed JSON.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::combat::events::{AttackDetail, BossEvent};

/// Directory used by [`EncounterLog::save_to_file`] when no path is given.
pub const DEFAULT_LOG_DIR: &str = "encounter_logs";

/// A single entry in the encounter log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterLogEntry {
    /// Timestamp in encounter time (seconds since start)
    pub timestamp: f32,
    pub event_type: EncounterEventType,
    /// Ability involved, when there is one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ability: Option<String>,
    /// Damage amount for damage entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f32>,
    /// Deferred part of an ability that was already logged when it started
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub follow_up: bool,
    /// Human-readable description of the event
    pub message: String,
}

/// Types of encounter log events for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncounterEventType {
    BossSpawn,
    PhaseChange,
    /// Ability fired or one of its deferred parts resolved
    Attack,
    /// Wind-up began
    AttackStart,
    SpecialMove,
    BossDefeated,
    Reward,
    PlayerDeath,
    DamageToPlayer,
    DamageToBoss,
    /// Encounter start, end, timeouts
    EncounterEvent,
}

/// Summary written next to the entries when a log is saved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterMetadata {
    pub boss: String,
    pub outcome: String,
    pub duration_secs: f32,
    pub player_level: u32,
    pub highest_phase: u8,
    pub random_seed: Option<u64>,
}

#[derive(Serialize)]
struct SavedEncounter<'a> {
    metadata: &'a EncounterMetadata,
    total_damage_to_player: f32,
    total_damage_to_boss: f32,
    abilities_used: BTreeMap<String, u32>,
    entries: &'a [EncounterLogEntry],
}

/// The encounter log resource storing all events
#[derive(Resource, Default, Debug)]
pub struct EncounterLog {
    /// All log entries in chronological order
    pub entries: Vec<EncounterLogEntry>,
    /// Current encounter time in seconds
    pub match_time: f32,
}

impl EncounterLog {
    /// Clear the log for a new encounter
    pub fn clear(&mut self) {
        self.entries.clear();
        self.match_time = 0.0;
    }

    /// Add a new entry to the log
    pub fn log(&mut self, event_type: EncounterEventType, message: String) {
        self.push(event_type, None, None, message);
    }

    fn push(
        &mut self,
        event_type: EncounterEventType,
        ability: Option<String>,
        amount: Option<f32>,
        message: String,
    ) {
        self.entries.push(EncounterLogEntry {
            timestamp: self.match_time,
            event_type,
            ability,
            amount,
            follow_up: false,
            message,
        });
    }

    /// Translate a boss event into a log entry.
    pub fn record_boss_event(&mut self, event: &BossEvent) {
        let name = event.boss().name.clone();
        match event {
            BossEvent::Spawn { .. } => {
                self.log(EncounterEventType::BossSpawn, format!("{} appears", name));
            }
            BossEvent::PhaseChange { phase, .. } => {
                self.log(
                    EncounterEventType::PhaseChange,
                    format!("{} enters phase {}", name, phase),
                );
            }
            BossEvent::Attack {
                ability, detail, ..
            } => {
                let message = match detail {
                    None => format!("{} uses {}", name, ability),
                    Some(AttackDetail::Projectiles(count)) => {
                        format!("{} uses {} ({} projectiles)", name, ability, count)
                    }
                    Some(AttackDetail::Pillars(count)) => {
                        format!("{} uses {} ({} pillars)", name, ability, count)
                    }
                    Some(AttackDetail::ComboHit(hit)) => {
                        format!("{}'s {} hit {} lands", name, ability, hit)
                    }
                    Some(AttackDetail::Minions(count)) => {
                        format!("{}'s {} calls {} minions", name, ability, count)
                    }
                    Some(AttackDetail::Connected(true)) => format!("{}'s {} hits", name, ability),
                    Some(AttackDetail::Connected(false)) => {
                        format!("{}'s {} misses", name, ability)
                    }
                };
                self.push(EncounterEventType::Attack, Some(ability.clone()), None, message);
                if let Some(entry) = self.entries.last_mut() {
                    entry.follow_up = detail.is_some_and(|d| d.is_resolution());
                }
            }
            BossEvent::AttackStart { ability, .. } => {
                self.push(
                    EncounterEventType::AttackStart,
                    Some(ability.clone()),
                    None,
                    format!("{} begins casting {}", name, ability),
                );
            }
            BossEvent::SpecialMove { name: ability, .. } => {
                self.push(
                    EncounterEventType::SpecialMove,
                    Some(ability.clone()),
                    None,
                    format!("{} performs {}", name, ability),
                );
            }
            BossEvent::Defeated { .. } => {
                self.log(
                    EncounterEventType::BossDefeated,
                    format!("{} has been defeated", name),
                );
            }
            BossEvent::Reward { reward, .. } => {
                self.log(
                    EncounterEventType::Reward,
                    format!(
                        "{} drops {:?} reward {} ({:.1}s)",
                        name,
                        reward.reward_type,
                        reward.power_up,
                        reward.duration_ms / 1000.0
                    ),
                );
            }
            BossEvent::PlayerDefeated { ability, .. } => {
                self.push(
                    EncounterEventType::PlayerDeath,
                    Some(ability.clone()),
                    None,
                    format!("Player killed by {}'s {}", name, ability),
                );
            }
        }
    }

    pub fn log_damage_to_player(&mut self, amount: f32, source: Option<&str>) {
        let message = match source {
            Some(source) => format!("Player takes {:.1} damage from {}", amount, source),
            None => format!("Player takes {:.1} damage", amount),
        };
        self.push(
            EncounterEventType::DamageToPlayer,
            source.map(str::to_string),
            Some(amount),
            message,
        );
    }

    pub fn log_damage_to_boss(&mut self, boss: &str, amount: f32, attack_tag: Option<&str>) {
        let message = match attack_tag {
            Some(tag) => format!("{} takes {:.1} damage ({})", boss, amount, tag),
            None => format!("{} takes {:.1} damage", boss, amount),
        };
        self.push(
            EncounterEventType::DamageToBoss,
            attack_tag.map(str::to_string),
            Some(amount),
            message,
        );
    }

    /// Get entries filtered by event type
    pub fn filter_by_type(&self, event_type: EncounterEventType) -> Vec<&EncounterLogEntry> {
        self.entries
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Get the last N entries
    pub fn recent(&self, count: usize) -> Vec<&EncounterLogEntry> {
        self.entries.iter().rev().take(count).rev().collect()
    }

    /// How many times each ability was started. Follow-ups of an ability
    /// (combo hits, beam and summon resolutions) are not counted again.
    pub fn abilities_used(&self) -> BTreeMap<String, u32> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            let started = match entry.event_type {
                EncounterEventType::AttackStart | EncounterEventType::SpecialMove => true,
                EncounterEventType::Attack => !entry.follow_up,
                _ => false,
            };
            if !started {
                continue;
            }
            if let Some(ability) = &entry.ability {
                *counts.entry(ability.clone()).or_insert(0) += 1;
            }
        }
        counts
    }

    pub fn total_damage_to_player(&self) -> f32 {
        self.sum_amounts(EncounterEventType::DamageToPlayer)
    }

    pub fn total_damage_to_boss(&self) -> f32 {
        self.sum_amounts(EncounterEventType::DamageToBoss)
    }

    fn sum_amounts(&self, event_type: EncounterEventType) -> f32 {
        self.entries
            .iter()
            .filter(|e| e.event_type == event_type)
            .filter_map(|e| e.amount)
            .sum()
    }

    /// Save the log as pretty JSON. Returns the path written.
    ///
    /// Without `output_path` the file goes to [`DEFAULT_LOG_DIR`] with a
    /// timestamped name.
    pub fn save_to_file(
        &self,
        metadata: &EncounterMetadata,
        output_path: Option<&str>,
    ) -> Result<String, String> {
        let path = match output_path {
            Some(path) => path.to_string(),
            None => {
                let stamp = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map(|d| d.as_secs())
                    .unwrap_or_default();
                format!("{}/encounter_{}.json", DEFAULT_LOG_DIR, stamp)
            }
        };

        if let Some(parent) = Path::new(&path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
            }
        }

        let saved = SavedEncounter {
            metadata,
            total_damage_to_player: self.total_damage_to_player(),
            total_damage_to_boss: self.total_damage_to_boss(),
            abilities_used: self.abilities_used(),
            entries: &self.entries,
        };
        let json = serde_json::to_string_pretty(&saved)
            .map_err(|e| format!("Failed to serialize encounter log: {}", e))?;
        std::fs::write(&path, json).map_err(|e| format!("Failed to write {}: {}", path, e))?;
        Ok(path)
    }
}
