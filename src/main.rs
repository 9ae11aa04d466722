//! Crimson Vigil - Boss Encounter Simulator
//!
//! Runs a headless boss encounter and prints a summary.

use std::process::ExitCode;

use crimson_vigil::cli;
use crimson_vigil::headless::{run_headless_encounter, HeadlessEncounterConfig};

fn main() -> ExitCode {
    let args = cli::parse_args();

    let mut config = match &args.headless {
        Some(path) => match HeadlessEncounterConfig::load_from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => HeadlessEncounterConfig::default(),
    };

    // Command-line flags override the config file
    if let Some(output) = &args.output {
        config.output_path = Some(output.to_string_lossy().to_string());
    }
    if let Some(max_duration) = args.max_duration {
        config.max_duration_secs = max_duration;
    }
    if args.seed.is_some() {
        config.random_seed = args.seed;
    }

    match run_headless_encounter(config) {
        Ok(result) => {
            println!(
                "{}: {} after {:.1}s (phase {})",
                result.boss_name,
                result.outcome.name(),
                result.encounter_time,
                result.highest_phase
            );
            println!(
                "  Damage to boss: {:.0}, damage to player: {:.0}",
                result.damage_to_boss, result.damage_to_player
            );
            for (ability, count) in &result.abilities_used {
                println!("  {:<18} x{}", ability, count);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Encounter failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
