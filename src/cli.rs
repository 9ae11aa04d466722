//! Command-line interface for Crimson Vigil

use clap::Parser;
use std::path::PathBuf;

/// Boss encounter simulator
#[derive(Parser, Debug)]
#[command(name = "crimson-vigil")]
#[command(about = "Boss encounter simulator")]
#[command(version)]
pub struct Args {
    /// Run the encounter described by this JSON config file
    /// (defaults are used when omitted)
    #[arg(long, value_name = "CONFIG_FILE")]
    pub headless: Option<PathBuf>,

    /// Output path for the encounter log
    #[arg(long, value_name = "OUTPUT_PATH")]
    pub output: Option<PathBuf>,

    /// Maximum encounter duration in seconds, overrides the config file
    #[arg(long, value_name = "SECS")]
    pub max_duration: Option<f32>,

    /// Random seed for a reproducible encounter, overrides the config file
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn parse_args() -> Args {
    Args::parse()
}
