use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::resources::InputScript;
use common::level::LevelData;

// ============================================================================
// CLI Argument Parsing
// ============================================================================

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Headless platformer simulation", long_about = None)]
pub struct Args {
    // Level JSON file; the built-in first level when omitted
    #[arg(short, long)]
    pub level: Option<PathBuf>,

    // Number of 60 Hz steps to run at most
    #[arg(short, long, default_value_t = 3600)]
    pub ticks: u64,

    // RNG seed; the same seed and input replay the same run
    #[arg(short, long, default_value_t = 1)]
    pub seed: u64,

    // Pace steps to wall-clock time instead of running flat out
    #[arg(long, default_value_t = false)]
    pub realtime: bool,

    // JSON input script to replay
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    // Leave monsters out of the level
    #[arg(long, default_value_t = false)]
    pub no_monsters: bool,
}

// ============================================================================
// Simulation Configuration
// ============================================================================

#[derive(Debug, Clone)]
pub struct SimConfig {
    pub level: LevelData,
    pub ticks: u64,
    pub seed: u64,
    pub realtime: bool,
    pub input: InputScript,
    pub spawn_monsters: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            level: LevelData::builtin(),
            ticks: 3600,
            seed: 1,
            realtime: false,
            input: InputScript::default(),
            spawn_monsters: true,
        }
    }
}

impl SimConfig {
    pub fn from_args(args: &Args) -> Result<Self> {
        let level = match &args.level {
            Some(path) => LevelData::load(path)?,
            None => LevelData::builtin(),
        };
        let input = match &args.input {
            Some(path) => InputScript::load(path)?,
            None => InputScript::default(),
        };

        Ok(Self {
            level,
            ticks: args.ticks,
            seed: args.seed,
            realtime: args.realtime,
            input,
            spawn_monsters: !args.no_monsters,
        })
    }
}
