use std::{fs, path::PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use herdfall_engine::{EngineConfig, SessionSeed};
use rand::Rng as _;

use self::{play::PlayArg, simulate::SimulateArg};

mod play;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play in the terminal (default)
    Play(#[clap(flatten)] PlayArg),
    /// Run seeded games with random input and print one JSON summary per game
    Simulate(#[clap(flatten)] SimulateArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::Simulate(arg) => simulate::run(&arg)?,
    }
    Ok(())
}

/// Board layout presets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum Preset {
    /// 10x16 board
    #[default]
    Standard,
    /// 10x13 board
    Compact,
}

impl Preset {
    fn config(self) -> EngineConfig {
        match self {
            Preset::Standard => EngineConfig::default(),
            Preset::Compact => EngineConfig::compact(),
        }
    }
}

/// Engine configuration and seed shared by every mode.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ConfigArg {
    /// Board layout preset
    #[clap(long, value_enum, default_value_t = Preset::Standard)]
    preset: Preset,
    /// Engine configuration file (JSON), used instead of the preset.
    /// Missing fields take their default values
    #[clap(long)]
    config: Option<PathBuf>,
    /// Session seed as 32 hex characters; random when omitted
    #[clap(long)]
    seed: Option<SessionSeed>,
}

impl ConfigArg {
    pub(crate) fn load_config(&self) -> anyhow::Result<EngineConfig> {
        let config = match &self.config {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file {}", path.display()))?;
                serde_json::from_str(&json)
                    .with_context(|| format!("Failed to parse config file {}", path.display()))?
            }
            None => self.preset.config(),
        };
        config.validate().context("Invalid engine configuration")?;
        Ok(config)
    }

    pub(crate) fn seed(&self) -> SessionSeed {
        self.seed.unwrap_or_else(|| rand::rng().random())
    }
}
