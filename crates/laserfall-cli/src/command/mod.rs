use std::path::PathBuf;

use clap::{Parser, Subcommand};
use laserfall_engine::{GameConfig, GameSeed, GameSession};

use crate::util;

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
    /// Play in the terminal
    Play(#[clap(flatten)] PlayArg),
    /// Run a headless game driven by random input and print a JSON summary
    Simulate(#[clap(flatten)] SimulateArg),
}

/// Options shared by every mode that creates a game session.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SessionArg {
    /// Path to a game config file (JSON); unset fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for the piece sequence, as 32 hex digits (random if omitted)
    #[arg(long)]
    seed: Option<GameSeed>,
}

impl SessionArg {
    pub(crate) fn build_session(&self) -> anyhow::Result<GameSession> {
        let config = match &self.config {
            Some(path) => util::read_config_file(path)?,
            None => GameConfig::default(),
        };
        let seed = self.seed.unwrap_or_else(rand::random);
        log::info!("session seed: {seed}");
        Ok(GameSession::from_config(config, seed)?)
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::Simulate(arg) => simulate::run(&arg)?,
    }
    Ok(())
}
