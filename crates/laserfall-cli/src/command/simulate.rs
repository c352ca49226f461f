use std::{collections::BTreeMap, path::PathBuf};

use laserfall_engine::{GameEvent, GameSeed, GameSession, GameSnapshot, InputAction};
use rand::{Rng, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::{command::SessionArg, util::Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    #[clap(flatten)]
    session: SessionArg,
    /// Maximum number of logical steps to run
    #[arg(long, default_value_t = 100_000)]
    max_steps: u64,
    /// Seed for the simulated player's input, as 32 hex digits (random if omitted)
    #[arg(long)]
    input_seed: Option<GameSeed>,
    /// Probability of pressing a key on each step
    #[arg(long, default_value_t = 0.2)]
    input_rate: f64,
    /// Also write every game event as a JSON line to this file
    #[arg(long)]
    events: Option<PathBuf>,
    /// Output file path for the summary (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct SimulationSummary {
    input_seed: GameSeed,
    steps: u64,
    game_over: bool,
    event_counts: BTreeMap<&'static str, u64>,
    snapshot: GameSnapshot,
}

/// Random key presser used to drive a session without a terminal.
#[derive(Debug)]
struct RandomPlayer<R> {
    rng: R,
    input_rate: f64,
}

impl<R> RandomPlayer<R>
where
    R: Rng,
{
    fn new(rng: R, input_rate: f64) -> Self {
        Self { rng, input_rate }
    }

    fn next_action(&mut self) -> Option<InputAction> {
        if !self.rng.random_bool(self.input_rate) {
            return None;
        }
        let index = self.rng.random_range(0..InputAction::ALL.len());
        Some(InputAction::ALL[index])
    }
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        session,
        max_steps,
        input_seed,
        input_rate,
        events,
        output,
    } = arg;

    anyhow::ensure!(
        (0.0..=1.0).contains(input_rate),
        "--input-rate must be between 0 and 1, got {input_rate}"
    );

    let mut session = session.build_session()?;
    let input_seed = input_seed.unwrap_or_else(rand::random);
    let player = RandomPlayer::new(Pcg32::from_seed(input_seed.to_bytes()), *input_rate);

    let mut event_output = events
        .as_deref()
        .map(|path| Output::create(Some(path)))
        .transpose()?;
    let summary = simulate(&mut session, player, input_seed, *max_steps, |event| {
        match &mut event_output {
            Some(output) => output.write_json_line(event),
            None => Ok(()),
        }
    })?;
    if let Some(event_output) = event_output {
        let name = event_output.name().to_owned();
        event_output.finish()?;
        eprintln!("Events written to {name}");
    }

    let mut output = Output::create(output.as_deref())?;
    output.write_json_pretty(&summary)?;
    output.finish()
}

fn simulate<R, F>(
    session: &mut GameSession,
    mut player: RandomPlayer<R>,
    input_seed: GameSeed,
    max_steps: u64,
    mut on_event: F,
) -> anyhow::Result<SimulationSummary>
where
    R: Rng,
    F: FnMut(&GameEvent) -> anyhow::Result<()>,
{
    #[expect(clippy::cast_precision_loss)]
    let step_ms = session.config().tick_ms as f64;
    let mut event_counts = BTreeMap::new();
    let mut record = |events: Vec<GameEvent>| -> anyhow::Result<()> {
        for event in &events {
            *event_counts.entry(event.name()).or_insert(0) += 1;
            on_event(event)?;
        }
        Ok(())
    };

    record(session.new_game())?;
    let mut steps = 0;
    while steps < max_steps && !session.is_game_over() {
        if let Some(action) = player.next_action() {
            record(session.handle_input(action))?;
        }
        record(session.tick(step_ms))?;
        steps += 1;
    }
    log::info!(
        "simulation finished after {steps} steps with score {}",
        session.score()
    );

    Ok(SimulationSummary {
        input_seed,
        steps,
        game_over: session.is_game_over(),
        event_counts,
        snapshot: session.snapshot(),
    })
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;

    use super::*;

    fn run_simulation(max_steps: u64) -> SimulationSummary {
        let mut session = GameSession::with_seed(GameSeed::from_bytes([3; 16]));
        let input_seed = GameSeed::from_bytes([5; 16]);
        let player = RandomPlayer::new(Pcg32::from_seed(input_seed.to_bytes()), 0.2);
        simulate(&mut session, player, input_seed, max_steps, |_| Ok(())).unwrap()
    }

    #[test]
    fn test_simulation_stops_at_max_steps_or_game_over() {
        let summary = run_simulation(500);
        assert!(summary.steps <= 500);
        assert!(summary.game_over || summary.steps == 500);
        assert_eq!(summary.event_counts.get("GameStarted"), Some(&1));
    }

    #[test]
    fn test_simulation_is_deterministic() {
        let first = serde_json::to_value(run_simulation(2_000)).unwrap();
        let second = serde_json::to_value(run_simulation(2_000)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_idle_player_runs_until_game_over() {
        let mut session = GameSession::with_seed(GameSeed::from_bytes([9; 16]));
        let input_seed = GameSeed::from_bytes([0; 16]);
        let player = RandomPlayer::new(Pcg32::from_seed(input_seed.to_bytes()), 0.0);
        let mut locked = 0;
        let summary = simulate(&mut session, player, input_seed, 1_000_000, |event| {
            if event.is_piece_locked() {
                locked += 1;
            }
            Ok(())
        })
        .unwrap();
        assert!(summary.game_over);
        assert_eq!(summary.event_counts.get("GameOver"), Some(&1));
        assert_eq!(summary.event_counts.get("PieceLocked"), Some(&locked));
        assert_eq!(summary.snapshot.pieces_placed, locked);
    }

    #[test]
    fn test_player_respects_input_rate() {
        let mut never = RandomPlayer::new(Pcg32::seed_from_u64(1), 0.0);
        assert!((0..100).all(|_| never.next_action().is_none()));
        let mut always = RandomPlayer::new(Pcg32::seed_from_u64(1), 1.0);
        assert!((0..100).all(|_| always.next_action().is_some()));
    }
}
