use std::io::{self, Write as _};

use anyhow::Context as _;
use herdfall_engine::{EngineConfig, GameSession, SessionSeed};
use log::debug;
use rand::Rng;
use serde::Serialize;

use crate::command::ConfigArg;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    #[clap(flatten)]
    pub(super) config: ConfigArg,
    /// Number of games to play
    #[clap(long, default_value_t = 10)]
    games: usize,
    /// Maximum number of commands sent to a single game
    #[clap(long, default_value_t = 100_000)]
    max_steps: usize,
}

/// Outcome of one simulated game, printed as a JSON line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct GameSummary {
    seed: SessionSeed,
    score: u64,
    level: usize,
    locks: usize,
    regions_cleared: usize,
    steps: usize,
    game_over: bool,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        config,
        games,
        max_steps,
    } = arg;

    let engine_config = config.load_config()?;
    // Game and driver seeds are drawn from the base seed, so a batch replays
    // exactly when the same --seed is given.
    let mut seeds = config.seed().to_rng();
    let mut out = io::stdout().lock();
    for game in 0..*games {
        let seed: SessionSeed = seeds.random();
        let mut driver = seeds.random::<SessionSeed>().to_rng();
        let summary = simulate_game(engine_config.clone(), seed, &mut driver, *max_steps)?;
        debug!("game {game} finished: {summary:?}");
        serde_json::to_writer(&mut out, &summary).context("Failed to write game summary")?;
        writeln!(out).context("Failed to write game summary")?;
    }
    Ok(())
}

/// Plays one game with uniformly random commands until it ends or
/// `max_steps` commands were sent.
fn simulate_game<R>(
    config: EngineConfig,
    seed: SessionSeed,
    driver: &mut R,
    max_steps: usize,
) -> anyhow::Result<GameSummary>
where
    R: Rng + ?Sized,
{
    let mut session = GameSession::with_seed(config, seed)?;
    let mut steps = 0;
    while steps < max_steps && !session.is_game_over() {
        match driver.random_range(0..6) {
            0 => _ = session.move_left(),
            1 => _ = session.move_right(),
            2 => _ = session.rotate_cw(),
            3 => _ = session.rotate_ccw(),
            4 => _ = session.soft_drop(),
            _ => _ = session.step(),
        }
        steps += 1;
        // Nobody listens; keep the queue from growing
        session.drain_events();
    }

    let stats = session.stats();
    Ok(GameSummary {
        seed,
        score: stats.score(),
        level: stats.level(),
        locks: stats.locks(),
        regions_cleared: stats.regions_cleared(),
        steps,
        game_over: session.is_game_over(),
    })
}
