//! Shardfall headless runner
//!
//! Drives a session with a simple autopilot at a fixed 60 Hz step and prints
//! a JSON summary of the run.
//!
//! Usage: `shardfall [TUNING.json] [--seed N] [--seconds S]`

use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;

use shardfall::consts::FRAME_DT;
use shardfall::sim::{Body, GameEvent, GamePhase, GameState, TickInput, Upgrade, nearest_point, tick};
use shardfall::{Tuning, facing_of, normalize_angle};

/// Don't turn for heading errors smaller than this (radians)
const AIM_DEADBAND: f32 = 0.05;

/// Longest simulated run accepted on the command line (seconds)
const MAX_RUN_SECONDS: f32 = 3600.0;

/// Shardfall - headless asteroid-field autopilot run
#[derive(Debug, Parser)]
#[command(name = "shardfall")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Tuning overrides (JSON); defaults are used when omitted
    tuning: Option<PathBuf>,

    /// Session seed
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Simulated seconds to run
    #[arg(long, value_name = "SECONDS", default_value_t = 60.0, value_parser = parse_seconds)]
    seconds: f32,
}

/// Run length in (0, MAX_RUN_SECONDS]
fn parse_seconds(value: &str) -> Result<f32, String> {
    let seconds: f32 = value.parse().map_err(|e| format!("{e}"))?;
    if seconds > 0.0 && seconds <= MAX_RUN_SECONDS {
        Ok(seconds)
    } else {
        Err(format!("must be in (0, {MAX_RUN_SECONDS}]"))
    }
}

#[derive(Debug, Serialize)]
struct RunSummary {
    seed: u64,
    elapsed_secs: f32,
    score: u32,
    level: u32,
    upgrades: Vec<&'static str>,
    outcome: GamePhase,
    asteroids_destroyed: usize,
}

/// Turn toward the nearest asteroid, fire constantly, take the first upgrade
fn autopilot(state: &GameState) -> TickInput {
    let mut input = TickInput {
        fire: true,
        ..Default::default()
    };
    if state.offer().is_some() {
        input.choose_upgrade = Some(0);
        return input;
    }

    let targets: Vec<_> = state.asteroids.alive().map(|a| a.pos()).collect();
    if let Some(target) = nearest_point(state.ship.pos, &targets) {
        let wanted = facing_of(target - state.ship.pos);
        let error = normalize_angle(wanted - state.ship.facing);
        input.turn_left = error > AIM_DEADBAND;
        input.turn_right = error < -AIM_DEADBAND;
    }
    input
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let tuning = match &cli.tuning {
        Some(path) => match Tuning::load(path) {
            Ok(tuning) => tuning,
            Err(err) => {
                log::error!("{err}");
                std::process::exit(1);
            }
        },
        None => Tuning::default(),
    };

    log::info!(
        "Shardfall headless run: seed {}, {}s",
        cli.seed,
        cli.seconds
    );
    let mut state = GameState::with_tuning(cli.seed, tuning);
    let frames = (cli.seconds / FRAME_DT).ceil() as u64;
    let mut destroyed = 0;

    for _ in 0..frames {
        let input = autopilot(&state);
        tick(&mut state, &input, FRAME_DT);

        for event in state.drain_events() {
            match &event {
                GameEvent::AsteroidDestroyed { .. } => destroyed += 1,
                GameEvent::LevelUp { .. } | GameEvent::UpgradeChosen(_) | GameEvent::ShipDestroyed { .. } => {
                    log::info!("{event:?}")
                }
                _ => log::debug!("{event:?}"),
            }
        }
        if state.phase == GamePhase::GameOver {
            break;
        }
    }

    let summary = RunSummary {
        seed: state.seed,
        elapsed_secs: state.time,
        score: state.score(),
        level: state.level(),
        upgrades: state
            .progression
            .taken()
            .iter()
            .map(Upgrade::name)
            .collect(),
        outcome: state.phase,
        asteroids_destroyed: destroyed,
    };
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            log::error!("Failed to encode summary: {err}");
            std::process::exit(1);
        }
    }
}
