//! Maze Chase entry point
//!
//! Headless runner: loads a configuration, drives the engine at a fixed
//! period and reports the outcome as JSON.

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use maze_chase::consts::TICK_MS;
use maze_chase::sim::Direction;
use maze_chase::{Engine, GameConfig, GameSnapshot};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// JSON game configuration (built-in demo when omitted)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Stop after this many ticks even if the game is still running
    #[arg(long, default_value_t = 5_000)]
    ticks: u64,
    /// Sleep one tick period between ticks
    #[arg(long)]
    realtime: bool,
    /// Scripted moves as `tick:direction`, e.g. `1:left,120:up`
    #[arg(long, value_delimiter = ',', value_parser = parse_intent)]
    script: Vec<(u64, Direction)>,
    /// Print every tick's snapshot as one JSON line
    #[arg(long)]
    snapshots: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Summary {
    ticks: u64,
    level: usize,
    score: u64,
    lives: u32,
    game_over: bool,
    level_complete: bool,
}

fn parse_intent(value: &str) -> Result<(u64, Direction), String> {
    let (tick, direction) = value
        .split_once(':')
        .ok_or_else(|| format!("expected tick:direction, got `{value}`"))?;
    let tick = tick
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("bad tick in `{value}`: {e}"))?;
    let direction = Direction::parse(direction.trim())
        .ok_or_else(|| format!("bad direction in `{value}` (use up/down/left/right)"))?;
    Ok((tick, direction))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => {
            log::info!("No --config given, using the built-in demo maze");
            GameConfig::default()
        }
    };

    let mut engine = Engine::new(config).context("building the game")?;
    if cli.snapshots {
        engine.add_observer(Box::new(|snapshot: &GameSnapshot| {
            match serde_json::to_string(snapshot) {
                Ok(line) => println!("{line}"),
                Err(e) => log::warn!("snapshot not serialisable: {e}"),
            }
        }));
    }

    let mut script = cli.script.clone();
    script.sort_by_key(|(tick, _)| *tick);
    let mut pending = script.into_iter().peekable();

    for tick in 1..=cli.ticks {
        while let Some((_, direction)) = pending.next_if(|(at, _)| *at <= tick) {
            log::debug!("tick {tick}: move {direction:?}");
            engine.queue_direction(direction);
        }

        engine
            .tick()
            .with_context(|| format!("advancing to level {}", engine.level_number() + 1))?;

        if engine.is_game_over() {
            break;
        }
        if cli.realtime {
            thread::sleep(Duration::from_millis(TICK_MS));
        }
    }

    let summary = Summary {
        ticks: engine.ticks(),
        level: engine.level_number(),
        score: engine.score(),
        lives: engine.lives(),
        game_over: engine.is_game_over(),
        level_complete: engine.is_level_complete(),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
