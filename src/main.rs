//! Crab Arena - headless driver
//!
//! Runs a round with seeded random drive input in place of keyboard players
//! and prints a JSON summary of the result.
//!
//! Example:
//!   cargo run -- --players 4 --ticks 3600 --seed 7

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use crab_arena::consts::{MAX_PLAYERS, SIM_DT};
use crab_arena::sim::{ArenaState, BodyId, SimEvent, tick};
use crab_arena::{BodySnapshot, Settings};

#[derive(Parser, Debug)]
#[command(author, version, about = "Run a headless Crab Arena round", long_about = None)]
struct Args {
    /// JSON settings file (falls back to ./crab-arena.json, then defaults)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Write the effective settings to this path and exit
    #[arg(long)]
    write_config: Option<PathBuf>,
    #[arg(long, default_value_t = 4)]
    players: usize,
    /// Maximum ticks to run if nobody wins first
    #[arg(long, default_value_t = 3600)]
    ticks: u64,
    /// Seconds per tick
    #[arg(long, default_value_t = SIM_DT)]
    dt: f32,
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Ticks between drive input changes
    #[arg(long, default_value_t = 30)]
    reroll: u64,
    /// Make walls and body collisions inelastic
    #[arg(long)]
    inelastic: bool,
}

#[derive(Serialize)]
struct Summary {
    ticks: u64,
    collisions: usize,
    wall_bounces: usize,
    winner: Option<BodyId>,
    eliminated: Vec<BodyId>,
    bodies: Vec<BodySnapshot>,
}

/// Picked up from the working directory when `--config` is not given
const DEFAULT_SETTINGS_FILE: &str = "crab-arena.json";

/// An explicit path must be valid; the default file is optional and forgiving
fn base_settings(config: Option<&Path>, default_file: &Path) -> Result<Settings> {
    match config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("read settings {}", path.display()))?;
            serde_json::from_str::<Settings>(&json)
                .with_context(|| format!("parse settings {}", path.display()))
        }
        None if default_file.exists() => Ok(Settings::load(default_file)),
        None => Ok(Settings::default()),
    }
}

fn load_settings(args: &Args) -> Result<Settings> {
    let mut settings = base_settings(args.config.as_deref(), Path::new(DEFAULT_SETTINGS_FILE))?;
    if args.inelastic {
        settings.elastic_walls = false;
        settings.elastic_collisions = false;
    }
    settings.validate().context("validate settings")?;
    Ok(settings)
}

/// One random 8-way drive direction, like a held key combination
fn random_drive(rng: &mut Pcg32) -> Vec2 {
    Vec2::new(
        rng.random_range(-1..=1) as f32,
        rng.random_range(-1..=1) as f32,
    )
}

fn run(args: &Args, settings: Settings) -> Result<Summary> {
    if args.players > MAX_PLAYERS {
        anyhow::bail!("at most {} players, got {}", MAX_PLAYERS, args.players);
    }
    let mut state = ArenaState::with_players(settings, args.players)?;
    let mut rng = Pcg32::seed_from_u64(args.seed);
    let reroll = args.reroll.max(1);

    let mut collisions = 0;
    let mut wall_bounces = 0;
    let mut ticks = 0;

    while ticks < args.ticks && !state.is_round_over() {
        if ticks % reroll == 0 {
            let ids: Vec<BodyId> = state.bodies.iter().map(|b| b.id).collect();
            for id in ids {
                state.set_acceleration_input(id, random_drive(&mut rng))?;
                state.set_braking(id, rng.random_bool(0.15))?;
            }
        }

        tick(&mut state, args.dt);
        ticks += 1;

        for event in state.drain_events() {
            match event {
                SimEvent::Collision { .. } => collisions += 1,
                SimEvent::WallBounce { .. } => wall_bounces += 1,
                SimEvent::Eliminated { id } => log::info!("Tick {}: body {} is out", ticks, id),
                SimEvent::RoundOver { winner } => log::info!("Tick {}: round over ({:?})", ticks, winner),
            }
        }
    }

    Ok(Summary {
        ticks,
        collisions,
        wall_bounces,
        winner: state.winner(),
        eliminated: state.eliminated.clone(),
        bodies: state.snapshots(),
    })
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    log::info!("Crab Arena (headless) starting...");

    let settings = load_settings(&args)?;
    log::info!(
        "Arena {}x{}, {} players, damage policy {}",
        settings.width,
        settings.height,
        args.players,
        settings.damage.as_str()
    );
    if let Some(path) = &args.write_config {
        settings
            .save(path)
            .with_context(|| format!("write settings {}", path.display()))?;
        return Ok(());
    }

    let summary = run(&args, settings)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
