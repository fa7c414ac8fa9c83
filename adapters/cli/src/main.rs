#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Argent session.

mod layout;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use argent_core::{Event, Phase};
use argent_simulation::{audio_cue, AudioCue, Hud, Simulation, SimulationConfig};
use argent_world::query;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use layout::TowerPlacement;

/// Runs an Argent session without a window and prints a summary.
#[derive(Debug, Parser)]
#[command(name = "argent", version, about = "Run a headless Argent tower-defense session")]
struct Cli {
    /// TOML file overriding the default configuration.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Seed of the random source, taking precedence over the file.
    #[arg(long)]
    seed: Option<u64>,
    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 3_600)]
    ticks: u64,
    /// Tower to build before the first wave; may be repeated.
    #[arg(long = "tower", value_name = "KIND@COLUMN,ROW")]
    towers: Vec<TowerPlacement>,
}

/// Running totals of the events observed during a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Tally {
    shots: u64,
    hits_taken: u64,
    kills: u64,
    escapes: u64,
    towers_lost: u64,
}

impl Tally {
    fn record(&mut self, event: &Event) {
        match audio_cue(event) {
            Some(AudioCue::TowerFired) => self.shots += 1,
            Some(AudioCue::EnemyAttackedTower) => self.hits_taken += 1,
            Some(AudioCue::EnemyDied) => self.kills += 1,
            None => {}
        }

        match event {
            Event::EnemyEscaped { .. } => self.escapes += 1,
            Event::TowerDestroyed { .. } => self.towers_lost += 1,
            _ => {}
        }
    }
}

/// Entry point for the Argent command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), cli.seed)?;
    let (hud, tally) = run(config, &cli.towers, cli.ticks)?;
    print_summary(&hud, &tally);
    Ok(())
}

fn load_config(path: Option<&Path>, seed: Option<u64>) -> Result<SimulationConfig> {
    let mut config = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            parse_config(&text).with_context(|| format!("failed to parse {}", path.display()))?
        }
        None => SimulationConfig::default(),
    };

    if let Some(seed) = seed {
        config.seed = seed;
    }
    Ok(config)
}

fn parse_config(text: &str) -> Result<SimulationConfig, toml::de::Error> {
    toml::from_str(text)
}

fn run(config: SimulationConfig, towers: &[TowerPlacement], ticks: u64) -> Result<(Hud, Tally)> {
    let mut simulation = Simulation::new(config).context("invalid configuration")?;
    for placement in towers {
        let tower = simulation
            .place_tower(placement.kind, placement.cell)
            .with_context(|| format!("cannot build {placement}"))?;
        info!(?tower, %placement, "tower built");
    }

    let _ = simulation.start().context("session refused to start")?;
    info!(seed = config.seed, ticks, "session started");

    let mut tally = Tally::default();
    for _ in 0..ticks {
        simulation.step();
        for event in simulation.drain_events() {
            tally.record(&event);
        }
        if simulation.phase() == Phase::GameOver {
            warn!(tick = query::tick_index(simulation.world()), "every life was lost");
            break;
        }
    }

    Ok((simulation.hud(), tally))
}

fn print_summary(hud: &Hud, tally: &Tally) {
    println!("phase        {:?}", hud.phase);
    println!("ticks        {}", hud.tick);
    println!(
        "wave         {} ({:?}, {}/{} spawned)",
        hud.wave.index + 1,
        hud.wave.kind,
        hud.wave.spawned,
        hud.wave.planned
    );
    println!("lives        {}", hud.lives);
    println!("score        {}", hud.score);
    println!("resources    {}", hud.resources);
    println!("on field     {}", hud.enemies_alive);
    println!("shots        {}", tally.shots);
    println!("kills        {}", tally.kills);
    println!("escapes      {}", tally.escapes);
    println!("hits taken   {}", tally.hits_taken);
    println!("towers lost  {}", tally.towers_lost);
}
