#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Tile Rush experience.

mod config;
mod input;
mod simulation;
mod terminal;

use std::{
    io::{self, BufReader},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use tile_rush_rendering::{Color, Presentation, RenderingBackend};
use tile_rush_world::{levels::LevelTable, World};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{simulation::Simulation, terminal::TerminalBackend};

const WINDOW_TITLE: &str = "Tile Rush";
const CLEAR_COLOR: Color = Color::from_rgb_u8(0xbb, 0xad, 0xa0);

/// Command line arguments for running Tile Rush in a terminal.
#[derive(Debug, Parser)]
#[command(name = "tile-rush", version, about = "Timed, level-based tile merging")]
struct CliArgs {
    /// TOML file describing the level progression. Defaults to the built-in levels.
    #[arg(long, value_name = "FILE")]
    levels: Option<PathBuf>,

    /// Seed for tile spawns. A random seed is chosen when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Disable ANSI colors and screen clearing.
    #[arg(long)]
    no_color: bool,
}

/// Entry point for the Tile Rush command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .with_writer(io::stderr)
        .init();

    let levels = match &args.levels {
        Some(path) => config::load_level_table(path)?,
        None => LevelTable::reference(),
    };
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(levels = levels.level_count(), seed, "starting session");

    let mut simulation = Simulation::new(World::new(levels, seed));
    println!("{}", simulation.welcome_banner());

    let scene = simulation.scene()?;
    let presentation = Presentation::new(WINDOW_TITLE, CLEAR_COLOR, scene);
    let backend =
        TerminalBackend::new(BufReader::new(io::stdin()), io::stdout()).with_color(!args.no_color);

    backend
        .run(presentation, |dt, input, scene| {
            simulation.advance(dt, input)?;
            *scene = simulation.scene()?;
            Ok(())
        })
        .context("terminal session failed")
}
