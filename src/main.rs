//! Tempo Runner headless driver.
//!
//! Builds the simulation world, generates a demo level and runs it for a
//! fixed number of frames without a window. Useful for profiling the
//! physics core and for checking a config file.
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run --release -- --frames 600 --bpm 140
//! ```

use std::path::PathBuf;

use clap::Parser;

use tempo_runner::components::physicsbody::PhysicsBody;
use tempo_runner::game::{build_world, reset_level, run_frame, spawn_demo_level};
use tempo_runner::resources::gameconfig::GameConfig;
use tempo_runner::resources::playerstate::PlayerState;
use tempo_runner::resources::scheduler::PhysicsScheduler;

/// Tempo Runner physics core
#[derive(Parser)]
#[command(version, about = "Headless run of the Tempo Runner physics core.")]
struct Cli {
    /// INI configuration file.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// Number of frames to simulate.
    #[arg(long, default_value_t = 600)]
    frames: u32,

    /// Seconds per rendered frame.
    #[arg(long, value_name = "SECONDS", default_value_t = 1.0 / 60.0)]
    frame_dt: f32,

    /// Override the configured tempo.
    #[arg(long)]
    bpm: Option<f32>,

    /// Seed for level generation.
    #[arg(long, default_value_t = 1)]
    seed: u64,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = GameConfig::with_path(cli.config.clone());
    if let Err(e) = config.load_from_file() {
        log::warn!("{}; using defaults", e);
    }
    if let Some(bpm) = cli.bpm {
        config.bpm = bpm;
    }

    let mut world = build_world(&config);
    let mut rng = fastrand::Rng::with_seed(cli.seed);
    let duration = cli.frames as f32 * cli.frame_dt;
    spawn_demo_level(&mut world, &mut rng, duration);

    let mut integrations: u64 = 0;
    let mut restarts = 0;
    let mut deaths_seen = 0;
    for _ in 0..cli.frames {
        integrations += u64::from(run_frame(&mut world, cli.frame_dt));

        let deaths = world.resource::<PlayerState>().deaths;
        if deaths > deaths_seen {
            deaths_seen = deaths;
            restarts += 1;
            reset_level(&mut world);
        }
    }

    let culled = world
        .query::<&PhysicsBody>()
        .iter(&world)
        .filter(|pb| !pb.active)
        .count();
    let state = world.resource::<PlayerState>();
    let scheduler = world.resource::<PhysicsScheduler>();
    log::info!(
        "ran {} frames: {} integrations, {} deaths ({} restarts), {} groundings, {} culled bodies, accumulator {:.4}s",
        cli.frames,
        integrations,
        state.deaths,
        restarts,
        state.groundings,
        culled,
        scheduler.accumulator
    );
}
