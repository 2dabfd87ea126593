//! Planet Merge headless runner
//!
//! Usage: `planet-merge [CONFIG.json] [TICKS] [SEED]`
//!
//! Runs the simulation on an 800x600 canvas without a window and logs
//! progress. Set `RUST_LOG=debug` to see merges and spawns.

use std::process::ExitCode;

use planet_merge::{Bounds, Config, Simulation};

const CANVAS: Bounds = Bounds::new(800.0, 600.0);
const DEFAULT_TICKS: u64 = 500;
const DEFAULT_SEED: u64 = 0x5eed;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Planet Merge (headless) starting...");

    let mut args = std::env::args().skip(1);

    let config = match args.next().filter(|p| p != "-") {
        Some(path) => match Config::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Could not load {path}: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };

    let ticks = match parse_arg(args.next(), DEFAULT_TICKS, "TICKS") {
        Some(ticks) => ticks,
        None => return ExitCode::FAILURE,
    };
    let seed = match parse_arg(args.next(), DEFAULT_SEED, "SEED") {
        Some(seed) => seed,
        None => return ExitCode::FAILURE,
    };

    log::info!(
        "{} initial bodies, G={}, {} ticks/s, {} spawns/s, seed {seed}",
        config.initial_body_count,
        config.gravitational_constant,
        config.ticks_per_second,
        config.spawn_rate
    );

    let summary_every = (config.ticks_per_second.round() as u64).max(1);
    let mut sim = Simulation::new(config, CANVAS, seed);

    for _ in 0..ticks {
        sim.tick();
        if sim.ticks() % summary_every == 0 {
            let state = sim.state();
            log::info!(
                "t={:.1}s bodies={} debris={} total mass={:.1}",
                sim.ticks() as f64 / sim.config().ticks_per_second,
                state.bodies.len(),
                state.debris.len(),
                state.total_mass()
            );
        }
    }

    let state = sim.state();
    let heaviest = state.bodies.iter().max_by(|a, b| a.mass.total_cmp(&b.mass));
    log::info!(
        "Finished {} ticks: {} bodies, {} debris",
        sim.ticks(),
        state.bodies.len(),
        state.debris.len()
    );
    if let Some(body) = heaviest {
        log::info!("Heaviest body {} with mass {:.1} (radius {})", body.id, body.mass, body.radius);
    }
    ExitCode::SUCCESS
}

fn parse_arg(arg: Option<String>, default: u64, name: &str) -> Option<u64> {
    match arg {
        None => Some(default),
        Some(raw) => match raw.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                log::error!("{name} must be a non-negative integer, got {raw:?}");
                None
            }
        },
    }
}
