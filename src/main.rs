//! Orbit Hop entry point
//!
//! Runs the simulation headless at the host frame rate with autoplay on and
//! logs what happened. Pass a settings JSON path as the first argument to
//! override the defaults.

use orbit_hop::{FrameScheduler, Settings};

/// One minute at 60 Hz
const DEMO_FRAMES: u64 = 60 * 60;

fn main() {
    env_logger::init();
    log::info!("Orbit Hop (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    let mut runner = match FrameScheduler::new(settings) {
        Ok(runner) => runner,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };
    runner.set_autoplay(true);

    match runner.run_headless(DEMO_FRAMES) {
        Ok(summary) => {
            let player = &runner.state().player;
            log::info!(
                "{} frames: {} moves, {} coins, {} failures, {} restarts",
                summary.frames,
                summary.moves,
                summary.coins,
                summary.failures,
                summary.restarts
            );
            log::info!(
                "Final cell ({}, {}), currency {}, misses {}",
                player.target.x,
                player.target.y,
                player.currency,
                player.misses
            );
        }
        Err(e) => {
            log::error!("Simulation aborted: {}", e);
            std::process::exit(1);
        }
    }
}
