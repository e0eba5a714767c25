//! Strafe headless runner
//!
//! Plays a session with the autopilot at a fixed 60 Hz step and prints the
//! final snapshot as JSON.
//!
//! Run with: cargo run --bin strafe-sim -- [config.toml] [max-seconds]

use strafe_sim::prelude::*;

const STEP: f64 = 1.0 / 60.0;
const DEFAULT_MAX_SECONDS: f64 = 300.0;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => match SimConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => SimConfig::default(),
    };
    let max_seconds = match args.next().map(|s| s.parse::<f64>()) {
        Some(Ok(seconds)) if seconds > 0.0 => seconds,
        Some(_) => {
            log::error!("max-seconds must be a positive number");
            std::process::exit(1);
        }
        None => DEFAULT_MAX_SECONDS,
    };

    let mut sim = Simulation::new(config);
    let mut clock = ManualClock::new();
    let mut timer = FrameTimer::new(sim.config().max_delta);
    let mut pilot = Autopilot::new();
    let queue = NotificationQueue::new();
    let mut frame: Vec<RenderItem> = Vec::new();

    sim.start();
    timer.tick(&clock);

    while !sim.state().is_over() && clock.now() < max_seconds {
        clock.advance(STEP);
        let dt = timer.tick(&clock);
        let input = pilot.next(&sim, dt);
        sim.tick(dt, input, &queue);

        for note in queue.drain() {
            match note {
                Notification::WaveStarted { wave, enemies } => {
                    log::info!("Wave {} started with {} enemies", wave, enemies)
                }
                Notification::WaveCleared { wave } => log::info!("Wave {} cleared", wave),
                Notification::GameOver(outcome) => log::info!("Game over: {:?}", outcome),
                other => log::trace!("{:?}", other),
            }
        }

        frame.clear();
        sim.render(&mut frame);
    }

    log::info!(
        "Simulated {} ticks ({:.1}s), {} entities drawn in the last frame, {:.0} fps",
        sim.ticks(),
        sim.state().elapsed,
        frame.len(),
        timer.fps()
    );

    match serde_json::to_string_pretty(&sim.snapshot()) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Failed to serialize snapshot: {}", e);
            std::process::exit(1);
        }
    }
}
