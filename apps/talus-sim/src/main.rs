//! Headless demo driving `talus`'s streaming, generation, and physics loop
//! in place of a renderer/input layer (out of scope per §1).
//!
//! ```bash
//! cargo run -p talus-sim -- --seed 42 --ticks 200
//! ```
//!
//! `RUST_LOG` controls log verbosity (default `info`).

use std::time::{Duration, Instant};

use glam::Vec3;
use talus_core::Config;
use talus_pool::ThreadPool;
use talus_world::World;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// A deliberately small slice of [`Config`] this demo understands as flags;
/// parsing the rest of `Config`'s fields from the command line is an
/// out-of-scope CLI concern (§1) — a real embedder wires up its own flag
/// parser and fills in [`Config`] directly.
struct SimArgs {
    seed: u32,
    ticks: u32,
    save_directory: String,
}

impl SimArgs {
    fn parse() -> Self {
        let mut seed = Config::default().seed;
        let mut ticks = 200;
        let mut save_directory = "saves/demo".to_string();

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--seed" => {
                    if let Some(v) = args.next() {
                        seed = v.parse().unwrap_or(seed);
                    }
                }
                "--ticks" => {
                    if let Some(v) = args.next() {
                        ticks = v.parse().unwrap_or(ticks);
                    }
                }
                "--save-dir" => {
                    if let Some(v) = args.next() {
                        save_directory = v;
                    }
                }
                _ => {}
            }
        }

        Self {
            seed,
            ticks,
            save_directory,
        }
    }
}

/// Walks the viewer in a straight line down +X, one chunk width per tick,
/// so the streaming loop has something to load/evict over the run.
fn viewer_position_at_tick(tick: u32, chunk_size: u16) -> Vec3 {
    Vec3::new(tick as f32 * f32::from(chunk_size), f32::from(chunk_size) * 4.0, 0.0)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = SimArgs::parse();
    let config = Config {
        seed: args.seed,
        save_directory: args.save_directory,
        ..Config::default()
    };

    info!(seed = config.seed, view_distance = config.view_distance, "starting talus-sim");

    let mut world = World::new(config.clone());
    let pool = ThreadPool::new(config.num_threads);

    for tick in 0..args.ticks {
        let started = Instant::now();
        let viewer_pos = viewer_position_at_tick(tick, config.chunk_size);

        world.update_chunks(viewer_pos, &pool);
        let integrated = world.integrate_completed_chunks();

        let active = world.get_active_chunks();
        let generated: Vec<_> = active.iter().filter(|c| c.is_generated()).cloned().collect();
        let moved = talus_physics::step(&generated, &pool);

        if tick % 20 == 0 {
            info!(
                tick,
                resident = active.len(),
                integrated,
                physics_moves = moved,
                elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
                "tick"
            );
        }

        let budget = Duration::from_millis(u64::from(config.frame_delay_ms));
        let elapsed = started.elapsed();
        if elapsed < budget {
            std::thread::sleep(budget - elapsed);
        }
    }

    let written = world.save()?;
    info!(written, "final save complete");
    Ok(())
}
