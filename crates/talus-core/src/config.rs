//! World/generation configuration.
//!
//! A plain record filled in by the embedding application. This crate does not
//! parse command-line flags or environment variables — that belongs to the
//! out-of-scope CLI/renderer layer; `apps/talus-sim` shows one way to build a
//! [`Config`] by hand.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Tunables for world streaming, generation, and persistence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Seeds noise generators and per-chunk PRNGs.
    pub seed: u32,
    /// Spiral load radius in chunks around the viewer.
    pub view_distance: i32,
    /// X/Z extent of a chunk in cells.
    pub chunk_size: u16,
    /// Y extent of a chunk (and of the world) in cells.
    pub world_height: u16,
    /// Worker thread count for the generation/physics pool.
    pub num_threads: usize,
    /// Advisory milliseconds between ticks; the engine does not enforce it.
    pub frame_delay_ms: u32,
    /// Base terrain noise frequency.
    pub base_noise_scale: f32,
    /// Detail terrain noise frequency.
    pub detail_noise_scale: f32,
    /// Cellular-automaton smoothing passes for cave carving.
    pub cave_iterations: u32,
    /// Ore veins per 1000 cells, approximately.
    pub ore_density: f32,
    /// Biome temperature noise frequency.
    pub temperature_scale: f32,
    /// Biome humidity noise frequency.
    pub humidity_scale: f32,
    /// Root directory for on-disk world saves.
    pub save_directory: String,
    /// Whether chunk/metadata files use the RLE wrapper.
    pub use_compression: bool,
}

impl Config {
    /// A wall-clock-derived seed, used by [`Default`].
    fn wall_clock_seed() -> u32 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u32)
            .unwrap_or(0)
    }

    /// Number of worker threads available at generation/physics pool startup,
    /// `hardware threads - 1` with a floor of 1.
    fn default_num_threads() -> usize {
        std::thread::available_parallelism()
            .map(std::num::NonZeroUsize::get)
            .unwrap_or(2)
            .saturating_sub(1)
            .max(1)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: Self::wall_clock_seed(),
            view_distance: 5,
            chunk_size: 16,
            world_height: 256,
            num_threads: Self::default_num_threads(),
            frame_delay_ms: 50,
            base_noise_scale: 0.01,
            detail_noise_scale: 0.05,
            cave_iterations: 3,
            ore_density: 0.05,
            temperature_scale: 0.002,
            humidity_scale: 0.002,
            save_directory: "saves".to_string(),
            use_compression: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_documented_literals() {
        let cfg = Config::default();
        assert_eq!(cfg.view_distance, 5);
        assert_eq!(cfg.chunk_size, 16);
        assert_eq!(cfg.world_height, 256);
        assert_eq!(cfg.frame_delay_ms, 50);
        assert!((cfg.base_noise_scale - 0.01).abs() < f32::EPSILON);
        assert!((cfg.detail_noise_scale - 0.05).abs() < f32::EPSILON);
        assert_eq!(cfg.cave_iterations, 3);
        assert!((cfg.ore_density - 0.05).abs() < f32::EPSILON);
        assert!((cfg.temperature_scale - 0.002).abs() < f32::EPSILON);
        assert!((cfg.humidity_scale - 0.002).abs() < f32::EPSILON);
        assert_eq!(cfg.save_directory, "saves");
        assert!(cfg.use_compression);
        assert!(cfg.num_threads >= 1);
    }

    #[test]
    fn serde_roundtrip() {
        let cfg = Config {
            seed: 42,
            ..Config::default()
        };
        let bytes = bincode::serialize(&cfg).expect("serialize config");
        let back: Config = bincode::deserialize(&bytes).expect("deserialize config");
        assert_eq!(cfg, back);
    }
}
