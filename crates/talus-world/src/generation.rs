//! Orchestrates the full terrain → caves/ores → biome → structure pipeline
//! over a single chunk (§4.F–§4.I), owning the three independent noise
//! generators the pipeline stages share.

use talus_core::{Config, NoiseGenerator};
use talus_storage::Chunk;
use talus_worldgen::{
    apply_biomes, generate_caves, generate_decorations, generate_ores, generate_structures,
    generate_terrain,
};

/// The three generators the pipeline draws from, seeded `seed`, `seed+1`,
/// `seed+2` so terrain, caves, and biome/structure sampling never share a
/// permutation table.
pub struct NoiseSet {
    terrain: NoiseGenerator,
    cave: NoiseGenerator,
    biome: NoiseGenerator,
}

impl NoiseSet {
    #[must_use]
    pub fn new(seed: u32) -> Self {
        Self {
            terrain: NoiseGenerator::new(u64::from(seed)),
            cave: NoiseGenerator::new(u64::from(seed) + 1),
            biome: NoiseGenerator::new(u64::from(seed) + 2),
        }
    }
}

/// Runs the full generation pipeline over an already-allocated chunk: fill
/// terrain, carve caves, scatter ores, classify biomes and replace surface
/// blocks, then stamp structures and decorations. Leaves the chunk
/// `generated = true`.
pub fn generate_chunk(chunk: &Chunk, noise: &NoiseSet, config: &Config) {
    generate_terrain(chunk, &noise.terrain, config);
    generate_caves(chunk, &noise.cave, config.cave_iterations);
    generate_ores(chunk, config.seed, config.ore_density);
    apply_biomes(
        chunk,
        &noise.biome,
        config.temperature_scale,
        config.humidity_scale,
    );
    generate_structures(
        chunk,
        &noise.biome,
        config.seed,
        config.temperature_scale,
        config.humidity_scale,
    );
    generate_decorations(
        chunk,
        &noise.biome,
        config.seed,
        config.temperature_scale,
        config.humidity_scale,
    );
    chunk.set_generated(true);
}
