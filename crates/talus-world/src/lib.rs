//! Chunk lifecycle, streaming, and the world facade for the talus voxel
//! engine (§4.D, §4.E).
//!
//! `generation` owns the noise set and orchestrates the terrain → caves/ores
//! → biomes → structures pipeline over one chunk; `chunk_manager` drives the
//! spiral load pattern and resident map around a viewer position; `world` is
//! the thin facade a renderer/input layer (out of scope per §1) talks to.

pub mod chunk_manager;
pub mod generation;
pub mod world;

pub use chunk_manager::ChunkManager;
pub use generation::{generate_chunk, NoiseSet};
pub use world::World;
