//! Terrain, cave/ore, biome, and structure generation for the talus voxel
//! engine (§4.F–§4.I).
//!
//! Every generator here takes an already-allocated [`talus_storage::Chunk`]
//! and mutates it in place; ordering the calls into a full pipeline is
//! `talus-world::generation`'s job, not this crate's.

pub mod biome;
pub mod caves;
pub mod ores;
pub mod structures;
pub mod terrain;

pub use biome::{apply_biomes, determine_biome, sample_climate, Biome};
pub use caves::generate_caves;
pub use ores::generate_ores;
pub use structures::{generate_decorations, generate_structures};
pub use terrain::{generate_terrain, map_height_value};
