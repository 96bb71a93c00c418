//! Voxel kinds, the per-chunk palette, packed chunk storage and its binary
//! serialization, the RLE codec, and file persistence.

pub mod chunk;
pub mod fileio;
pub mod palette;
pub mod rle;
pub mod voxel;

pub use chunk::Chunk;
pub use palette::{Palette, MAX_PALETTE_SIZE};
pub use voxel::{properties, VoxelKind, VoxelProperties, VOXEL_KIND_COUNT};
