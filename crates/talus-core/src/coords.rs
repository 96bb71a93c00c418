//! Coordinate systems for the voxel world.
//!
//! Unlike a fixed power-of-two chunk engine, `size` (X/Z extent) and `height`
//! (Y extent) are runtime [`crate::config::Config`] values, so conversions use
//! floor division rather than bit shifts.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Chunk position in chunk-space (one unit per chunk).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkPos {
    pub cx: i32,
    pub cy: i32,
    pub cz: i32,
}

impl ChunkPos {
    #[inline]
    pub const fn new(cx: i32, cy: i32, cz: i32) -> Self {
        Self { cx, cy, cz }
    }

    /// Horizontal (X/Z) Chebyshev-style distance used by the streaming loop's
    /// load/unload radius checks.
    #[inline]
    pub fn horizontal_distance(self, other: ChunkPos) -> i32 {
        (self.cx - other.cx).abs().max((self.cz - other.cz).abs())
    }
}

/// Position local to a chunk, each axis in `[0, extent)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl LocalPos {
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

/// Absolute voxel position in world space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl WorldPos {
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Floor-divide by `size`/`height` into a chunk coordinate.
    #[inline]
    pub fn chunk_pos(self, size: i32, height: i32) -> ChunkPos {
        ChunkPos::new(
            self.x.div_euclid(size),
            self.y.div_euclid(height),
            self.z.div_euclid(size),
        )
    }

    /// Local position within its chunk, normalized into `[0, extent)` even
    /// for negative world coordinates (matches `ChunkManager::worldToLocalPos`).
    #[inline]
    pub fn local_pos(self, size: i32, height: i32) -> LocalPos {
        LocalPos::new(
            self.x.rem_euclid(size),
            self.y.rem_euclid(height),
            self.z.rem_euclid(size),
        )
    }

    #[inline]
    pub fn split(self, size: i32, height: i32) -> (ChunkPos, LocalPos) {
        (self.chunk_pos(size, height), self.local_pos(size, height))
    }

    #[inline]
    pub fn from_chunk_local(chunk: ChunkPos, local: LocalPos, size: i32, height: i32) -> Self {
        Self::new(
            chunk.cx * size + local.x,
            chunk.cy * height + local.y,
            chunk.cz * size + local.z,
        )
    }

    #[inline]
    pub fn from_vec3_floor(v: Vec3) -> Self {
        Self::new(v.x.floor() as i32, v.y.floor() as i32, v.z.floor() as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_pos_chunk_local_roundtrip() {
        for &(x, y, z) in &[(100, 50, 200), (-1, -1, -1), (-17, 300, -5), (0, 0, 0)] {
            let world = WorldPos::new(x, y, z);
            let (chunk, local) = world.split(16, 256);
            let recovered = WorldPos::from_chunk_local(chunk, local, 16, 256);
            assert_eq!(world, recovered);
        }
    }

    #[test]
    fn negative_world_pos_chunk() {
        let world = WorldPos::new(-1, -1, -1);
        let chunk = world.chunk_pos(16, 256);
        assert_eq!(chunk, ChunkPos::new(-1, -1, -1));
        let local = world.local_pos(16, 256);
        assert_eq!(local, LocalPos::new(15, 255, 15));
    }

    #[test]
    fn local_pos_is_normalized_for_large_negative() {
        let world = WorldPos::new(-33, -257, -33);
        let local = world.local_pos(16, 256);
        assert!(local.x >= 0 && local.x < 16);
        assert!(local.y >= 0 && local.y < 256);
        assert!(local.z >= 0 && local.z < 16);
    }
}
