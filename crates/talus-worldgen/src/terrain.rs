//! Heightmap terrain generation (§4.F).

use talus_core::{Config, NoiseGenerator};
use talus_storage::{Chunk, VoxelKind};

/// Produces a `size × size` heightmap for the chunk at `(chunk_x, chunk_z)`:
/// 4-octave base noise at `base_scale` plus a 2-octave detail layer at
/// `detail_scale` weighted `0.1`, summed and renormalized to `[0, 1]`.
#[must_use]
pub fn height_map(
    noise: &NoiseGenerator,
    chunk_x: i32,
    chunk_z: i32,
    size: u16,
    base_scale: f32,
    detail_scale: f32,
) -> Vec<f32> {
    let size = i32::from(size);
    let world_x = chunk_x * size;
    let world_z = chunk_z * size;
    let mut map = vec![0.0f32; (size * size) as usize];

    for z in 0..size {
        for x in 0..size {
            let wx = (world_x + x) as f32;
            let wz = (world_z + z) as f32;

            let base = noise.perlin_2d(wx, wz, base_scale, 4, 0.5, 2.0);
            let detail = noise.perlin_2d(wx, wz, detail_scale, 2, 0.5, 2.0) * 0.1;

            let height = base + detail;
            map[(z * size + x) as usize] = (height + 1.0) * 0.5;
        }
    }

    map
}

/// Maps a normalized height `n ∈ [0, 1]` to an absolute voxel height via the
/// five-band mountains/hills/plains/shallow/ocean ramp.
#[must_use]
pub fn map_height_value(n: f32, world_height: u16) -> i32 {
    let wh = f32::from(world_height);

    let h = if n > 0.8 {
        let t = (n - 0.8) / 0.2;
        wh * (0.6 + 0.3 * t * t)
    } else if n > 0.6 {
        let t = (n - 0.6) / 0.2;
        wh * (0.45 + 0.15 * t)
    } else if n > 0.3 {
        let t = (n - 0.3) / 0.3;
        wh * (0.4 + 0.05 * t)
    } else if n > 0.2 {
        let t = (n - 0.2) / 0.1;
        wh * (0.35 + 0.05 * t)
    } else {
        let t = n / 0.2;
        wh * (0.25 + 0.1 * t)
    };

    h as i32
}

/// The column-fill rule for a single cell at height `y`, given that
/// column's absolute surface height `h` and the chunk's `height_i` extent:
/// Stone below `h - 4`, Dirt below `h - 1`, Grass at `h - 1`, Water at `h`
/// when the *column's own* surface sits below a third of world height,
/// otherwise Air. The `h < height_i / 3` test is per-column, not a
/// world-height constant — comparing `height_i` against itself would make
/// the Water branch permanently dead.
#[must_use]
fn column_voxel(y: i32, h: i32, height_i: i32) -> VoxelKind {
    if y < h - 4 {
        VoxelKind::Stone
    } else if y < h - 1 {
        VoxelKind::Dirt
    } else if y < h {
        VoxelKind::Grass
    } else if y == h && h < height_i / 3 {
        VoxelKind::Water
    } else {
        VoxelKind::Air
    }
}

/// Generates and applies the heightmap column fill to `chunk`, then marks it
/// generated+dirty. See [`column_voxel`] for the per-cell rule.
pub fn generate_terrain(chunk: &Chunk, noise: &NoiseGenerator, config: &Config) {
    let size = chunk.size();
    let world_height = chunk.height();
    let pos = chunk.position();

    let map = height_map(
        noise,
        pos.cx,
        pos.cz,
        size,
        config.base_noise_scale,
        config.detail_noise_scale,
    );

    let size_i = i32::from(size);
    let height_i = i32::from(world_height);

    for z in 0..size_i {
        for x in 0..size_i {
            let n = map[(z * size_i + x) as usize];
            let h = map_height_value(n, world_height).clamp(0, height_i);

            for y in 0..height_i {
                chunk.set_voxel(x, y, z, column_voxel(y, h, height_i));
            }
        }
    }

    chunk.set_generated(true);
    chunk.set_dirty(true);
}

#[cfg(test)]
mod tests {
    use super::*;
    use talus_core::ChunkPos;

    #[test]
    fn height_map_stays_in_unit_range() {
        let noise = NoiseGenerator::new(11);
        let map = height_map(&noise, 2, -3, 16, 0.01, 0.05);
        for &v in &map {
            assert!((0.0..=1.0).contains(&v), "value {v} out of [0,1]");
        }
    }

    #[test]
    fn height_band_boundaries_are_monotonic() {
        let samples = [0.0, 0.1, 0.2, 0.3, 0.4, 0.6, 0.7, 0.8, 0.9, 1.0];
        let mut prev = i32::MIN;
        for n in samples {
            let h = map_height_value(n, 256);
            assert!(h >= prev, "height should not decrease as n increases");
            prev = h;
        }
    }

    #[test]
    fn generate_terrain_marks_chunk_generated_and_dirty() {
        let chunk = Chunk::new(ChunkPos::new(0, 0, 0), 16, 64);
        let noise = NoiseGenerator::new(1);
        let config = Config::default();
        generate_terrain(&chunk, &noise, &config);
        assert!(chunk.is_generated());
        assert!(chunk.is_dirty());
    }

    #[test]
    fn column_voxel_fills_water_when_surface_is_low() {
        // surface at h=10 in a chunk where height_i=64: 10 < 64/3, so the
        // surface cell should be Water, not Air.
        assert_eq!(column_voxel(10, 10, 64), VoxelKind::Water);
    }

    #[test]
    fn column_voxel_leaves_air_when_surface_is_high() {
        // surface at h=40 in the same chunk: 40 >= 64/3, so no water.
        assert_eq!(column_voxel(40, 40, 64), VoxelKind::Air);
    }

    #[test]
    fn generate_terrain_produces_a_solid_base() {
        let chunk = Chunk::new(ChunkPos::new(0, 0, 0), 8, 64);
        let noise = NoiseGenerator::new(7);
        let config = Config::default();
        generate_terrain(&chunk, &noise, &config);
        // the bottom-most layer should essentially never be Air given the
        // height bands all sit well above y=0 for world_height=64.
        let mut solid_bottom = 0;
        for z in 0..8 {
            for x in 0..8 {
                if chunk.get_voxel(x, 0, z) != VoxelKind::Air {
                    solid_bottom += 1;
                }
            }
        }
        assert!(solid_bottom > 0);
    }
}
